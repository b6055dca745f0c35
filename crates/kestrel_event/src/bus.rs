//! The event bus.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use tracing::{debug, trace};

/// A type-erased subscriber. The event arrives as `&dyn Any` and is
/// downcast back to the subscribed type by the wrapper built in
/// [`EventBus::subscribe`].
type Handler<C> = Rc<dyn Fn(&mut C, &dyn Any, &mut EventBus<C>)>;

/// Type-indexed subscriber lists with synchronous, in-order fan-out.
///
/// `C` is the context every handler receives mutably alongside the event.
/// Handlers are stored as closures, so a handler bound to some receiver
/// simply captures it (or, for stateless systems, captures nothing and
/// reaches the world through the context).
///
/// ```rust
/// use kestrel_event::EventBus;
///
/// struct Hit(u32);
///
/// let mut bus: EventBus<Vec<u32>> = EventBus::new();
/// bus.subscribe(|log: &mut Vec<u32>, hit: &Hit, _bus: &mut EventBus<Vec<u32>>| {
///     log.push(hit.0);
/// });
///
/// let mut log = Vec::new();
/// assert_eq!(bus.emit(&mut log, Hit(7)), 1);
/// assert_eq!(log, vec![7]);
/// ```
pub struct EventBus<C> {
    subscribers: HashMap<TypeId, Vec<Handler<C>>>,
}

impl<C> EventBus<C> {
    /// Create a bus with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            subscribers: HashMap::new(),
        }
    }

    /// Drop every subscription.
    pub fn reset(&mut self) {
        self.subscribers.clear();
        trace!("event bus reset");
    }

    /// Register `handler` for events of type `E`.
    ///
    /// Handlers of one event type run in the order they were subscribed.
    /// Subscribing the same closure twice registers it twice.
    pub fn subscribe<E, F>(&mut self, handler: F)
    where
        E: 'static,
        F: Fn(&mut C, &E, &mut EventBus<C>) + 'static,
    {
        let erased: Handler<C> = Rc::new(
            move |context: &mut C, event: &dyn Any, bus: &mut EventBus<C>| {
                if let Some(event) = event.downcast_ref::<E>() {
                    handler(context, event, bus);
                }
            },
        );
        self.subscribers
            .entry(TypeId::of::<E>())
            .or_default()
            .push(erased);

        debug!(event = std::any::type_name::<E>(), "handler subscribed");
    }

    /// Deliver `event` to every subscriber of `E` and return how many ran.
    ///
    /// Delivery is synchronous and depth-first: a handler that emits another
    /// event sees that event fully handled before its own call returns. The
    /// subscriber list is fixed when `emit` starts, so handlers subscribed
    /// during delivery only see later emissions. An event with no
    /// subscribers is dropped.
    pub fn emit<E: 'static>(&mut self, context: &mut C, event: E) -> usize {
        let handlers = match self.subscribers.get(&TypeId::of::<E>()) {
            Some(handlers) if !handlers.is_empty() => handlers.clone(),
            _ => {
                trace!(event = std::any::type_name::<E>(), "event dropped, no subscribers");
                return 0;
            }
        };

        trace!(
            event = std::any::type_name::<E>(),
            handlers = handlers.len(),
            "emitting event"
        );
        let event: &dyn Any = &event;
        for handler in &handlers {
            handler(context, event, self);
        }
        handlers.len()
    }

    /// Returns the number of handlers subscribed to `E`.
    #[must_use]
    pub fn subscriber_count<E: 'static>(&self) -> usize {
        self.subscribers
            .get(&TypeId::of::<E>())
            .map_or(0, Vec::len)
    }

    /// Returns `true` if at least one handler is subscribed to `E`.
    #[must_use]
    pub fn has_subscribers<E: 'static>(&self) -> bool {
        self.subscriber_count::<E>() > 0
    }
}

impl<C> Default for EventBus<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> fmt::Debug for EventBus<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("event_types", &self.subscribers.len())
            .field(
                "handlers",
                &self.subscribers.values().map(Vec::len).sum::<usize>(),
            )
            .finish()
    }
}
