//! # kestrel_event
//!
//! A synchronous publish/subscribe bus for notifications between systems
//! within one simulation step.
//!
//! Events are plain values of any `'static` type. Subscribers are closures
//! keyed by the event's type; emitting a value calls every subscriber of
//! exactly that type, in subscription order, before `emit` returns. Handlers
//! receive a caller-supplied context (typically the entity registry) and the
//! bus itself, so they can mutate the world and emit follow-up events.

pub mod bus;

pub use bus::EventBus;
