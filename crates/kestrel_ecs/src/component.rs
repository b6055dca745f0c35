//! Component trait and the per-registry component type table.
//!
//! Component type ids are dense small integers rather than hashes: each id is
//! a bit position in a [`Signature`](crate::Signature) and an index into the
//! registry's pool vector. Ids are handed out by an explicit registration step
//! ([`ComponentTypes::register`]) in first-come order, starting at 0, and are
//! never reused.

use std::any::TypeId;
use std::collections::HashMap;

use tracing::debug;

use crate::error::EcsError;
use crate::signature::MAX_COMPONENTS;

/// Marker trait for data that can be attached to an entity.
///
/// Components are plain records with no behaviour. Implementing the trait is
/// usually a one-liner:
///
/// ```rust
/// use kestrel_ecs::Component;
///
/// #[derive(Debug, Clone, Copy, PartialEq)]
/// struct Velocity {
///     x: f32,
///     y: f32,
/// }
///
/// impl Component for Velocity {}
/// ```
pub trait Component: 'static {
    /// A human-readable name used in logs and error messages.
    fn type_name() -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Dense identifier of a registered component type, in `0..MAX_COMPONENTS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentTypeId(u8);

impl ComponentTypeId {
    /// Create an id from its index. Returns `None` if `index` does not fit in
    /// a signature.
    #[must_use]
    pub const fn new(index: usize) -> Option<Self> {
        if index < MAX_COMPONENTS {
            Some(Self(index as u8))
        } else {
            None
        }
    }

    /// Returns the id as a signature bit / pool index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for ComponentTypeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ComponentType({})", self.0)
    }
}

/// Maps Rust component types to their [`ComponentTypeId`].
#[derive(Debug, Default)]
pub struct ComponentTypes {
    ids: HashMap<TypeId, ComponentTypeId>,
    names: Vec<&'static str>,
}

impl ComponentTypes {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the id of `T`, assigning the next free id on first use.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::CapacityExceeded`] if `T` is new and
    /// [`MAX_COMPONENTS`] types are already registered.
    pub fn register<T: Component>(&mut self) -> Result<ComponentTypeId, EcsError> {
        if let Some(&id) = self.ids.get(&TypeId::of::<T>()) {
            return Ok(id);
        }

        let id = ComponentTypeId::new(self.names.len()).ok_or(EcsError::CapacityExceeded {
            type_name: T::type_name(),
            max: MAX_COMPONENTS,
        })?;
        self.ids.insert(TypeId::of::<T>(), id);
        self.names.push(T::type_name());
        debug!(component = T::type_name(), id = id.index(), "registered component type");
        Ok(id)
    }

    /// Returns the id of `T` if it has been registered.
    #[must_use]
    pub fn id_of<T: Component>(&self) -> Option<ComponentTypeId> {
        self.ids.get(&TypeId::of::<T>()).copied()
    }

    /// Returns the name recorded for `id`.
    #[must_use]
    pub fn name(&self, id: ComponentTypeId) -> Option<&'static str> {
        self.names.get(id.index()).copied()
    }

    /// Returns the number of registered component types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns `true` if no component type has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
