//! Registry error types.

use crate::entity::Entity;

/// Errors surfaced by the entity registry.
///
/// Every variant except [`EcsError::PoolTypeMismatch`] is a caller error.
/// Predicates such as
/// [`Registry::has_component`](crate::Registry::has_component) or
/// [`Registry::entity_has_tag`](crate::Registry::entity_has_tag) never
/// produce one of these; they answer `false` instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EcsError {
    /// More distinct component types were registered than a signature can hold.
    #[error("cannot register component `{type_name}`: limit of {max} component types reached")]
    CapacityExceeded {
        /// The component type that did not fit.
        type_name: &'static str,
        /// The fixed maximum number of component types.
        max: usize,
    },

    /// The entity has no component of the requested type.
    #[error("{entity} has no `{component}` component")]
    ComponentNotFound {
        /// The entity that was queried.
        entity: Entity,
        /// The requested component type.
        component: &'static str,
    },

    /// No entity carries the requested tag.
    #[error("no entity is tagged `{0}`")]
    TagNotFound(String),

    /// The requested group was never created.
    #[error("no group named `{0}`")]
    GroupNotFound(String),

    /// No system of the requested type is registered.
    #[error("system `{0}` is not registered")]
    SystemNotFound(&'static str),

    /// The entity id is not currently issued.
    #[error("{0} is not alive")]
    EntityNotAlive(Entity),

    /// A component id resolved to a pool holding another type. Indicates a
    /// corrupted type table.
    #[error("pool for `{component}` holds a different component type")]
    PoolTypeMismatch {
        /// The component type that was requested.
        component: &'static str,
    },
}
