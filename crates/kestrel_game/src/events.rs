//! Gameplay events.

use kestrel_ecs::{Entity, Registry};
use kestrel_event::EventBus;

/// The bus gameplay systems share. Handlers receive the registry as context.
pub type GameBus = EventBus<Registry>;

/// Two colliders overlap.
///
/// Emitted once per overlapping pair per step. The pair is unordered: handlers
/// must check both `(a, b)` and `(b, a)` roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollisionEvent {
    pub a: Entity,
    pub b: Entity,
}

impl CollisionEvent {
    #[must_use]
    pub fn new(a: Entity, b: Entity) -> Self {
        Self { a, b }
    }

    /// The pair as a tuple, for matching on roles.
    #[must_use]
    pub fn pair(&self) -> (Entity, Entity) {
        (self.a, self.b)
    }
}
