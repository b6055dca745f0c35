//! Pairwise axis-aligned box collision.

use kestrel_ecs::{EcsError, Entity, Registry, System, SystemBase};
use kestrel_math::{Transform, Vec2};
use tracing::debug;

use crate::components::BoxCollider;
use crate::events::{CollisionEvent, GameBus};

/// Tests every pair of entities with a [`Transform`] and a [`BoxCollider`]
/// and emits a [`CollisionEvent`] for each overlapping pair.
#[derive(Debug)]
pub struct CollisionSystem {
    base: SystemBase,
}

impl CollisionSystem {
    /// # Errors
    ///
    /// Fails if the required component types cannot be registered.
    pub fn new(registry: &mut Registry) -> Result<Self, EcsError> {
        let transform = registry.register_component::<Transform>()?;
        let collider = registry.register_component::<BoxCollider>()?;
        Ok(Self {
            base: SystemBase::requiring([transform, collider]),
        })
    }

    /// Emit one [`CollisionEvent`] per overlapping pair, in match order.
    ///
    /// Handlers run before the next pair is tested, so a handler that moves
    /// an entity affects the remaining tests of this step. Returns the number
    /// of collisions.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::SystemNotFound`] if the system is not registered.
    pub fn update(registry: &mut Registry, bus: &mut GameBus) -> Result<usize, EcsError> {
        let entities = registry.system_entities::<Self>()?;
        let mut collisions = 0;

        for (i, &a) in entities.iter().enumerate() {
            for &b in &entities[i + 1..] {
                if overlaps(registry, a, b) {
                    debug!(a = a.id(), b = b.id(), "collision");
                    bus.emit(registry, CollisionEvent::new(a, b));
                    collisions += 1;
                }
            }
        }
        Ok(collisions)
    }
}

/// Returns `true` if the boxes of `a` and `b` strictly overlap. Touching
/// edges do not count. Entities missing either component never collide.
fn overlaps(registry: &Registry, a: Entity, b: Entity) -> bool {
    let (Some(a), Some(b)) = (bounds(registry, a), bounds(registry, b)) else {
        return false;
    };
    let ((a_min, a_max), (b_min, b_max)) = (a, b);
    a_min.x < b_max.x && a_max.x > b_min.x && a_min.y < b_max.y && a_max.y > b_min.y
}

fn bounds(registry: &Registry, entity: Entity) -> Option<(Vec2, Vec2)> {
    let transform = registry.get_component::<Transform>(entity).ok()?;
    let collider = registry.get_component::<BoxCollider>(entity).ok()?;
    Some(collider.bounds(transform))
}

impl System for CollisionSystem {
    fn base(&self) -> &SystemBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut SystemBase {
        &mut self.base
    }

    fn name(&self) -> &'static str {
        "CollisionSystem"
    }
}
