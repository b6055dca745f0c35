//! Velocity integration and arena bounds.

use kestrel_ecs::{EcsError, Entity, Registry, System, SystemBase};
use kestrel_math::Transform;
use tracing::{debug, warn};

use crate::components::RigidBody;
use crate::config::ArenaConfig;
use crate::events::{CollisionEvent, GameBus};
use crate::labels::{GROUP_ENEMIES, GROUP_OBSTACLES, in_group, is_player};

/// Moves every entity with a [`Transform`] and a [`RigidBody`].
///
/// The player is kept inside the arena. Anything else that drifts past the
/// arena margin is killed. On collision, enemies and the player bounce off
/// obstacles.
#[derive(Debug)]
pub struct MovementSystem {
    base: SystemBase,
    arena: ArenaConfig,
}

impl MovementSystem {
    /// # Errors
    ///
    /// Fails if the required component types cannot be registered.
    pub fn new(registry: &mut Registry, arena: ArenaConfig) -> Result<Self, EcsError> {
        let transform = registry.register_component::<Transform>()?;
        let rigid_body = registry.register_component::<RigidBody>()?;
        Ok(Self {
            base: SystemBase::requiring([transform, rigid_body]),
            arena,
        })
    }

    #[must_use]
    pub fn arena(&self) -> &ArenaConfig {
        &self.arena
    }

    pub fn subscribe_to_events(bus: &mut GameBus) {
        bus.subscribe::<CollisionEvent, _>(Self::on_collision);
    }

    /// Advance every matched entity by `velocity * dt` seconds.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::SystemNotFound`] if the system is not registered.
    pub fn update(registry: &mut Registry, dt: f64) -> Result<(), EcsError> {
        let system = registry.get_system::<Self>()?;
        let arena = system.arena;
        let entities = system.base().entities().to_vec();
        let dt = dt as f32;

        for entity in entities {
            let Ok(velocity) = registry
                .get_component::<RigidBody>(entity)
                .map(|body| body.velocity)
            else {
                continue;
            };
            let player = is_player(registry, entity);
            let Ok(transform) = registry.get_component_mut::<Transform>(entity) else {
                continue;
            };

            transform.position += velocity * dt;
            if player {
                transform.position = arena.clamp_player(transform.position);
            } else if arena.is_out_of_bounds(transform.position) {
                warn!(entity = entity.id(), "killing entity outside the arena");
                registry.kill_entity(entity);
            }
        }
        Ok(())
    }

    pub fn on_collision(registry: &mut Registry, event: &CollisionEvent, _bus: &mut GameBus) {
        let (a, b) = event.pair();

        if in_group(registry, a, GROUP_ENEMIES) && in_group(registry, b, GROUP_OBSTACLES) {
            bounce(registry, a);
        }
        if in_group(registry, a, GROUP_OBSTACLES) && in_group(registry, b, GROUP_ENEMIES) {
            bounce(registry, b);
        }
        if is_player(registry, a) && in_group(registry, b, GROUP_OBSTACLES) {
            bounce(registry, a);
        }
        if in_group(registry, a, GROUP_OBSTACLES) && is_player(registry, b) {
            bounce(registry, b);
        }
    }
}

/// Reverse `entity`'s velocity.
fn bounce(registry: &mut Registry, entity: Entity) {
    if let Ok(body) = registry.get_component_mut::<RigidBody>(entity) {
        body.velocity = -body.velocity;
        debug!(entity = entity.id(), "bounced off obstacle");
    }
}

impl System for MovementSystem {
    fn base(&self) -> &SystemBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut SystemBase {
        &mut self.base
    }

    fn name(&self) -> &'static str {
        "MovementSystem"
    }
}
