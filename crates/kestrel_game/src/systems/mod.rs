//! Gameplay systems and the per-step schedule.

pub mod collision;
pub mod damage;
pub mod emit;
pub mod movement;
pub mod projectile;

pub use collision::CollisionSystem;
pub use damage::DamageSystem;
pub use emit::ProjectileEmitSystem;
pub use movement::MovementSystem;
pub use projectile::ProjectileLifecycleSystem;

use kestrel_ecs::{EcsError, Registry};
use tracing::trace;

use crate::config::ArenaConfig;
use crate::events::GameBus;

/// Register every gameplay system with `registry`.
///
/// Call before spawning: systems only match entities created after they
/// are added.
///
/// # Errors
///
/// Fails if a component type cannot be registered.
pub fn install(registry: &mut Registry, arena: ArenaConfig) -> Result<(), EcsError> {
    let movement = MovementSystem::new(registry, arena)?;
    let collision = CollisionSystem::new(registry)?;
    let damage = DamageSystem::new(registry)?;
    let emit = ProjectileEmitSystem::new(registry)?;
    let lifecycle = ProjectileLifecycleSystem::new(registry)?;

    registry.add_system(movement);
    registry.add_system(collision);
    registry.add_system(damage);
    registry.add_system(emit);
    registry.add_system(lifecycle);
    Ok(())
}

/// Run one simulation step of `dt` seconds.
///
/// The bus is cleared and re-subscribed, then movement, collision (which
/// dispatches to the movement and damage handlers), projectile emission and
/// projectile lifetime run in that order. Finally the registry applies the
/// step's deferred creations and kills. Returns the number of collisions.
///
/// # Errors
///
/// Returns [`EcsError::SystemNotFound`] if [`install`] was not called.
pub fn step(registry: &mut Registry, bus: &mut GameBus, dt: f64) -> Result<usize, EcsError> {
    bus.reset();
    MovementSystem::subscribe_to_events(bus);
    DamageSystem::subscribe_to_events(bus);

    MovementSystem::update(registry, dt)?;
    let collisions = CollisionSystem::update(registry, bus)?;
    let emitted = ProjectileEmitSystem::update(registry, dt)?;
    ProjectileLifecycleSystem::update(registry, dt)?;

    registry.update();
    trace!(dt, collisions, emitted, "step complete");
    Ok(collisions)
}
