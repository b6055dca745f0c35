//! Timed projectile emission.

use kestrel_ecs::{EcsError, Registry, System, SystemBase};
use kestrel_math::Transform;
use tracing::debug;

use crate::components::{BoxCollider, ProjectileEmitter, RigidBody};
use crate::labels::GROUP_PROJECTILES;

/// Side length of an emitted projectile's collider.
const PROJECTILE_SIZE: f32 = 4.0;

/// Spawns projectiles from every entity carrying a [`ProjectileEmitter`].
#[derive(Debug)]
pub struct ProjectileEmitSystem {
    base: SystemBase,
}

impl ProjectileEmitSystem {
    /// # Errors
    ///
    /// Fails if the required component types cannot be registered.
    pub fn new(registry: &mut Registry) -> Result<Self, EcsError> {
        let transform = registry.register_component::<Transform>()?;
        let emitter = registry.register_component::<ProjectileEmitter>()?;
        Ok(Self {
            base: SystemBase::requiring([transform, emitter]),
        })
    }

    /// Advance each emitter by `dt` seconds and spawn a projectile at the
    /// position of every emitter whose timer ran out. Returns how many were
    /// spawned.
    ///
    /// New projectiles are only created here; they join the other systems
    /// at the next registry update.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::SystemNotFound`] if the system is not registered.
    pub fn update(registry: &mut Registry, dt: f64) -> Result<usize, EcsError> {
        let mut emitted = 0;
        for entity in registry.system_entities::<Self>()? {
            let Ok(&Transform { position, .. }) = registry.get_component::<Transform>(entity)
            else {
                continue;
            };
            let Ok(emitter) = registry.get_component_mut::<ProjectileEmitter>(entity) else {
                continue;
            };
            if !emitter.advance(dt) {
                continue;
            }
            let emitter = *emitter;

            let projectile = registry.create_entity();
            registry
                .entity(projectile)
                .add_component(Transform::from_position(position))?
                .add_component(RigidBody::new(emitter.velocity))?
                .add_component(BoxCollider::new(PROJECTILE_SIZE, PROJECTILE_SIZE))?
                .add_component(emitter.projectile())?
                .group(GROUP_PROJECTILES)?;

            debug!(
                emitter = entity.id(),
                projectile = projectile.id(),
                friendly = emitter.is_friendly,
                "projectile emitted"
            );
            emitted += 1;
        }
        Ok(emitted)
    }
}

impl System for ProjectileEmitSystem {
    fn base(&self) -> &SystemBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut SystemBase {
        &mut self.base
    }

    fn name(&self) -> &'static str {
        "ProjectileEmitSystem"
    }
}
