//! Projectile lifetime.

use kestrel_ecs::{EcsError, Registry, System, SystemBase};
use tracing::debug;

use crate::components::Projectile;

/// Ages every [`Projectile`] and kills it once its lifetime is spent.
#[derive(Debug)]
pub struct ProjectileLifecycleSystem {
    base: SystemBase,
}

impl ProjectileLifecycleSystem {
    /// # Errors
    ///
    /// Fails if the required component types cannot be registered.
    pub fn new(registry: &mut Registry) -> Result<Self, EcsError> {
        let projectile = registry.register_component::<Projectile>()?;
        Ok(Self {
            base: SystemBase::requiring([projectile]),
        })
    }

    /// Add `dt` seconds to each projectile's age.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::SystemNotFound`] if the system is not registered.
    pub fn update(registry: &mut Registry, dt: f64) -> Result<(), EcsError> {
        for entity in registry.system_entities::<Self>()? {
            let Ok(projectile) = registry.get_component_mut::<Projectile>(entity) else {
                continue;
            };
            projectile.elapsed_ms += dt * 1000.0;
            if projectile.is_expired() {
                debug!(
                    entity = entity.id(),
                    elapsed_ms = projectile.elapsed_ms,
                    "projectile expired"
                );
                registry.kill_entity(entity);
            }
        }
        Ok(())
    }
}

impl System for ProjectileLifecycleSystem {
    fn base(&self) -> &SystemBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut SystemBase {
        &mut self.base
    }

    fn name(&self) -> &'static str {
        "ProjectileLifecycleSystem"
    }
}
