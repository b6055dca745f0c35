//! Projectile hits.

use kestrel_ecs::{EcsError, Entity, Registry, System, SystemBase};
use tracing::{debug, info};

use crate::components::{BoxCollider, Health, Projectile};
use crate::events::{CollisionEvent, GameBus};
use crate::labels::{GROUP_ENEMIES, GROUP_PROJECTILES, in_group, is_player};

/// Applies projectile damage on collision.
///
/// A hostile projectile hitting the player, or a friendly one hitting an
/// enemy, takes its damage off the target's [`Health`], kills the target
/// once health is depleted, and is itself killed. Any other projectile
/// contact is ignored.
#[derive(Debug)]
pub struct DamageSystem {
    base: SystemBase,
}

impl DamageSystem {
    /// # Errors
    ///
    /// Fails if the required component types cannot be registered.
    pub fn new(registry: &mut Registry) -> Result<Self, EcsError> {
        let collider = registry.register_component::<BoxCollider>()?;
        Ok(Self {
            base: SystemBase::requiring([collider]),
        })
    }

    pub fn subscribe_to_events(bus: &mut GameBus) {
        bus.subscribe::<CollisionEvent, _>(Self::on_collision);
    }

    pub fn on_collision(registry: &mut Registry, event: &CollisionEvent, _bus: &mut GameBus) {
        let (a, b) = event.pair();

        if in_group(registry, a, GROUP_PROJECTILES) && is_player(registry, b) {
            on_projectile_hits(registry, a, b, false);
        }
        if is_player(registry, a) && in_group(registry, b, GROUP_PROJECTILES) {
            on_projectile_hits(registry, b, a, false);
        }
        if in_group(registry, a, GROUP_PROJECTILES) && in_group(registry, b, GROUP_ENEMIES) {
            on_projectile_hits(registry, a, b, true);
        }
        if in_group(registry, b, GROUP_PROJECTILES) && in_group(registry, a, GROUP_ENEMIES) {
            on_projectile_hits(registry, b, a, true);
        }
    }
}

/// Resolve `projectile` striking `target`. Only projectiles whose
/// friendliness equals `friendly` do damage.
fn on_projectile_hits(registry: &mut Registry, projectile: Entity, target: Entity, friendly: bool) {
    let Ok(&Projectile {
        is_friendly,
        hit_percent_damage,
        ..
    }) = registry.get_component::<Projectile>(projectile)
    else {
        return;
    };
    if is_friendly != friendly {
        return;
    }

    if let Ok(health) = registry.get_component_mut::<Health>(target) {
        health.percentage -= hit_percent_damage;
        let depleted = health.is_depleted();
        debug!(
            projectile = projectile.id(),
            target = target.id(),
            damage = hit_percent_damage,
            health = health.percentage,
            "projectile hit"
        );
        if depleted {
            info!(target = target.id(), "target destroyed");
            registry.kill_entity(target);
        }
    }
    registry.kill_entity(projectile);
}

impl System for DamageSystem {
    fn base(&self) -> &SystemBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut SystemBase {
        &mut self.base
    }

    fn name(&self) -> &'static str {
        "DamageSystem"
    }
}
