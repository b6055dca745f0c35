//! The demo scene.

use kestrel_ecs::{EcsError, Entity, Registry};
use kestrel_math::{Transform, Vec2};
use tracing::info;

use crate::components::{BoxCollider, Health, Projectile, ProjectileEmitter, RigidBody};
use crate::labels::{GROUP_ENEMIES, GROUP_OBSTACLES, GROUP_PROJECTILES, TAG_PLAYER};

/// Handles to the entities [`spawn_demo`] created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoScene {
    pub player: Entity,
    pub enemies: Vec<Entity>,
    pub obstacles: Vec<Entity>,
    pub projectiles: Vec<Entity>,
}

impl DemoScene {
    /// Every spawned entity.
    pub fn entities(&self) -> impl Iterator<Item = Entity> + '_ {
        std::iter::once(self.player)
            .chain(self.enemies.iter().copied())
            .chain(self.obstacles.iter().copied())
            .chain(self.projectiles.iter().copied())
    }
}

const SPRITE: f32 = 32.0;
const BULLET: f32 = 4.0;

/// Populate `registry` with a player, two enemies, an obstacle between them,
/// and a pair of projectiles in flight. The second enemy carries a
/// [`ProjectileEmitter`] that fires at the player's side every few seconds.
///
/// Entities become visible to systems at the next registry update.
///
/// # Errors
///
/// Fails if a component type cannot be registered.
pub fn spawn_demo(registry: &mut Registry) -> Result<DemoScene, EcsError> {
    let player = registry.create_entity();
    registry
        .entity(player)
        .add_component(Transform::from_position(Vec2::new(100.0, 300.0)))?
        .add_component(RigidBody::new(Vec2::new(40.0, 0.0)))?
        .add_component(BoxCollider::new(SPRITE, SPRITE))?
        .add_component(Health::new(100))?
        .tag(TAG_PLAYER)?;

    let mut enemies = Vec::new();
    for (position, velocity) in [
        (Vec2::new(600.0, 300.0), Vec2::new(-30.0, 0.0)),
        (Vec2::new(900.0, 500.0), Vec2::new(0.0, -20.0)),
    ] {
        let enemy = registry.create_entity();
        registry
            .entity(enemy)
            .add_component(Transform::from_position(position))?
            .add_component(RigidBody::new(velocity))?
            .add_component(BoxCollider::new(SPRITE, SPRITE))?
            .add_component(Health::new(100))?
            .group(GROUP_ENEMIES)?;
        enemies.push(enemy);
    }
    registry
        .entity(enemies[1])
        .add_component(ProjectileEmitter::new(Vec2::new(-200.0, 0.0), 4000, 2000, 10, false))?;

    let wall = registry.create_entity();
    registry
        .entity(wall)
        .add_component(Transform::from_position(Vec2::new(400.0, 280.0)).scaled(2.0))?
        .add_component(BoxCollider::new(SPRITE, SPRITE))?
        .group(GROUP_OBSTACLES)?;

    let mut projectiles = Vec::new();
    for (position, velocity, friendly) in [
        (Vec2::new(140.0, 316.0), Vec2::new(300.0, 0.0), true),
        (Vec2::new(560.0, 316.0), Vec2::new(-300.0, 0.0), false),
    ] {
        let projectile = registry.create_entity();
        registry
            .entity(projectile)
            .add_component(Transform::from_position(position))?
            .add_component(RigidBody::new(velocity))?
            .add_component(BoxCollider::new(BULLET, BULLET))?
            .add_component(Projectile::new(friendly, 25, 3000))?
            .group(GROUP_PROJECTILES)?;
        projectiles.push(projectile);
    }

    let scene = DemoScene {
        player,
        enemies,
        obstacles: vec![wall],
        projectiles,
    };
    info!(entities = scene.entities().count(), "demo scene spawned");
    Ok(scene)
}
