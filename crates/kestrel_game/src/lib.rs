//! # kestrel_game
//!
//! Gameplay for the kestrel engine, written purely against the public
//! registry and event bus API.
//!
//! This crate provides:
//!
//! - [`components`] — rigid bodies, box colliders, health, projectiles, and
//!   projectile emitters.
//! - [`events`] — [`CollisionEvent`] and the [`GameBus`] alias.
//! - [`labels`] — the tag and group names gameplay rules key on.
//! - [`systems`] — movement, collision, damage, projectile emission and lifetime,
//!   plus [`step`](systems::step), which runs one simulation step in order.
//! - [`scene`] — a small demo scene.

pub mod components;
pub mod config;
pub mod events;
pub mod labels;
pub mod scene;
pub mod systems;

pub use components::{BoxCollider, Health, Projectile, ProjectileEmitter, RigidBody};
pub use config::ArenaConfig;
pub use events::{CollisionEvent, GameBus};
pub use systems::{
    CollisionSystem, DamageSystem, MovementSystem, ProjectileEmitSystem,
    ProjectileLifecycleSystem, install, step,
};
