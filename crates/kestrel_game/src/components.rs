//! Gameplay components.

use kestrel_ecs::Component;
use kestrel_math::{Transform, Vec2};
use serde::{Deserialize, Serialize};

/// Linear velocity in pixels per second.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct RigidBody {
    pub velocity: Vec2,
}

impl RigidBody {
    #[must_use]
    pub fn new(velocity: Vec2) -> Self {
        Self { velocity }
    }
}

impl Component for RigidBody {
    fn type_name() -> &'static str {
        "RigidBody"
    }
}

/// An axis-aligned collision box, in unscaled local pixels.
///
/// The box starts at `offset` from the entity's position; offset and extents
/// are both multiplied by the [`Transform`] scale.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct BoxCollider {
    pub width: f32,
    pub height: f32,
    pub offset: Vec2,
}

impl BoxCollider {
    #[must_use]
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            offset: Vec2::ZERO,
        }
    }

    #[must_use]
    pub fn with_offset(mut self, offset: Vec2) -> Self {
        self.offset = offset;
        self
    }

    /// World-space `(min, max)` corners of the box placed by `transform`.
    #[must_use]
    pub fn bounds(&self, transform: &Transform) -> (Vec2, Vec2) {
        let min = transform.position + self.offset * transform.scale;
        let max = min + Vec2::new(self.width, self.height) * transform.scale;
        (min, max)
    }
}

impl Component for BoxCollider {
    fn type_name() -> &'static str {
        "BoxCollider"
    }
}

/// Remaining health as a percentage. At zero or below the entity dies.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Health {
    pub percentage: i32,
}

impl Health {
    #[must_use]
    pub fn new(percentage: i32) -> Self {
        Self { percentage }
    }

    #[must_use]
    pub fn is_depleted(&self) -> bool {
        self.percentage <= 0
    }
}

impl Default for Health {
    fn default() -> Self {
        Self::new(100)
    }
}

impl Component for Health {
    fn type_name() -> &'static str {
        "Health"
    }
}

/// A short-lived damaging entity.
///
/// Friendly projectiles hurt enemies; hostile ones hurt the player.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Projectile {
    pub is_friendly: bool,
    /// Health percentage removed on hit.
    pub hit_percent_damage: i32,
    /// Lifetime in milliseconds.
    pub duration_ms: u32,
    /// Time alive so far in milliseconds.
    #[serde(default)]
    pub elapsed_ms: f64,
}

impl Projectile {
    #[must_use]
    pub fn new(is_friendly: bool, hit_percent_damage: i32, duration_ms: u32) -> Self {
        Self {
            is_friendly,
            hit_percent_damage,
            duration_ms,
            elapsed_ms: 0.0,
        }
    }

    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.elapsed_ms >= f64::from(self.duration_ms)
    }
}

impl Component for Projectile {
    fn type_name() -> &'static str {
        "Projectile"
    }
}

/// Fires a [`Projectile`] every `repeat_frequency_ms` milliseconds.
///
/// A frequency of zero disables the emitter.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ProjectileEmitter {
    /// Velocity given to each emitted projectile.
    pub velocity: Vec2,
    pub repeat_frequency_ms: u32,
    /// Lifetime of each emitted projectile in milliseconds.
    pub duration_ms: u32,
    pub hit_percent_damage: i32,
    pub is_friendly: bool,
    /// Time since the last emission in milliseconds.
    #[serde(default)]
    pub elapsed_ms: f64,
}

impl ProjectileEmitter {
    #[must_use]
    pub fn new(
        velocity: Vec2,
        repeat_frequency_ms: u32,
        duration_ms: u32,
        hit_percent_damage: i32,
        is_friendly: bool,
    ) -> Self {
        Self {
            velocity,
            repeat_frequency_ms,
            duration_ms,
            hit_percent_damage,
            is_friendly,
            elapsed_ms: 0.0,
        }
    }

    /// Advance the timer by `dt` seconds. Returns `true`, and restarts the
    /// timer, once more than `repeat_frequency_ms` has passed.
    pub fn advance(&mut self, dt: f64) -> bool {
        if self.repeat_frequency_ms == 0 {
            return false;
        }
        self.elapsed_ms += dt * 1000.0;
        if self.elapsed_ms > f64::from(self.repeat_frequency_ms) {
            self.elapsed_ms = 0.0;
            return true;
        }
        false
    }

    /// The projectile component for the next emission.
    #[must_use]
    pub fn projectile(&self) -> Projectile {
        Projectile::new(self.is_friendly, self.hit_percent_damage, self.duration_ms)
    }
}

impl Default for ProjectileEmitter {
    fn default() -> Self {
        Self::new(Vec2::ZERO, 0, 10_000, 10, false)
    }
}

impl Component for ProjectileEmitter {
    fn type_name() -> &'static str {
        "ProjectileEmitter"
    }
}
