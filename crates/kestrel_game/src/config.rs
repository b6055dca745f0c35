//! Arena configuration.

use kestrel_math::Vec2;
use serde::Deserialize;

/// The playable area, in pixels, with the origin at the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    pub width: f32,
    pub height: f32,
    /// How far outside the arena a non-player entity may drift before it is
    /// destroyed.
    pub margin: f32,
}

impl ArenaConfig {
    /// Inset of the player clamp from the left and top edges.
    pub const PLAYER_INSET_MIN: Vec2 = Vec2::splat(10.0);
    /// Inset of the player clamp from the right and bottom edges.
    pub const PLAYER_INSET_MAX: Vec2 = Vec2::splat(50.0);

    #[must_use]
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_margin(mut self, margin: f32) -> Self {
        self.margin = margin;
        self
    }

    #[must_use]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Clamp `position` to the region the player may occupy.
    ///
    /// On an arena too small for the insets the far edge wins.
    #[must_use]
    pub fn clamp_player(&self, position: Vec2) -> Vec2 {
        position
            .max(Self::PLAYER_INSET_MIN)
            .min(self.size() - Self::PLAYER_INSET_MAX)
    }

    /// Returns `true` if `position` lies more than `margin` outside the arena.
    #[must_use]
    pub fn is_out_of_bounds(&self, position: Vec2) -> bool {
        position.x < -self.margin
            || position.x > self.width + self.margin
            || position.y < -self.margin
            || position.y > self.height + self.margin
    }
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            width: 1600.0,
            height: 800.0,
            margin: 100.0,
        }
    }
}
