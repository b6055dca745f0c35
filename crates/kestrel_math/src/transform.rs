//! 2D transform component.

use glam::{Mat3, Vec2};
use kestrel_ecs::Component;
use serde::{Deserialize, Serialize};

/// Position, per-axis scale, and rotation of an entity in the plane.
///
/// Scale multiplies collider extents; rotation is carried for consumers but
/// does not affect axis-aligned collision.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Transform {
    /// World-space position in pixels.
    pub position: Vec2,
    /// Per-axis scale factor.
    pub scale: Vec2,
    /// Rotation in degrees, clockwise.
    pub rotation: f32,
}

impl Transform {
    /// The identity transform: origin, unit scale, no rotation.
    pub const IDENTITY: Self = Self {
        position: Vec2::ZERO,
        scale: Vec2::ONE,
        rotation: 0.0,
    };

    /// Create a transform at `position` with unit scale and no rotation.
    #[must_use]
    pub fn from_position(position: Vec2) -> Self {
        Self {
            position,
            ..Self::IDENTITY
        }
    }

    /// Translate the transform by `offset`.
    #[must_use]
    pub fn translated(mut self, offset: Vec2) -> Self {
        self.position += offset;
        self
    }

    /// Multiply the scale by `factor` on both axes.
    #[must_use]
    pub fn scaled(mut self, factor: f32) -> Self {
        self.scale *= factor;
        self
    }

    /// Add `degrees` to the rotation.
    #[must_use]
    pub fn rotated(mut self, degrees: f32) -> Self {
        self.rotation += degrees;
        self
    }

    /// The 3×3 affine matrix for this transform.
    #[must_use]
    pub fn to_matrix(&self) -> Mat3 {
        Mat3::from_scale_angle_translation(self.scale, self.rotation.to_radians(), self.position)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Component for Transform {
    fn type_name() -> &'static str {
        "Transform"
    }
}
