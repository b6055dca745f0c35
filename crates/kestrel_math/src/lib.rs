//! # kestrel_math
//!
//! Math types for the kestrel engine. Re-exports [`glam`] for linear algebra
//! and defines spatial types that implement
//! [`Component`](kestrel_ecs::Component).

pub mod transform;

// Re-export glam types for convenience.
pub use glam::{Mat3, Vec2};

pub use transform::Transform;
