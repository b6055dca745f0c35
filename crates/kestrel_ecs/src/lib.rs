//! # kestrel_ecs
//!
//! The entity-component-system core of the kestrel engine.
//!
//! This crate provides:
//!
//! - [`Entity`] — bare `u64` identifiers, recycled first-in first-out.
//! - [`Component`] — the marker trait for data attached to entities, and
//!   [`ComponentTypeId`], the dense per-registry index of each type.
//! - [`Signature`] — a 32-bit mask of the components an entity has or a
//!   system requires.
//! - [`ComponentPool`] — packed per-type storage with swap-remove.
//! - [`SystemBase`] and [`System`] — signature-matched entity lists.
//! - [`Registry`] — owner of all of the above, with deferred entity creation
//!   and destruction applied by [`Registry::update`], plus tags and groups.
//!
//! ## Usage
//!
//! ```rust
//! use kestrel_ecs::{Component, Registry};
//!
//! #[derive(Debug, PartialEq)]
//! struct Health(i32);
//! impl Component for Health {}
//!
//! let mut registry = Registry::new();
//! let player = registry.create_entity();
//! registry.add_component(player, Health(100)).unwrap();
//! registry.tag_entity(player, "player").unwrap();
//! registry.update();
//!
//! assert_eq!(registry.get_entity_by_tag("player"), Ok(player));
//! assert_eq!(registry.get_component::<Health>(player), Ok(&Health(100)));
//! ```

pub mod component;
pub mod config;
pub mod entity;
pub mod entity_mut;
pub mod error;
pub mod pool;
pub mod registry;
pub mod signature;
pub mod system;

pub use component::{Component, ComponentTypeId, ComponentTypes};
pub use config::RegistryConfig;
pub use entity::{Entity, EntityAllocator};
pub use entity_mut::EntityMut;
pub use error::EcsError;
pub use pool::{ComponentPool, ErasedPool};
pub use registry::Registry;
pub use signature::{MAX_COMPONENTS, Signature};
pub use system::{System, SystemBase};
