//! System base data.
//!
//! A system is a unit of logic matched to entities by signature. The data
//! every system shares lives in [`SystemBase`]: the signature of required
//! components and the list of entities currently matching it. The list is a
//! view maintained by the [`Registry`](crate::Registry) during
//! [`update`](crate::Registry::update); systems never own entities.
//!
//! Concrete systems embed a `SystemBase` and implement [`System`] to expose it.
//! Their behaviour is ordinary inherent methods, typically associated
//! functions taking `&mut Registry` so they can read and write components of
//! the entities they iterate.

use std::any::Any;

use crate::component::ComponentTypeId;
use crate::entity::Entity;
use crate::signature::Signature;

/// Required-component signature plus the matched entity list.
#[derive(Debug, Clone, Default)]
pub struct SystemBase {
    signature: Signature,
    entities: Vec<Entity>,
}

impl SystemBase {
    /// A system requiring no components. It matches every entity.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A system requiring every component in `components`.
    #[must_use]
    pub fn requiring(components: impl IntoIterator<Item = ComponentTypeId>) -> Self {
        Self {
            signature: components.into_iter().collect(),
            entities: Vec::new(),
        }
    }

    /// Add `component` to the requirements.
    pub fn require(&mut self, component: ComponentTypeId) -> &mut Self {
        self.signature.set(component, true);
        self
    }

    /// The required-component signature.
    #[must_use]
    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Returns `true` if an entity with `entity_signature` satisfies every
    /// requirement.
    #[must_use]
    pub fn is_interested_in(&self, entity_signature: &Signature) -> bool {
        entity_signature.contains(&self.signature)
    }

    /// Entities matched at the last registry update, in match order.
    #[must_use]
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Returns `true` if `entity` is in the matched list.
    #[must_use]
    pub fn contains(&self, entity: Entity) -> bool {
        self.entities.contains(&entity)
    }

    pub(crate) fn add_entity(&mut self, entity: Entity) {
        self.entities.push(entity);
    }

    pub(crate) fn remove_entity(&mut self, entity: Entity) {
        self.entities.retain(|&e| e != entity);
    }
}

/// Implemented by every concrete system.
///
/// ```rust
/// use kestrel_ecs::{Component, EcsError, Registry, System, SystemBase};
///
/// struct Health(i32);
/// impl Component for Health {}
///
/// struct RegenSystem {
///     base: SystemBase,
/// }
///
/// impl RegenSystem {
///     fn new(registry: &mut Registry) -> Result<Self, EcsError> {
///         let health = registry.register_component::<Health>()?;
///         Ok(Self { base: SystemBase::requiring([health]) })
///     }
/// }
///
/// impl System for RegenSystem {
///     fn base(&self) -> &SystemBase { &self.base }
///     fn base_mut(&mut self) -> &mut SystemBase { &mut self.base }
/// }
/// ```
pub trait System: 'static {
    /// The shared signature/entity-list data.
    fn base(&self) -> &SystemBase;

    /// Mutable access to the shared data.
    fn base_mut(&mut self) -> &mut SystemBase;

    /// A human-readable name used in logs.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Object-safe wrapper the registry stores systems behind.
pub(crate) trait ErasedSystem {
    fn system(&self) -> &dyn System;
    fn system_mut(&mut self) -> &mut dyn System;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

impl<S: System> ErasedSystem for S {
    fn system(&self) -> &dyn System {
        self
    }

    fn system_mut(&mut self) -> &mut dyn System {
        self
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}
