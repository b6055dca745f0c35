//! Method-call access to one entity.

use crate::component::Component;
use crate::entity::Entity;
use crate::error::EcsError;
use crate::registry::Registry;

/// A mutable borrow of the [`Registry`] scoped to a single entity.
///
/// Every method forwards to the registry operation of the same meaning, so
/// `registry.entity(e).add_component(Health(100))` is
/// `registry.add_component(e, Health(100))`.
pub struct EntityMut<'a> {
    registry: &'a mut Registry,
    entity: Entity,
}

impl<'a> EntityMut<'a> {
    pub(crate) fn new(registry: &'a mut Registry, entity: Entity) -> Self {
        Self { registry, entity }
    }

    /// The entity this handle refers to.
    #[must_use]
    pub fn id(&self) -> Entity {
        self.entity
    }

    /// Attach `component`, replacing an existing one of the same type.
    ///
    /// # Errors
    ///
    /// See [`Registry::add_component`].
    pub fn add_component<T: Component>(&mut self, component: T) -> Result<&mut Self, EcsError> {
        self.registry.add_component(self.entity, component)?;
        Ok(self)
    }

    /// Detach and return the entity's `T`, if it has one.
    pub fn remove_component<T: Component>(&mut self) -> Option<T> {
        self.registry.remove_component::<T>(self.entity)
    }

    /// Returns `true` if the entity has a `T`.
    #[must_use]
    pub fn has_component<T: Component>(&self) -> bool {
        self.registry.has_component::<T>(self.entity)
    }

    /// The entity's `T`.
    ///
    /// # Errors
    ///
    /// See [`Registry::get_component`].
    pub fn get_component<T: Component>(&self) -> Result<&T, EcsError> {
        self.registry.get_component::<T>(self.entity)
    }

    /// The entity's `T`, mutably.
    ///
    /// # Errors
    ///
    /// See [`Registry::get_component_mut`].
    pub fn get_component_mut<T: Component>(&mut self) -> Result<&mut T, EcsError> {
        self.registry.get_component_mut::<T>(self.entity)
    }

    /// Give the entity `tag`, replacing its previous tag.
    ///
    /// # Errors
    ///
    /// See [`Registry::tag_entity`].
    pub fn tag(&mut self, tag: impl Into<String>) -> Result<&mut Self, EcsError> {
        self.registry.tag_entity(self.entity, tag)?;
        Ok(self)
    }

    /// Returns `true` if the entity carries `tag`.
    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.registry.entity_has_tag(self.entity, tag)
    }

    /// Move the entity into `group`.
    ///
    /// # Errors
    ///
    /// See [`Registry::group_entity`].
    pub fn group(&mut self, group: impl Into<String>) -> Result<&mut Self, EcsError> {
        self.registry.group_entity(self.entity, group)?;
        Ok(self)
    }

    /// Returns whether the entity is a member of `group`.
    ///
    /// # Errors
    ///
    /// See [`Registry::entity_belongs_to_group`].
    pub fn belongs_to_group(&self, group: &str) -> Result<bool, EcsError> {
        self.registry.entity_belongs_to_group(self.entity, group)
    }

    /// Queue the entity for destruction at the next registry update.
    pub fn kill(self) {
        self.registry.kill_entity(self.entity);
    }
}
