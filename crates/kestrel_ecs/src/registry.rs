//! The entity registry.
//!
//! The [`Registry`] is the single owner of entity state: component pools,
//! per-entity signatures, systems, id allocation, and tag/group labels.
//!
//! ## Deferred structural changes
//!
//! Creating and killing entities only queues them. Nothing is matched against
//! systems or torn down until [`Registry::update`], so a system iterating its
//! entity list mid-step never sees an entity appear or disappear. Adding or
//! removing a component flips the entity's signature bit immediately, but
//! system matching is still only re-run for newly created entities.
//!
//! ## Entity lifecycle
//!
//! ```text
//! Free ─create_entity─▶ PendingAdd ─update─▶ Active ─kill_entity─▶ PendingKill ─update─▶ Free
//! ```

use std::any::TypeId;
use std::collections::{BTreeSet, HashMap};
use std::fmt;

use tracing::{debug, trace, warn};

use crate::component::{Component, ComponentTypeId, ComponentTypes};
use crate::config::RegistryConfig;
use crate::entity::{Entity, EntityAllocator};
use crate::entity_mut::EntityMut;
use crate::error::EcsError;
use crate::pool::{ComponentPool, ErasedPool};
use crate::signature::Signature;
use crate::system::{ErasedSystem, System};

/// Owns every entity, component, system, tag, and group.
pub struct Registry {
    config: RegistryConfig,
    component_types: ComponentTypes,
    /// One pool per component type, indexed by [`ComponentTypeId`]. A slot
    /// stays `None` until the first component of that type is added.
    pools: Vec<Option<Box<dyn ErasedPool>>>,
    /// Which components each entity has, indexed by entity id.
    signatures: Vec<Signature>,
    allocator: EntityAllocator,
    systems: HashMap<TypeId, Box<dyn ErasedSystem>>,
    entities_to_add: BTreeSet<Entity>,
    entities_to_kill: BTreeSet<Entity>,
    entity_per_tag: HashMap<String, Entity>,
    tag_per_entity: HashMap<Entity, String>,
    entities_per_group: HashMap<String, BTreeSet<Entity>>,
    group_per_entity: HashMap<Entity, String>,
}

impl Registry {
    /// Create an empty registry with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    /// Create an empty registry.
    #[must_use]
    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            config,
            component_types: ComponentTypes::new(),
            pools: Vec::new(),
            signatures: Vec::new(),
            allocator: EntityAllocator::new(),
            systems: HashMap::new(),
            entities_to_add: BTreeSet::new(),
            entities_to_kill: BTreeSet::new(),
            entity_per_tag: HashMap::new(),
            tag_per_entity: HashMap::new(),
            entities_per_group: HashMap::new(),
            group_per_entity: HashMap::new(),
        }
    }

    /// The configuration this registry was built with.
    #[must_use]
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    // -- Entities --

    /// Issue a new entity and queue it for system matching at the next
    /// [`update`](Self::update).
    ///
    /// The entity is usable immediately: components, tags, and groups can be
    /// attached before the update runs.
    pub fn create_entity(&mut self) -> Entity {
        let entity = self.allocator.allocate();
        let index = entity.index();
        if index >= self.signatures.len() {
            self.signatures.resize(index + 1, Signature::EMPTY);
        }
        self.signatures[index].reset();
        self.entities_to_add.insert(entity);

        debug!(entity = entity.id(), "entity created");
        entity
    }

    /// Queue `entity` for destruction at the next [`update`](Self::update).
    ///
    /// Killing an entity twice in one step is harmless. Killing an id that is
    /// not alive is ignored.
    pub fn kill_entity(&mut self, entity: Entity) {
        if !self.allocator.is_alive(entity) {
            warn!(entity = entity.id(), "ignoring kill of an entity that is not alive");
            return;
        }
        if self.entities_to_kill.insert(entity) {
            debug!(entity = entity.id(), "entity marked for kill");
        }
    }

    /// Borrow `entity` as a handle with method-call access to its
    /// components, tag, and group.
    pub fn entity(&mut self, entity: Entity) -> EntityMut<'_> {
        EntityMut::new(self, entity)
    }

    /// Returns `true` if `entity` has been created and not yet torn down.
    #[must_use]
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.allocator.is_alive(entity)
    }

    /// Returns `true` if `entity`'s id was released and awaits reuse.
    #[must_use]
    pub fn is_free(&self, entity: Entity) -> bool {
        self.allocator.is_free(entity)
    }

    /// Released ids in the order they will be reissued.
    pub fn free_entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.allocator.free_ids()
    }

    /// Returns the number of live entities, including those pending add or
    /// kill.
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.allocator.count()
    }

    /// Entities created since the last update.
    pub fn pending_additions(&self) -> impl Iterator<Item = Entity> + '_ {
        self.entities_to_add.iter().copied()
    }

    /// Entities killed since the last update.
    pub fn pending_kills(&self) -> impl Iterator<Item = Entity> + '_ {
        self.entities_to_kill.iter().copied()
    }

    /// The component signature of `entity`. Unknown ids have an empty one.
    #[must_use]
    pub fn signature(&self, entity: Entity) -> Signature {
        self.signatures
            .get(entity.index())
            .copied()
            .unwrap_or(Signature::EMPTY)
    }

    /// Apply the step's deferred structural changes.
    ///
    /// First every pending entity is matched against every system and
    /// appended to the lists of the interested ones. Then every killed entity
    /// is removed from all system lists, its signature is cleared, its
    /// components are purged from every pool, its tag and group are released,
    /// and its id returns to the free list. An entity created and killed in
    /// the same step is therefore matched and immediately unmatched.
    pub fn update(&mut self) {
        let added = std::mem::take(&mut self.entities_to_add);
        for &entity in &added {
            self.add_entity_to_systems(entity);
        }

        let killed = std::mem::take(&mut self.entities_to_kill);
        for &entity in &killed {
            self.destroy_entity(entity);
        }

        if !added.is_empty() || !killed.is_empty() {
            debug!(
                added = added.len(),
                killed = killed.len(),
                alive = self.allocator.count(),
                "registry updated"
            );
        }
    }

    fn add_entity_to_systems(&mut self, entity: Entity) {
        let signature = self.signature(entity);
        for system in self.systems.values_mut() {
            let system = system.system_mut();
            let name = system.name();
            let base = system.base_mut();
            if base.is_interested_in(&signature) {
                base.add_entity(entity);
                trace!(entity = entity.id(), system = name, "entity matched");
            }
        }
    }

    fn remove_entity_from_systems(&mut self, entity: Entity) {
        for system in self.systems.values_mut() {
            system.system_mut().base_mut().remove_entity(entity);
        }
    }

    fn destroy_entity(&mut self, entity: Entity) {
        self.remove_entity_from_systems(entity);

        if let Some(signature) = self.signatures.get_mut(entity.index()) {
            signature.reset();
        }
        for pool in self.pools.iter_mut().flatten() {
            pool.remove_entity_from_pool(entity);
        }
        self.remove_entity_tag(entity);
        self.remove_entity_group(entity);
        self.allocator.release(entity);

        debug!(entity = entity.id(), "entity destroyed");
    }

    fn ensure_alive(&self, entity: Entity) -> Result<(), EcsError> {
        if self.allocator.is_alive(entity) {
            Ok(())
        } else {
            Err(EcsError::EntityNotAlive(entity))
        }
    }

    // -- Components --

    /// Return the id of `T`, registering it on first use.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::CapacityExceeded`] if `T` is new and the
    /// component-type limit is reached.
    pub fn register_component<T: Component>(&mut self) -> Result<ComponentTypeId, EcsError> {
        self.component_types.register::<T>()
    }

    /// Returns the id of `T` if it has been registered.
    #[must_use]
    pub fn component_type_id<T: Component>(&self) -> Option<ComponentTypeId> {
        self.component_types.id_of::<T>()
    }

    /// The component type table.
    #[must_use]
    pub fn component_types(&self) -> &ComponentTypes {
        &self.component_types
    }

    /// Attach `component` to `entity`, replacing any existing `T`.
    ///
    /// Sets the entity's signature bit for `T` right away. System lists are
    /// not re-matched until the entity's next pending-add.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::EntityNotAlive`] for an id that is not issued and
    /// [`EcsError::CapacityExceeded`] if `T` cannot be registered.
    pub fn add_component<T: Component>(
        &mut self,
        entity: Entity,
        component: T,
    ) -> Result<(), EcsError> {
        self.ensure_alive(entity)?;
        let id = self.register_component::<T>()?;

        self.pool_entry::<T>(id)?.set(entity, component);
        self.signatures[entity.index()].set(id, true);

        debug!(
            entity = entity.id(),
            component = T::type_name(),
            id = id.index(),
            "component added"
        );
        Ok(())
    }

    /// Detach and return `entity`'s `T`, if it has one.
    pub fn remove_component<T: Component>(&mut self, entity: Entity) -> Option<T> {
        let id = self.component_types.id_of::<T>()?;
        if let Some(signature) = self.signatures.get_mut(entity.index()) {
            signature.set(id, false);
        }
        let removed = self.pool_mut::<T>()?.remove(entity)?;

        debug!(
            entity = entity.id(),
            component = T::type_name(),
            id = id.index(),
            "component removed"
        );
        Some(removed)
    }

    /// Returns `true` if `entity` currently has a `T`.
    ///
    /// Never fails: unknown component types and out-of-range ids answer
    /// `false`.
    #[must_use]
    pub fn has_component<T: Component>(&self, entity: Entity) -> bool {
        let Some(id) = self.component_types.id_of::<T>() else {
            return false;
        };
        self.signatures
            .get(entity.index())
            .is_some_and(|signature| signature.test(id))
    }

    /// Borrow `entity`'s `T`.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::ComponentNotFound`] if the entity has no `T`.
    pub fn get_component<T: Component>(&self, entity: Entity) -> Result<&T, EcsError> {
        self.pool::<T>()
            .and_then(|pool| pool.get(entity))
            .ok_or(EcsError::ComponentNotFound {
                entity,
                component: T::type_name(),
            })
    }

    /// Mutably borrow `entity`'s `T`.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::ComponentNotFound`] if the entity has no `T`.
    pub fn get_component_mut<T: Component>(&mut self, entity: Entity) -> Result<&mut T, EcsError> {
        self.pool_mut::<T>()
            .and_then(|pool| pool.get_mut(entity))
            .ok_or(EcsError::ComponentNotFound {
                entity,
                component: T::type_name(),
            })
    }

    /// The packed pool of `T`, if any `T` was ever added.
    #[must_use]
    pub fn pool<T: Component>(&self) -> Option<&ComponentPool<T>> {
        let id = self.component_types.id_of::<T>()?;
        self.pools
            .get(id.index())?
            .as_ref()?
            .as_any()
            .downcast_ref::<ComponentPool<T>>()
    }

    /// The packed pool of `T`, mutably.
    ///
    /// Writing through the pool never changes signatures; use
    /// [`add_component`](Self::add_component) and
    /// [`remove_component`](Self::remove_component) for structural changes.
    #[must_use]
    pub fn pool_mut<T: Component>(&mut self) -> Option<&mut ComponentPool<T>> {
        let id = self.component_types.id_of::<T>()?;
        self.pools
            .get_mut(id.index())?
            .as_mut()?
            .as_any_mut()
            .downcast_mut::<ComponentPool<T>>()
    }

    /// The pool bound to `id`, created on first use.
    fn pool_entry<T: Component>(
        &mut self,
        id: ComponentTypeId,
    ) -> Result<&mut ComponentPool<T>, EcsError> {
        if id.index() >= self.pools.len() {
            self.pools.resize_with(id.index() + 1, || None);
        }
        let capacity = self.config.initial_pool_capacity;
        self.pools[id.index()]
            .get_or_insert_with(|| Box::new(ComponentPool::<T>::with_capacity(capacity)))
            .as_any_mut()
            .downcast_mut::<ComponentPool<T>>()
            .ok_or(EcsError::PoolTypeMismatch {
                component: T::type_name(),
            })
    }

    // -- Systems --

    /// Register `system`, replacing any system of the same type.
    ///
    /// Only entities created after this call are matched against it.
    pub fn add_system<S: System>(&mut self, system: S) {
        let name = system.name();
        if self
            .systems
            .insert(TypeId::of::<S>(), Box::new(system))
            .is_some()
        {
            warn!(system = name, "replaced an existing system of the same type");
        } else {
            debug!(system = name, "system added");
        }
    }

    /// Unregister and return the system of type `S`.
    pub fn remove_system<S: System>(&mut self) -> Option<S> {
        let system = self.systems.remove(&TypeId::of::<S>())?;
        let system = system.into_any().downcast::<S>().ok()?;
        debug!(system = system.name(), "system removed");
        Some(*system)
    }

    /// Returns `true` if a system of type `S` is registered.
    #[must_use]
    pub fn has_system<S: System>(&self) -> bool {
        self.systems.contains_key(&TypeId::of::<S>())
    }

    /// Borrow the system of type `S`.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::SystemNotFound`] if no such system is registered.
    pub fn get_system<S: System>(&self) -> Result<&S, EcsError> {
        self.systems
            .get(&TypeId::of::<S>())
            .and_then(|system| system.as_any().downcast_ref::<S>())
            .ok_or(EcsError::SystemNotFound(std::any::type_name::<S>()))
    }

    /// Mutably borrow the system of type `S`.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::SystemNotFound`] if no such system is registered.
    pub fn get_system_mut<S: System>(&mut self) -> Result<&mut S, EcsError> {
        self.systems
            .get_mut(&TypeId::of::<S>())
            .and_then(|system| system.as_any_mut().downcast_mut::<S>())
            .ok_or(EcsError::SystemNotFound(std::any::type_name::<S>()))
    }

    /// A copy of the entity list matched by system `S`.
    ///
    /// Copying lets the caller mutate the registry while iterating.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::SystemNotFound`] if no such system is registered.
    pub fn system_entities<S: System>(&self) -> Result<Vec<Entity>, EcsError> {
        Ok(self.get_system::<S>()?.base().entities().to_vec())
    }

    // -- Tags --

    /// Label `entity` with `tag`.
    ///
    /// An entity holds at most one tag and a tag names at most one entity: an
    /// entity's previous tag is released, and a tag held by another entity
    /// moves to this one.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::EntityNotAlive`] for an id that is not issued.
    pub fn tag_entity(&mut self, entity: Entity, tag: impl Into<String>) -> Result<(), EcsError> {
        self.ensure_alive(entity)?;
        let tag = tag.into();

        self.remove_entity_tag(entity);
        if let Some(previous) = self.entity_per_tag.insert(tag.clone(), entity) {
            self.tag_per_entity.remove(&previous);
            debug!(tag = %tag, from = previous.id(), to = entity.id(), "tag moved");
        }
        trace!(entity = entity.id(), tag = %tag, "entity tagged");
        self.tag_per_entity.insert(entity, tag);
        Ok(())
    }

    /// Returns `true` if `entity` carries `tag`.
    #[must_use]
    pub fn entity_has_tag(&self, entity: Entity, tag: &str) -> bool {
        self.tag_per_entity
            .get(&entity)
            .is_some_and(|current| current == tag)
    }

    /// The tag `entity` carries, if any.
    #[must_use]
    pub fn entity_tag(&self, entity: Entity) -> Option<&str> {
        self.tag_per_entity.get(&entity).map(String::as_str)
    }

    /// Look up the entity carrying `tag`.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::TagNotFound`] if no entity carries it.
    pub fn get_entity_by_tag(&self, tag: &str) -> Result<Entity, EcsError> {
        self.entity_per_tag
            .get(tag)
            .copied()
            .ok_or_else(|| EcsError::TagNotFound(tag.to_string()))
    }

    /// Release `entity`'s tag, returning it.
    pub fn remove_entity_tag(&mut self, entity: Entity) -> Option<String> {
        let tag = self.tag_per_entity.remove(&entity)?;
        self.entity_per_tag.remove(&tag);
        Some(tag)
    }

    // -- Groups --

    /// Put `entity` in `group`, creating the group on first use.
    ///
    /// An entity belongs to at most one group; it leaves its previous group.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::EntityNotAlive`] for an id that is not issued.
    pub fn group_entity(
        &mut self,
        entity: Entity,
        group: impl Into<String>,
    ) -> Result<(), EcsError> {
        self.ensure_alive(entity)?;
        let group = group.into();

        self.remove_entity_group(entity);
        self.entities_per_group
            .entry(group.clone())
            .or_default()
            .insert(entity);
        trace!(entity = entity.id(), group = %group, "entity grouped");
        self.group_per_entity.insert(entity, group);
        Ok(())
    }

    /// Returns whether `entity` is a member of `group`.
    ///
    /// A group stays known once created, even after its last member leaves.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::GroupNotFound`] if `group` was never created.
    pub fn entity_belongs_to_group(&self, entity: Entity, group: &str) -> Result<bool, EcsError> {
        self.entities_per_group
            .get(group)
            .map(|members| members.contains(&entity))
            .ok_or_else(|| EcsError::GroupNotFound(group.to_string()))
    }

    /// The group `entity` belongs to, if any.
    #[must_use]
    pub fn entity_group(&self, entity: Entity) -> Option<&str> {
        self.group_per_entity.get(&entity).map(String::as_str)
    }

    /// The members of `group`, lowest id first.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::GroupNotFound`] if `group` was never created.
    pub fn get_entities_by_group(&self, group: &str) -> Result<Vec<Entity>, EcsError> {
        self.entities_per_group
            .get(group)
            .map(|members| members.iter().copied().collect())
            .ok_or_else(|| EcsError::GroupNotFound(group.to_string()))
    }

    /// Take `entity` out of its group, returning the group name.
    pub fn remove_entity_group(&mut self, entity: Entity) -> Option<String> {
        let group = self.group_per_entity.remove(&entity)?;
        if let Some(members) = self.entities_per_group.get_mut(&group) {
            members.remove(&entity);
        }
        Some(group)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("entities", &self.allocator.count())
            .field("component_types", &self.component_types.len())
            .field(
                "systems",
                &self
                    .systems
                    .values()
                    .map(|system| system.system().name())
                    .collect::<Vec<_>>(),
            )
            .field("pending_add", &self.entities_to_add.len())
            .field("pending_kill", &self.entities_to_kill.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::SystemBase;

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct Position {
        x: f64,
        y: f64,
    }
    impl Component for Position {}

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct Velocity {
        x: f64,
        y: f64,
    }
    impl Component for Velocity {}

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct Health(i32);
    impl Component for Health {}

    struct MovementSystem {
        base: SystemBase,
    }

    impl MovementSystem {
        fn new(registry: &mut Registry) -> Result<Self, EcsError> {
            let position = registry.register_component::<Position>()?;
            let velocity = registry.register_component::<Velocity>()?;
            Ok(Self {
                base: SystemBase::requiring([position, velocity]),
            })
        }

        fn update(registry: &mut Registry, dt: f64) -> Result<(), EcsError> {
            for entity in registry.system_entities::<Self>()? {
                let velocity = *registry.get_component::<Velocity>(entity)?;
                let position = registry.get_component_mut::<Position>(entity)?;
                position.x += velocity.x * dt;
                position.y += velocity.y * dt;
            }
            Ok(())
        }
    }

    impl System for MovementSystem {
        fn base(&self) -> &SystemBase {
            &self.base
        }

        fn base_mut(&mut self) -> &mut SystemBase {
            &mut self.base
        }
    }

    struct HealthSystem {
        base: SystemBase,
    }

    impl HealthSystem {
        fn new(registry: &mut Registry) -> Result<Self, EcsError> {
            let health = registry.register_component::<Health>()?;
            Ok(Self {
                base: SystemBase::requiring([health]),
            })
        }
    }

    impl System for HealthSystem {
        fn base(&self) -> &SystemBase {
            &self.base
        }

        fn base_mut(&mut self) -> &mut SystemBase {
            &mut self.base
        }
    }

    fn registry_with_movement() -> Registry {
        let mut registry = Registry::new();
        let movement = MovementSystem::new(&mut registry).unwrap();
        registry.add_system(movement);
        registry
    }

    #[test]
    fn test_create_entity_ids_are_sequential() {
        let mut registry = Registry::new();
        assert_eq!(registry.create_entity().id(), 0);
        assert_eq!(registry.create_entity().id(), 1);
        assert_eq!(registry.entity_count(), 2);
        assert_eq!(registry.pending_additions().count(), 2);
    }

    #[test]
    fn test_add_and_get_component() {
        let mut registry = Registry::new();
        let e = registry.create_entity();
        registry.add_component(e, Position { x: 1.0, y: 2.0 }).unwrap();

        assert!(registry.has_component::<Position>(e));
        assert!(!registry.has_component::<Velocity>(e));
        assert_eq!(
            registry.get_component::<Position>(e).unwrap(),
            &Position { x: 1.0, y: 2.0 }
        );

        let id = registry.component_type_id::<Position>().unwrap();
        assert!(registry.signature(e).test(id));
    }

    #[test]
    fn test_add_component_overwrites() {
        let mut registry = Registry::new();
        let e = registry.create_entity();
        registry.add_component(e, Health(10)).unwrap();
        registry.add_component(e, Health(3)).unwrap();
        assert_eq!(registry.get_component::<Health>(e).unwrap(), &Health(3));
        assert_eq!(registry.pool::<Health>().unwrap().len(), 1);
    }

    #[test]
    fn test_get_component_missing_is_not_found() {
        let mut registry = Registry::new();
        let e = registry.create_entity();

        // Type never registered.
        let err = registry.get_component::<Health>(e).unwrap_err();
        assert!(matches!(err, EcsError::ComponentNotFound { entity, .. } if entity == e));

        // Type registered, entity lacks it.
        let other = registry.create_entity();
        registry.add_component(other, Health(1)).unwrap();
        assert!(registry.get_component::<Health>(e).is_err());
        assert!(registry.get_component_mut::<Health>(e).is_err());
    }

    #[test]
    fn test_has_component_is_bounds_safe() {
        let mut registry = Registry::new();
        let stranger = Entity::from_raw(1_000);
        assert!(!registry.has_component::<Position>(stranger));

        let e = registry.create_entity();
        registry.add_component(e, Position { x: 0.0, y: 0.0 }).unwrap();
        assert!(!registry.has_component::<Position>(stranger));
    }

    #[test]
    fn test_remove_component() {
        let mut registry = Registry::new();
        let e = registry.create_entity();
        registry.add_component(e, Health(5)).unwrap();

        assert_eq!(registry.remove_component::<Health>(e), Some(Health(5)));
        assert!(!registry.has_component::<Health>(e));
        assert!(registry.get_component::<Health>(e).is_err());
        assert_eq!(registry.remove_component::<Health>(e), None);
        assert_eq!(registry.remove_component::<Velocity>(e), None);
    }

    #[test]
    fn test_add_component_to_dead_entity() {
        let mut registry = Registry::new();
        let e = registry.create_entity();
        registry.kill_entity(e);
        registry.update();

        let err = registry.add_component(e, Health(1)).unwrap_err();
        assert_eq!(err, EcsError::EntityNotAlive(e));
        assert!(registry
            .add_component(Entity::from_raw(77), Health(1))
            .is_err());
    }

    #[test]
    fn test_update_matches_by_signature_subset() {
        let mut registry = registry_with_movement();

        let mover = registry.create_entity();
        registry.add_component(mover, Position { x: 0.0, y: 0.0 }).unwrap();
        registry.add_component(mover, Velocity { x: 1.0, y: 0.0 }).unwrap();
        registry.add_component(mover, Health(3)).unwrap();

        let statue = registry.create_entity();
        registry.add_component(statue, Position { x: 0.0, y: 0.0 }).unwrap();

        registry.update();
        let matched = registry.system_entities::<MovementSystem>().unwrap();
        assert_eq!(matched, vec![mover]);
    }

    #[test]
    fn test_creation_is_deferred_until_update() {
        let mut registry = registry_with_movement();
        let e = registry.create_entity();
        registry.add_component(e, Position { x: 0.0, y: 0.0 }).unwrap();
        registry.add_component(e, Velocity { x: 0.0, y: 0.0 }).unwrap();

        assert!(registry.system_entities::<MovementSystem>().unwrap().is_empty());
        registry.update();
        assert_eq!(registry.system_entities::<MovementSystem>().unwrap(), vec![e]);
        assert_eq!(registry.pending_additions().count(), 0);
    }

    #[test]
    fn test_kill_is_deferred_until_update() {
        let mut registry = registry_with_movement();
        let e = registry.create_entity();
        registry.add_component(e, Position { x: 0.0, y: 0.0 }).unwrap();
        registry.add_component(e, Velocity { x: 0.0, y: 0.0 }).unwrap();
        registry.update();

        registry.kill_entity(e);
        assert_eq!(registry.pending_kills().collect::<Vec<_>>(), vec![e]);
        assert_eq!(registry.system_entities::<MovementSystem>().unwrap(), vec![e]);
        assert!(registry.has_component::<Position>(e));
        assert!(registry.is_alive(e));

        registry.update();
        assert!(registry.system_entities::<MovementSystem>().unwrap().is_empty());
        assert!(!registry.is_alive(e));
        assert!(registry.is_free(e));
    }

    #[test]
    fn test_kill_purges_components_tag_and_group() {
        let mut registry = Registry::new();
        let e = registry.create_entity();
        registry.add_component(e, Position { x: 0.0, y: 0.0 }).unwrap();
        registry.add_component(e, Health(2)).unwrap();
        registry.tag_entity(e, "player").unwrap();
        registry.group_entity(e, "heroes").unwrap();
        registry.update();

        registry.kill_entity(e);
        registry.update();

        assert_eq!(registry.signature(e), Signature::EMPTY);
        assert!(registry.pool::<Position>().unwrap().is_empty());
        assert!(registry.pool::<Health>().unwrap().is_empty());
        assert!(registry.get_entity_by_tag("player").is_err());
        assert_eq!(registry.entity_tag(e), None);
        assert!(registry.get_entities_by_group("heroes").unwrap().is_empty());
        assert_eq!(registry.entity_group(e), None);
    }

    #[test]
    fn test_created_and_killed_in_same_step() {
        let mut registry = Registry::new();
        let health = HealthSystem::new(&mut registry).unwrap();
        registry.add_system(health);

        let e = registry.create_entity();
        registry.add_component(e, Health(1)).unwrap();
        registry.kill_entity(e);
        registry.update();

        assert!(registry.system_entities::<HealthSystem>().unwrap().is_empty());
        assert!(registry.is_free(e));
        assert!(registry.pool::<Health>().unwrap().is_empty());
    }

    #[test]
    fn test_double_kill_releases_id_once() {
        let mut registry = Registry::new();
        let e = registry.create_entity();
        registry.update();

        registry.kill_entity(e);
        registry.kill_entity(e);
        registry.update();
        // Already free: ignored.
        registry.kill_entity(e);
        registry.update();

        assert_eq!(registry.free_entities().collect::<Vec<_>>(), vec![e]);
        assert_eq!(registry.create_entity(), e);
        assert_eq!(registry.create_entity().id(), 1);
    }

    #[test]
    fn test_recycled_entity_is_clean() {
        let mut registry = registry_with_movement();
        let _first = registry.create_entity();
        let victim = registry.create_entity();
        registry.add_component(victim, Position { x: 1.0, y: 1.0 }).unwrap();
        registry.add_component(victim, Velocity { x: 1.0, y: 1.0 }).unwrap();
        registry.tag_entity(victim, "boss").unwrap();
        registry.group_entity(victim, "enemies").unwrap();
        registry.update();

        registry.kill_entity(victim);
        registry.update();

        let recycled = registry.create_entity();
        assert_eq!(recycled, victim);
        assert_eq!(registry.signature(recycled), Signature::EMPTY);
        assert!(!registry.has_component::<Position>(recycled));
        assert!(!registry.entity_has_tag(recycled, "boss"));
        assert_eq!(registry.entity_belongs_to_group(recycled, "enemies"), Ok(false));

        // No stale system membership either.
        registry.update();
        assert!(registry.system_entities::<MovementSystem>().unwrap().is_empty());
        assert_eq!(registry.create_entity().id(), 2);
    }

    #[test]
    fn test_component_change_does_not_rematch() {
        let mut registry = registry_with_movement();
        let e = registry.create_entity();
        registry.add_component(e, Position { x: 0.0, y: 0.0 }).unwrap();
        registry.update();
        assert!(registry.system_entities::<MovementSystem>().unwrap().is_empty());

        // The signature now satisfies the system, but matching only runs for
        // pending additions.
        registry.add_component(e, Velocity { x: 0.0, y: 0.0 }).unwrap();
        registry.update();
        assert!(registry.system_entities::<MovementSystem>().unwrap().is_empty());
    }

    #[test]
    fn test_movement_scenario() {
        let mut registry = registry_with_movement();

        let e = registry.create_entity();
        registry.add_component(e, Position { x: 0.0, y: 0.0 }).unwrap();
        registry.add_component(e, Velocity { x: 5.0, y: 0.0 }).unwrap();
        registry.update();
        assert_eq!(registry.system_entities::<MovementSystem>().unwrap(), vec![e]);

        MovementSystem::update(&mut registry, 1.0).unwrap();
        assert_eq!(
            registry.get_component::<Position>(e).unwrap(),
            &Position { x: 5.0, y: 0.0 }
        );

        registry.kill_entity(e);
        registry.update();
        assert!(registry.system_entities::<MovementSystem>().unwrap().is_empty());
        assert!(registry.free_entities().any(|free| free == e));
    }

    #[test]
    fn test_pool_stays_dense_across_kills() {
        let mut registry = Registry::new();
        let entities: Vec<Entity> = (0..5).map(|_| registry.create_entity()).collect();
        for (i, &e) in entities.iter().enumerate() {
            registry.add_component(e, Health(i as i32)).unwrap();
        }
        registry.update();

        registry.kill_entity(entities[1]);
        registry.kill_entity(entities[3]);
        registry.update();

        let pool = registry.pool::<Health>().unwrap();
        assert_eq!(pool.len(), 3);
        for &survivor in &[entities[0], entities[2], entities[4]] {
            assert_eq!(
                registry.get_component::<Health>(survivor).unwrap(),
                &Health(survivor.id() as i32)
            );
        }
    }

    #[test]
    fn test_pool_mut_iteration() {
        let mut registry = Registry::new();
        for _ in 0..3 {
            let e = registry.create_entity();
            registry.add_component(e, Health(1)).unwrap();
        }
        for (_entity, health) in registry.pool_mut::<Health>().unwrap().iter_mut() {
            health.0 += 1;
        }
        assert!(registry
            .pool::<Health>()
            .unwrap()
            .iter()
            .all(|(_, health)| health.0 == 2));
    }

    #[test]
    fn test_system_registry_by_type() {
        let mut registry = Registry::new();
        assert!(!registry.has_system::<MovementSystem>());
        assert_eq!(
            registry.get_system::<MovementSystem>().err(),
            Some(EcsError::SystemNotFound(std::any::type_name::<MovementSystem>()))
        );

        let movement = MovementSystem::new(&mut registry).unwrap();
        registry.add_system(movement);
        assert!(registry.has_system::<MovementSystem>());
        assert!(registry.get_system::<MovementSystem>().is_ok());
        assert!(registry.get_system_mut::<MovementSystem>().is_ok());
        assert!(!registry.has_system::<HealthSystem>());

        let removed = registry.remove_system::<MovementSystem>();
        assert!(removed.is_some());
        assert!(!registry.has_system::<MovementSystem>());
        assert!(registry.remove_system::<MovementSystem>().is_none());
    }

    #[test]
    fn test_add_system_replaces_same_type() {
        let mut registry = registry_with_movement();
        let e = registry.create_entity();
        registry.add_component(e, Position { x: 0.0, y: 0.0 }).unwrap();
        registry.add_component(e, Velocity { x: 0.0, y: 0.0 }).unwrap();
        registry.update();

        let fresh = MovementSystem::new(&mut registry).unwrap();
        registry.add_system(fresh);
        assert!(registry.system_entities::<MovementSystem>().unwrap().is_empty());
    }

    #[test]
    fn test_tag_lookup_scenario() {
        let mut registry = Registry::new();
        let a = registry.create_entity();
        registry.tag_entity(a, "player").unwrap();

        assert_eq!(registry.get_entity_by_tag("player"), Ok(a));
        assert_eq!(
            registry.get_entity_by_tag("enemy"),
            Err(EcsError::TagNotFound("enemy".to_string()))
        );
        assert!(!registry.entity_has_tag(a, "enemy"));
        assert!(registry.entity_has_tag(a, "player"));
    }

    #[test]
    fn test_retag_replaces_and_moves() {
        let mut registry = Registry::new();
        let a = registry.create_entity();
        let b = registry.create_entity();

        registry.tag_entity(a, "player").unwrap();
        registry.tag_entity(a, "hero").unwrap();
        assert!(registry.get_entity_by_tag("player").is_err());
        assert_eq!(registry.get_entity_by_tag("hero"), Ok(a));

        // The tag moves to b; a is left untagged.
        registry.tag_entity(b, "hero").unwrap();
        assert_eq!(registry.get_entity_by_tag("hero"), Ok(b));
        assert_eq!(registry.entity_tag(a), None);
        assert!(!registry.entity_has_tag(a, "hero"));
    }

    #[test]
    fn test_remove_entity_tag() {
        let mut registry = Registry::new();
        let a = registry.create_entity();
        registry.tag_entity(a, "player").unwrap();
        assert_eq!(registry.remove_entity_tag(a), Some("player".to_string()));
        assert_eq!(registry.remove_entity_tag(a), None);
        assert!(registry.get_entity_by_tag("player").is_err());
    }

    #[test]
    fn test_groups() {
        let mut registry = Registry::new();
        let a = registry.create_entity();
        let b = registry.create_entity();
        let c = registry.create_entity();
        registry.group_entity(b, "enemies").unwrap();
        registry.group_entity(a, "enemies").unwrap();
        registry.group_entity(c, "obstacles").unwrap();

        assert_eq!(registry.get_entities_by_group("enemies"), Ok(vec![a, b]));
        assert_eq!(registry.entity_belongs_to_group(a, "enemies"), Ok(true));
        assert_eq!(registry.entity_belongs_to_group(c, "enemies"), Ok(false));
        assert_eq!(registry.entity_group(c), Some("obstacles"));
    }

    #[test]
    fn test_unknown_group_is_not_found() {
        let mut registry = Registry::new();
        let a = registry.create_entity();
        assert_eq!(
            registry.get_entities_by_group("ghosts"),
            Err(EcsError::GroupNotFound("ghosts".to_string()))
        );
        assert_eq!(
            registry.entity_belongs_to_group(a, "ghosts"),
            Err(EcsError::GroupNotFound("ghosts".to_string()))
        );
    }

    #[test]
    fn test_regroup_moves_entity() {
        let mut registry = Registry::new();
        let a = registry.create_entity();
        registry.group_entity(a, "enemies").unwrap();
        registry.group_entity(a, "allies").unwrap();

        assert_eq!(registry.entity_belongs_to_group(a, "enemies"), Ok(false));
        assert_eq!(registry.entity_belongs_to_group(a, "allies"), Ok(true));
        assert_eq!(registry.remove_entity_group(a), Some("allies".to_string()));
        assert_eq!(registry.entity_group(a), None);
    }

    #[test]
    fn test_tag_dead_entity_fails() {
        let mut registry = Registry::new();
        let stranger = Entity::from_raw(3);
        assert_eq!(
            registry.tag_entity(stranger, "x"),
            Err(EcsError::EntityNotAlive(stranger))
        );
        assert_eq!(
            registry.group_entity(stranger, "x"),
            Err(EcsError::EntityNotAlive(stranger))
        );
    }

    #[test]
    fn test_initial_pool_capacity() {
        let mut registry =
            Registry::with_config(RegistryConfig::default().with_initial_pool_capacity(4));
        let e = registry.create_entity();
        registry.add_component(e, Health(1)).unwrap();
        assert_eq!(registry.config().initial_pool_capacity, 4);
        assert_eq!(registry.pool::<Health>().unwrap().len(), 1);
    }

    #[test]
    fn test_add_component_past_capacity() {
        use crate::signature::MAX_COMPONENTS;

        struct Slot<const N: usize>;
        impl<const N: usize> Component for Slot<N> {}

        macro_rules! add_slots {
            ($registry:expr, $entity:expr, $($n:literal)*) => {
                $( $registry.add_component($entity, Slot::<$n>).unwrap(); )*
            };
        }

        let mut registry = Registry::new();
        let e = registry.create_entity();
        add_slots!(registry, e, 0 1 2 3 4 5 6 7 8 9 10 11 12 13 14 15
            16 17 18 19 20 21 22 23 24 25 26 27 28 29 30 31);
        assert_eq!(registry.component_types().len(), MAX_COMPONENTS);
        let before = registry.signature(e);
        assert_eq!(before.len(), MAX_COMPONENTS);

        let err = registry.add_component(e, Health(1)).unwrap_err();
        assert!(matches!(
            err,
            EcsError::CapacityExceeded { max: MAX_COMPONENTS, .. }
        ));
        assert_eq!(registry.signature(e), before);
        assert!(!registry.has_component::<Health>(e));
        assert!(registry.pool::<Health>().is_none());
        assert!(registry.component_type_id::<Health>().is_none());

        // Registered types still accept components.
        let other = registry.create_entity();
        registry.add_component(other, Slot::<7>).unwrap();
        assert_eq!(registry.pool::<Slot<7>>().unwrap().len(), 2);
    }
}
