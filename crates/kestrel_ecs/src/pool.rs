//! Packed per-type component storage.
//!
//! A [`ComponentPool`] keeps every live component of one type in a contiguous
//! `Vec<T>` with no gaps, plus two index maps:
//!
//! - `entity → slot`, for O(1) lookup by entity;
//! - `slot → entity`, so a removal can repair the entry of the element that
//!   was swapped into the hole.
//!
//! Slots move on removal. Never hold a slot index across a mutation; look the
//! component up by entity again.

use std::any::Any;
use std::collections::HashMap;

use crate::entity::Entity;

/// Densely packed storage for components of type `T`.
#[derive(Debug, Clone)]
pub struct ComponentPool<T> {
    /// Live components, `data[i]` belongs to `entities[i]`.
    data: Vec<T>,
    /// Slot → entity.
    entities: Vec<Entity>,
    /// Entity → slot.
    slots: HashMap<Entity, usize>,
}

impl<T> ComponentPool<T> {
    /// Create an empty pool.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create an empty pool with room for `capacity` components.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
            entities: Vec::with_capacity(capacity),
            slots: HashMap::with_capacity(capacity),
        }
    }

    /// Returns the number of live components.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the pool holds no components.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns `true` if `entity` has a component in this pool.
    #[must_use]
    pub fn contains(&self, entity: Entity) -> bool {
        self.slots.contains_key(&entity)
    }

    /// Insert or overwrite the component for `entity`.
    ///
    /// An existing component is replaced in place and keeps its slot; a new
    /// one is appended to the end.
    pub fn set(&mut self, entity: Entity, value: T) {
        if let Some(&slot) = self.slots.get(&entity) {
            self.data[slot] = value;
            return;
        }

        self.slots.insert(entity, self.data.len());
        self.entities.push(entity);
        self.data.push(value);
    }

    /// Remove and return the component for `entity`.
    ///
    /// The last component is moved into the vacated slot. Returns `None` if
    /// the entity has no component here.
    pub fn remove(&mut self, entity: Entity) -> Option<T> {
        let slot = self.slots.remove(&entity)?;
        let value = self.data.swap_remove(slot);
        self.entities.swap_remove(slot);

        if let Some(&moved) = self.entities.get(slot) {
            self.slots.insert(moved, slot);
        }
        Some(value)
    }

    /// Returns the component for `entity`.
    #[must_use]
    pub fn get(&self, entity: Entity) -> Option<&T> {
        self.slots.get(&entity).map(|&slot| &self.data[slot])
    }

    /// Returns the component for `entity` mutably.
    #[must_use]
    pub fn get_mut(&mut self, entity: Entity) -> Option<&mut T> {
        let slot = *self.slots.get(&entity)?;
        Some(&mut self.data[slot])
    }

    /// Packed component values in slot order.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Owning entities in slot order.
    #[must_use]
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Iterate over `(entity, component)` pairs in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (Entity, &T)> {
        self.entities.iter().copied().zip(self.data.iter())
    }

    /// Iterate mutably over `(entity, component)` pairs in slot order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Entity, &mut T)> {
        self.entities.iter().copied().zip(self.data.iter_mut())
    }

    /// Drop every component.
    pub fn clear(&mut self) {
        self.data.clear();
        self.entities.clear();
        self.slots.clear();
    }
}

impl<T> Default for ComponentPool<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// The type-independent face of a [`ComponentPool`].
///
/// The registry keeps pools of every component type in one vector and must
/// purge a destroyed entity from all of them without knowing their value
/// types. Typed access goes through [`ErasedPool::as_any`] and a downcast.
pub trait ErasedPool {
    /// Remove `entity`'s component if it has one. Idempotent.
    fn remove_entity_from_pool(&mut self, entity: Entity);

    /// Returns `true` if `entity` has a component in this pool.
    fn contains_entity(&self, entity: Entity) -> bool;

    /// Returns the number of live components.
    fn component_count(&self) -> usize;

    /// Upcast for downcasting to the concrete pool.
    fn as_any(&self) -> &dyn Any;

    /// Mutable upcast for downcasting to the concrete pool.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: 'static> ErasedPool for ComponentPool<T> {
    fn remove_entity_from_pool(&mut self, entity: Entity) {
        if self.contains(entity) {
            self.remove(entity);
        }
    }

    fn contains_entity(&self, entity: Entity) -> bool {
        self.contains(entity)
    }

    fn component_count(&self) -> usize {
        self.len()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn e(id: u64) -> Entity {
        Entity::from_raw(id)
    }

    /// Every slot maps back to its entity and every entity to its slot.
    fn assert_consistent<T>(pool: &ComponentPool<T>) {
        assert_eq!(pool.data.len(), pool.entities.len());
        assert_eq!(pool.data.len(), pool.slots.len());
        for (slot, entity) in pool.entities.iter().enumerate() {
            assert_eq!(pool.slots[entity], slot);
        }
    }

    #[test]
    fn test_set_and_get() {
        let mut pool = ComponentPool::new();
        pool.set(e(3), 30);
        pool.set(e(1), 10);
        assert_eq!(pool.len(), 2);
        assert_eq!(pool.get(e(3)), Some(&30));
        assert_eq!(pool.get(e(1)), Some(&10));
        assert_eq!(pool.get(e(2)), None);
        assert_consistent(&pool);
    }

    #[test]
    fn test_set_overwrites_in_place() {
        let mut pool = ComponentPool::new();
        pool.set(e(1), "a");
        pool.set(e(2), "b");
        pool.set(e(1), "c");
        assert_eq!(pool.len(), 2);
        assert_eq!(pool.entities(), &[e(1), e(2)]);
        assert_eq!(pool.as_slice(), &["c", "b"]);
    }

    #[test]
    fn test_remove_swaps_last_into_hole() {
        let mut pool = ComponentPool::new();
        pool.set(e(0), 'a');
        pool.set(e(1), 'b');
        pool.set(e(2), 'c');

        assert_eq!(pool.remove(e(0)), Some('a'));
        assert_eq!(pool.entities(), &[e(2), e(1)]);
        assert_eq!(pool.as_slice(), &['c', 'b']);
        assert_eq!(pool.get(e(2)), Some(&'c'));
        assert_consistent(&pool);
    }

    #[test]
    fn test_remove_last_element() {
        let mut pool = ComponentPool::new();
        pool.set(e(0), 1);
        pool.set(e(1), 2);
        assert_eq!(pool.remove(e(1)), Some(2));
        assert_eq!(pool.entities(), &[e(0)]);
        assert_consistent(&pool);

        assert_eq!(pool.remove(e(0)), Some(1));
        assert!(pool.is_empty());
        assert_consistent(&pool);
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut pool = ComponentPool::new();
        pool.set(e(0), 1);
        assert_eq!(pool.remove(e(5)), None);
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn test_density_after_mixed_operations() {
        let mut pool = ComponentPool::with_capacity(2);
        for id in 0..10 {
            pool.set(e(id), id * 10);
        }
        for id in [3, 0, 9, 4] {
            pool.remove(e(id));
        }
        pool.set(e(3), 333);
        pool.set(e(5), 555);

        assert_eq!(pool.len(), 7);
        assert_consistent(&pool);
        let mut ids: Vec<u64> = pool.entities().iter().map(|e| e.id()).collect();
        ids.sort_unstable();
        assert_eq!(ids, vec![1, 2, 3, 5, 6, 7, 8]);
        assert_eq!(pool.get(e(3)), Some(&333));
        assert_eq!(pool.get(e(5)), Some(&555));
        assert_eq!(pool.get(e(8)), Some(&80));
    }

    #[test]
    fn test_get_mut() {
        let mut pool = ComponentPool::new();
        pool.set(e(4), 1.0_f32);
        *pool.get_mut(e(4)).unwrap() += 1.5;
        assert_eq!(pool.get(e(4)), Some(&2.5));
        assert!(pool.get_mut(e(5)).is_none());
    }

    #[test]
    fn test_iter_mut() {
        let mut pool = ComponentPool::new();
        pool.set(e(1), 1);
        pool.set(e(2), 2);
        for (_entity, value) in pool.iter_mut() {
            *value *= 10;
        }
        let pairs: Vec<_> = pool.iter().map(|(e, v)| (e.id(), *v)).collect();
        assert_eq!(pairs, vec![(1, 10), (2, 20)]);
    }

    #[test]
    fn test_erased_remove_is_idempotent() {
        let mut pool = ComponentPool::new();
        pool.set(e(1), 'x');
        let erased: &mut dyn ErasedPool = &mut pool;
        erased.remove_entity_from_pool(e(1));
        erased.remove_entity_from_pool(e(1));
        erased.remove_entity_from_pool(e(7));
        assert_eq!(erased.component_count(), 0);
        assert!(!erased.contains_entity(e(1)));
    }

    #[test]
    fn test_erased_downcast() {
        let mut boxed: Box<dyn ErasedPool> = Box::new(ComponentPool::<u32>::new());
        boxed
            .as_any_mut()
            .downcast_mut::<ComponentPool<u32>>()
            .unwrap()
            .set(e(0), 9);
        assert!(boxed.as_any().downcast_ref::<ComponentPool<i64>>().is_none());
        let typed = boxed.as_any().downcast_ref::<ComponentPool<u32>>().unwrap();
        assert_eq!(typed.get(e(0)), Some(&9));
    }

    #[test]
    fn test_clear() {
        let mut pool = ComponentPool::new();
        pool.set(e(1), ());
        pool.clear();
        assert!(pool.is_empty());
        assert!(!pool.contains(e(1)));
    }
}
