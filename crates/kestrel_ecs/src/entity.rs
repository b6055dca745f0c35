//! Entity identifiers and id allocation.
//!
//! An [`Entity`] is a bare integer with no data of its own. Ids are dense so
//! they can index the registry's signature table directly, and they are
//! recycled: a destroyed entity's id goes to the back of a free list and is
//! reissued before any id above the high-water mark.

use std::collections::VecDeque;

/// A unique entity identifier.
///
/// Identity and equality are defined solely by the integer. Components,
/// tags, and groups live in the [`Registry`](crate::Registry).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Entity(u64);

impl Entity {
    /// Create an entity from a raw identifier.
    #[must_use]
    pub const fn from_raw(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw identifier.
    #[must_use]
    pub const fn id(self) -> u64 {
        self.0
    }

    /// Returns the identifier as a table index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}

/// Issues entity ids, reusing released ones first-in first-out.
#[derive(Debug, Default)]
pub struct EntityAllocator {
    next_id: u64,
    free: VecDeque<Entity>,
    live: Vec<bool>,
    alive: usize,
}

impl EntityAllocator {
    /// Creates a new allocator. The first id issued is 0.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues an id: the oldest released one if any, otherwise the next
    /// sequential id.
    pub fn allocate(&mut self) -> Entity {
        let entity = match self.free.pop_front() {
            Some(entity) => entity,
            None => {
                let entity = Entity(self.next_id);
                self.next_id += 1;
                self.live.push(false);
                entity
            }
        };
        self.live[entity.index()] = true;
        self.alive += 1;
        entity
    }

    /// Returns `entity` to the free list.
    ///
    /// Returns `false` (and does nothing) if the id is not currently issued.
    pub fn release(&mut self, entity: Entity) -> bool {
        if !self.is_alive(entity) {
            return false;
        }
        self.live[entity.index()] = false;
        self.alive -= 1;
        self.free.push_back(entity);
        true
    }

    /// Returns `true` if `entity` has been issued and not released.
    #[must_use]
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.live.get(entity.index()).copied().unwrap_or(false)
    }

    /// Returns `true` if `entity` was released and is waiting to be reissued.
    #[must_use]
    pub fn is_free(&self, entity: Entity) -> bool {
        entity.id() < self.next_id && !self.is_alive(entity)
    }

    /// Returns the number of ids currently issued.
    #[must_use]
    pub fn count(&self) -> usize {
        self.alive
    }

    /// Returns one past the highest id ever issued.
    #[must_use]
    pub fn high_water_mark(&self) -> u64 {
        self.next_id
    }

    /// Returns the released ids in the order they will be reissued.
    pub fn free_ids(&self) -> impl Iterator<Item = Entity> + '_ {
        self.free.iter().copied()
    }
}
