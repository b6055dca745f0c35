//! Component signatures.
//!
//! A [`Signature`] is a fixed-width bit set indexed by [`ComponentTypeId`].
//! The registry keeps one per entity (which components the entity has) and
//! every system carries one (which components the system requires). A system
//! is interested in an entity when the system's signature is a subset of the
//! entity's:
//!
//! ```text
//! (system & entity) == system
//! ```

use std::fmt;
use std::ops::{BitAnd, BitOr};

use crate::component::ComponentTypeId;

/// The maximum number of distinct component types, one per signature bit.
pub const MAX_COMPONENTS: usize = 32;

/// A bit set with one bit per registered component type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Signature(u32);

impl Signature {
    /// The signature with no bits set.
    pub const EMPTY: Signature = Signature(0);

    /// Create an empty signature.
    #[must_use]
    pub const fn new() -> Self {
        Self::EMPTY
    }

    /// Set or clear the bit for `component`.
    pub fn set(&mut self, component: ComponentTypeId, value: bool) {
        let mask = 1u32 << component.index();
        if value {
            self.0 |= mask;
        } else {
            self.0 &= !mask;
        }
    }

    /// Returns `true` if the bit for `component` is set.
    #[must_use]
    pub const fn test(&self, component: ComponentTypeId) -> bool {
        self.0 & (1u32 << component.index()) != 0
    }

    /// Clear every bit.
    pub fn reset(&mut self) {
        self.0 = 0;
    }

    /// Returns `true` if every bit set in `required` is also set in `self`.
    #[must_use]
    pub fn contains(&self, required: &Signature) -> bool {
        (*required & *self) == *required
    }

    /// Returns the number of set bits.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Returns `true` if no bit is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Iterate over the component types whose bit is set, lowest id first.
    pub fn iter(&self) -> impl Iterator<Item = ComponentTypeId> + '_ {
        (0..MAX_COMPONENTS)
            .filter_map(ComponentTypeId::new)
            .filter(|&id| self.test(id))
    }
}

impl BitAnd for Signature {
    type Output = Signature;

    fn bitand(self, rhs: Signature) -> Signature {
        Signature(self.0 & rhs.0)
    }
}

impl BitOr for Signature {
    type Output = Signature;

    fn bitor(self, rhs: Signature) -> Signature {
        Signature(self.0 | rhs.0)
    }
}

impl FromIterator<ComponentTypeId> for Signature {
    fn from_iter<I: IntoIterator<Item = ComponentTypeId>>(iter: I) -> Self {
        let mut signature = Signature::new();
        for id in iter {
            signature.set(id, true);
        }
        signature
    }
}

/// Renders the bits most-significant first, like a bitset dump.
impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:0width$b}", self.0, width = MAX_COMPONENTS)
    }
}
