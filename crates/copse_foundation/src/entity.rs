//! Record identities and storage group names.
//!
//! An identity stays valid until its record is removed; the store then bumps
//! the slot's generation, so every identifier held across a removal stops
//! matching instead of silently pointing at whatever reuses the slot. The
//! generation also encodes liveness by parity: slots start free at an even
//! generation, and every allocation or removal increments it, so an odd
//! generation always means "alive".

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Identity of one record: storage slot index plus generation.
///
/// Two identities are the same record only if both fields match; a matching
/// index with a differing generation is a stale reference to a removed (and
/// possibly reused) slot.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EntityId {
    /// Index of the storage slot.
    pub index: u64,
    /// Generation of the slot at the time this identity was issued.
    pub generation: u32,
}

impl EntityId {
    /// Generation assigned to the first record in a fresh slot.
    ///
    /// Odd, because odd generations are alive: a slot's generation starts
    /// at 0 (free), becomes 1 on first allocation, 2 on removal, and so on.
    pub const FIRST_GENERATION: u32 = 1;

    /// Creates an identity from its parts.
    #[must_use]
    pub const fn new(index: u64, generation: u32) -> Self {
        Self { index, generation }
    }

    /// The "no record" sentinel, with an index no store ever allocates.
    ///
    /// Used where an absent reference needs a concrete value; a root node's
    /// missing parent is modelled as `Option::None` rather than this.
    #[must_use]
    pub const fn null() -> Self {
        Self {
            index: u64::MAX,
            generation: 0,
        }
    }

    /// Returns true if this is the null sentinel.
    #[must_use]
    pub const fn is_null(self) -> bool {
        self.index == u64::MAX
    }

    /// Returns true if this identity's generation is an "alive" one.
    ///
    /// This checks only the parity convention; whether the slot currently
    /// holds this generation is the store's to answer.
    #[must_use]
    pub const fn is_live_generation(self) -> bool {
        Self::generation_is_live(self.generation)
    }

    /// Returns true if `generation` denotes an alive slot (odd parity).
    #[must_use]
    pub const fn generation_is_live(generation: u32) -> bool {
        generation % 2 == 1
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            write!(f, "EntityId(null)")
        } else {
            write!(f, "EntityId({}#{})", self.index, self.generation)
        }
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            write!(f, "entity <null>")
        } else {
            write!(f, "entity {}#{}", self.index, self.generation)
        }
    }
}

/// Names one contiguous storage partition.
///
/// All records in a group are stored in one flat run and are removed together
/// by a bulk group removal. Groups carry no generation: a removed group's id
/// may be reused, and the records inside it are guarded by their own
/// [`EntityId`] generations.
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GroupId(u32);

impl GroupId {
    /// Creates a group id from a raw value.
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw value of this group id.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GroupId({})", self.0)
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "group {}", self.0)
    }
}
