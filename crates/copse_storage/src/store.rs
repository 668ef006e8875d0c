//! Group-partitioned record storage with generational identities.
//!
//! Records live in flat per-group vectors. Identities are allocated from a
//! free list when available; removal bumps the generation so held ids go
//! stale instead of silently pointing at a reused slot. Creations are
//! deferred: they queue in a [`DeferredBuffer`] and become visible only when
//! [`EntityStore::submit`] flushes them and notifies the observer.

// Allow u64 to usize casts - we target 64-bit systems
#![allow(clippy::cast_possible_truncation)]

use std::collections::HashMap;
use std::ops::Range;

use copse_foundation::{EntityId, Error, GroupId, Result};

use crate::deferred::{DeferredBuffer, ReactOnAdd};

/// Where a committed record currently lives.
#[derive(Debug, Clone, Copy)]
struct Location {
    group: GroupId,
    row: u32,
}

/// One contiguous storage partition.
#[derive(Debug)]
struct Group<T> {
    components: Vec<T>,
    ids: Vec<EntityId>,
}

impl<T> Default for Group<T> {
    fn default() -> Self {
        Self {
            components: Vec::new(),
            ids: Vec::new(),
        }
    }
}

/// Generational, group-partitioned record storage.
///
/// Identities are assigned at creation time, but the record itself stays
/// invisible to queries until the next [`submit`](Self::submit). Removal is
/// immediate and group-granular: [`remove_group`](Self::remove_group) drops
/// every record in a group and invalidates their identities. Filters built
/// over this store are never touched by removal.
#[derive(Debug)]
pub struct EntityStore<T> {
    /// Generation counter for each entity index.
    /// Even generations are free, odd generations are alive.
    generations: Vec<u32>,
    /// Free list of indices available for reuse.
    free_list: Vec<u64>,
    /// Current location per index; `None` while pending or after removal.
    locations: Vec<Option<Location>>,
    /// Committed records, partitioned by group.
    groups: HashMap<GroupId, Group<T>>,
    /// Creations queued since the last submit.
    pending: DeferredBuffer<T>,
    /// Count of live identities, including pending ones.
    live_count: usize,
    /// Next group id handed out by `new_group`.
    next_group: u32,
}

impl<T> Default for EntityStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> EntityStore<T> {
    /// Creates a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            generations: Vec::new(),
            free_list: Vec::new(),
            locations: Vec::new(),
            groups: HashMap::new(),
            pending: DeferredBuffer::new(),
            live_count: 0,
            next_group: 0,
        }
    }

    /// Allocates a fresh group id, never previously handed out.
    pub fn new_group(&mut self) -> GroupId {
        let group = GroupId::new(self.next_group);
        self.next_group += 1;
        group
    }

    /// Queues the creation of a record in `group` and returns its identity.
    ///
    /// The identity is final, but the record is not visible to queries until
    /// the next [`submit`](Self::submit).
    pub fn create(&mut self, component: T, group: GroupId) -> EntityId {
        self.next_group = self.next_group.max(group.raw() + 1);
        let id = self.allocate();
        self.pending.push(id, group, component);
        id
    }

    /// Flushes all pending creations and fires the observer.
    ///
    /// Records flush in creation order and land at the tail of their group.
    /// Once the whole batch is queryable, `observer` is invoked exactly once
    /// per contiguous run of newly visible rows sharing one group, still in
    /// creation order. Submitting with nothing pending is a no-op.
    ///
    /// # Errors
    ///
    /// Propagates the first error returned by the observer.
    pub fn submit(&mut self, observer: &mut dyn ReactOnAdd<T>) -> Result<()> {
        let drained = self.pending.take();
        if drained.is_empty() {
            return Ok(());
        }

        let mut runs: Vec<(GroupId, Range<u32>)> = Vec::new();
        for pending in drained {
            let slot = self.groups.entry(pending.group).or_default();
            let row = slot.components.len() as u32;
            slot.components.push(pending.component);
            slot.ids.push(pending.id);
            self.locations[pending.id.index as usize] = Some(Location {
                group: pending.group,
                row,
            });

            match runs.last_mut() {
                Some((group, range)) if *group == pending.group && range.end == row => {
                    range.end = row + 1;
                }
                _ => runs.push((pending.group, row..row + 1)),
            }
        }

        for (group, rows) in runs {
            observer.added(self, group, rows)?;
        }
        Ok(())
    }

    /// Removes every record in `group` immediately.
    ///
    /// Identities of the removed records go stale (their generation bumps)
    /// and their rows become reusable. Filters are deliberately untouched;
    /// stale filter entries are detected at resolve time instead. Returns
    /// the number of records removed; an unknown group removes nothing.
    pub fn remove_group(&mut self, group: GroupId) -> usize {
        let Some(slot) = self.groups.get_mut(&group) else {
            return 0;
        };
        let removed = slot.ids.len();
        for id in slot.ids.drain(..) {
            let idx = id.index as usize;
            // Odd (alive) becomes even (free)
            self.generations[idx] += 1;
            self.locations[idx] = None;
            self.free_list.push(id.index);
            self.live_count -= 1;
        }
        slot.components.clear();
        removed
    }

    /// Returns the committed records of `group` with their identities.
    ///
    /// The two slices are parallel: `ids[i]` identifies `components[i]`.
    /// An unknown or emptied group yields empty slices.
    #[must_use]
    pub fn query(&self, group: GroupId) -> (&[T], &[EntityId]) {
        match self.groups.get(&group) {
            Some(slot) => (slot.components.as_slice(), slot.ids.as_slice()),
            None => (&[], &[]),
        }
    }

    /// Resolves one committed record by identity.
    ///
    /// # Errors
    ///
    /// Returns an error if the identity was never allocated, is stale, or
    /// is still pending submission.
    pub fn query_one(&self, id: EntityId) -> Result<&T> {
        self.validate(id)?;
        match self.locations[id.index as usize] {
            Some(location) => {
                let slot = &self.groups[&location.group];
                Ok(&slot.components[location.row as usize])
            }
            None => Err(Error::pending_entity(id)),
        }
    }

    /// Returns the record and identity currently at `(group, row)`, if any.
    ///
    /// This is the denormalized access path used when resolving filter
    /// entries; comparing the returned identity against the one stored in
    /// the entry detects staleness.
    #[must_use]
    pub fn resolve_at(&self, group: GroupId, row: u32) -> Option<(EntityId, &T)> {
        let slot = self.groups.get(&group)?;
        let i = row as usize;
        Some((*slot.ids.get(i)?, slot.components.get(i)?))
    }

    /// Checks if an identity is live (committed or pending) and not stale.
    #[must_use]
    pub fn exists(&self, id: EntityId) -> bool {
        let idx = id.index as usize;
        if idx >= self.generations.len() {
            return false;
        }
        self.generations[idx] == id.generation && id.is_live_generation()
    }

    /// Checks if an identity is live but still awaiting submission.
    #[must_use]
    pub fn is_pending(&self, id: EntityId) -> bool {
        self.exists(id) && self.locations[id.index as usize].is_none()
    }

    /// Validates that an identity is live.
    ///
    /// # Errors
    ///
    /// Returns an error distinguishing a never-allocated identity from a
    /// stale one.
    pub fn validate(&self, id: EntityId) -> Result<()> {
        let idx = id.index as usize;

        if idx >= self.generations.len() {
            return Err(Error::entity_not_found(id));
        }

        let current = self.generations[idx];
        if current != id.generation {
            // Generation mismatch - record was removed and possibly reused
            return Err(Error::stale_entity(id));
        }
        if !EntityId::generation_is_live(current) {
            // Even generation means the slot is free
            return Err(Error::entity_not_found(id));
        }

        Ok(())
    }

    /// Returns the number of live identities, including pending ones.
    #[must_use]
    pub fn len(&self) -> usize {
        self.live_count
    }

    /// Returns true if no identities are live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.live_count == 0
    }

    /// Returns the number of creations queued for the next submit.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Returns the number of committed records in `group`.
    #[must_use]
    pub fn group_len(&self, group: GroupId) -> usize {
        self.groups.get(&group).map_or(0, |slot| slot.ids.len())
    }

    fn allocate(&mut self) -> EntityId {
        self.live_count += 1;

        if let Some(index) = self.free_list.pop() {
            let idx = index as usize;
            // Increment generation (was even/free, now odd/alive)
            self.generations[idx] += 1;
            self.locations[idx] = None;
            EntityId::new(index, self.generations[idx])
        } else {
            let index = self.generations.len() as u64;
            self.generations.push(EntityId::FIRST_GENERATION);
            self.locations.push(None);
            EntityId::new(index, EntityId::FIRST_GENERATION)
        }
    }
}
