//! Persistent filter indices over flat record storage.
//!
//! A filter maps one logical key to an ordered list of storage locations,
//! grouped by storage group so consumers can pull each group's component
//! slice once instead of resolving every entry individually. Filters are
//! created lazily, survive across processing cycles, and are emptied only by
//! an explicit clear. Keys live in disjoint contexts so unrelated key
//! spaces never collide on the same small integers.

use std::collections::HashMap;
use std::fmt;

use copse_foundation::{EntityId, GroupId};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Names one filter within a context.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FilterKey(u32);

impl FilterKey {
    /// Creates a filter key from a raw value.
    ///
    /// Keys are normally drawn from a [`KeyAllocator`]; constructing them
    /// directly is for tests and well-known constants.
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw value of this key.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for FilterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FilterKey({})", self.0)
    }
}

/// Names one independent filter key space.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FilterContextId(u32);

impl FilterContextId {
    /// Creates a context id from a raw value.
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw value of this context id.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for FilterContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FilterContextId({})", self.0)
    }
}

/// Hands out filter keys and context ids from monotonic counters.
///
/// One allocator is owned by each store/index construction context, so
/// independent instances never share key spaces through hidden globals.
/// Filter keys are drawn from a single counter regardless of what the key
/// will name; a key spent on one purpose is simply never reused for another.
#[derive(Debug, Default)]
pub struct KeyAllocator {
    next_key: u32,
    next_context: u32,
}

impl KeyAllocator {
    /// Creates a new allocator with all counters at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserves the next filter key.
    pub fn filter_key(&mut self) -> FilterKey {
        let key = FilterKey::new(self.next_key);
        self.next_key += 1;
        key
    }

    /// Reserves the next filter context.
    pub fn filter_context(&mut self) -> FilterContextId {
        let context = FilterContextId::new(self.next_context);
        self.next_context += 1;
        context
    }
}

/// Entries of one filter that share a storage group.
///
/// `ids[i]` identifies the record cached at row `rows[i]` of the group.
#[derive(Debug)]
struct GroupEntries {
    group: GroupId,
    ids: Vec<EntityId>,
    rows: Vec<u32>,
}

/// A view of one group's entries, yielded by [`Filter::iter_groups`].
#[derive(Clone, Copy)]
pub struct FilterGroup<'a> {
    group: GroupId,
    ids: &'a [EntityId],
    rows: &'a [u32],
}

impl<'a> FilterGroup<'a> {
    /// The storage group these entries point into.
    #[must_use]
    pub fn group(&self) -> GroupId {
        self.group
    }

    /// Identities of the records in this group, in append order.
    #[must_use]
    pub fn ids(&self) -> &'a [EntityId] {
        self.ids
    }

    /// Cached rows within the group, parallel to [`ids`](Self::ids).
    #[must_use]
    pub fn rows(&self) -> &'a [u32] {
        self.rows
    }

    /// Number of entries in this group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns true if this group holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Iterates `(identity, row)` pairs in append order.
    pub fn entries(&self) -> impl Iterator<Item = (EntityId, u32)> + 'a {
        self.ids.iter().copied().zip(self.rows.iter().copied())
    }
}

/// One persistent filter: an ordered set of storage locations.
///
/// Entries for a group are kept contiguous so grouped iteration yields each
/// group exactly once. Appends are not deduplicated; double-routing a record
/// is a caller bug, not something the filter defends against.
#[derive(Debug, Default)]
pub struct Filter {
    /// Per-group entry runs, in first-append order.
    groups: Vec<GroupEntries>,
    /// Entry count as of the last reconciliation.
    counted: usize,
}

impl Filter {
    fn new() -> Self {
        Self::default()
    }

    /// Appends an entry caching that `id` lives at `(group, row)`.
    pub fn append(&mut self, id: EntityId, group: GroupId, row: u32) {
        let slot = match self.groups.iter().position(|g| g.group == group) {
            Some(i) => i,
            None => {
                self.groups.push(GroupEntries {
                    group,
                    ids: Vec::new(),
                    rows: Vec::new(),
                });
                self.groups.len() - 1
            }
        };
        self.groups[slot].ids.push(id);
        self.groups[slot].rows.push(row);
    }

    /// Iterates the filter's entries grouped by storage group.
    ///
    /// Each group is yielded exactly once. The sequence is lazy, finite, and
    /// restartable; a never-populated filter yields nothing.
    pub fn iter_groups(&self) -> impl Iterator<Item = FilterGroup<'_>> + '_ {
        self.groups.iter().map(|g| FilterGroup {
            group: g.group,
            ids: &g.ids,
            rows: &g.rows,
        })
    }

    /// Reconciles uncounted appends and returns the total live entry count.
    ///
    /// Appends do not update the cached count; call this before relying on
    /// count-based logic.
    pub fn compute_final_count(&mut self) -> usize {
        self.counted = self.groups.iter().map(|g| g.ids.len()).sum();
        self.counted
    }

    /// Returns the count as of the last [`compute_final_count`](Self::compute_final_count).
    #[must_use]
    pub fn counted_len(&self) -> usize {
        self.counted
    }

    /// Returns the total number of entries, counted or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.iter().map(|g| g.ids.len()).sum()
    }

    /// Returns true if the filter holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.iter().all(|g| g.ids.is_empty())
    }

    /// Empties the filter without unregistering its key.
    ///
    /// A subsequent get-or-create for the same key returns this same, now
    /// empty filter rather than allocating a new one.
    pub fn clear(&mut self) {
        self.groups.clear();
        self.counted = 0;
    }
}

/// The key-to-filter mapping, partitioned into independent contexts.
#[derive(Debug, Default)]
pub struct FilterIndex {
    contexts: HashMap<FilterContextId, HashMap<FilterKey, Filter>>,
}

impl FilterIndex {
    /// Creates a new empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the filter for `key` in `context`, creating it if absent.
    ///
    /// Idempotent: repeated calls with the same key and context return the
    /// same underlying filter.
    pub fn get_or_create(&mut self, key: FilterKey, context: FilterContextId) -> &mut Filter {
        self.contexts
            .entry(context)
            .or_default()
            .entry(key)
            .or_insert_with(Filter::new)
    }

    /// Returns the filter for `key` in `context`, if it was ever created.
    #[must_use]
    pub fn get(&self, key: FilterKey, context: FilterContextId) -> Option<&Filter> {
        self.contexts.get(&context)?.get(&key)
    }

    /// Mutable variant of [`get`](Self::get).
    pub fn get_mut(&mut self, key: FilterKey, context: FilterContextId) -> Option<&mut Filter> {
        self.contexts.get_mut(&context)?.get_mut(&key)
    }

    /// Returns the number of registered filters across all contexts.
    #[must_use]
    pub fn filter_count(&self) -> usize {
        self.contexts.values().map(HashMap::len).sum()
    }
}
