//! Deferred submission of record creations.
//!
//! Creations requested during a processing step are queued here and become
//! visible to queries only when the store's `submit` drains the buffer. The
//! submit is the system's single synchronization point: reaction hooks fire
//! after the whole batch is queryable, once per contiguous same-group run.

use std::ops::Range;

use copse_foundation::{EntityId, GroupId, Result};

use crate::store::EntityStore;

/// One queued creation: the identity was assigned up front, the record
/// itself is not yet resident in its group.
#[derive(Debug)]
pub(crate) struct Pending<T> {
    pub(crate) id: EntityId,
    pub(crate) group: GroupId,
    pub(crate) component: T,
}

/// Accumulates creation requests between submits.
///
/// Order is preserved: records flush in creation order, which is what lets
/// a parent always become resident before the children that reference it.
#[derive(Debug)]
pub struct DeferredBuffer<T> {
    queued: Vec<Pending<T>>,
}

impl<T> Default for DeferredBuffer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> DeferredBuffer<T> {
    /// Creates a new empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self { queued: Vec::new() }
    }

    /// Queues a creation request.
    pub(crate) fn push(&mut self, id: EntityId, group: GroupId, component: T) {
        self.queued.push(Pending {
            id,
            group,
            component,
        });
    }

    /// Takes every queued request, leaving the buffer empty.
    pub(crate) fn take(&mut self) -> Vec<Pending<T>> {
        std::mem::take(&mut self.queued)
    }

    /// Returns the number of queued requests.
    #[must_use]
    pub fn len(&self) -> usize {
        self.queued.len()
    }

    /// Returns true if nothing is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queued.is_empty()
    }
}

/// Observer invoked by the store when a submit makes records visible.
///
/// Called once per contiguous run of newly visible rows sharing one group,
/// in creation order. By the time the first call fires, the entire batch is
/// already queryable, so an observer may resolve any record committed in the
/// same submit.
pub trait ReactOnAdd<T> {
    /// Reacts to the rows `rows` of `group` becoming visible.
    ///
    /// # Errors
    ///
    /// Implementations surface invariant violations (for example a record
    /// referencing an unresolvable parent) to the caller of `submit`.
    fn added(&mut self, store: &EntityStore<T>, group: GroupId, rows: Range<u32>) -> Result<()>;
}
