//! Integration tests for entity storage
//!
//! Tests deferred visibility, group removal, generational indices, and stale
//! reference detection through the public crate surface.

use std::ops::Range;

use copse_foundation::{ErrorKind, GroupId, Result};
use copse_storage::{EntityStore, ReactOnAdd};

struct Ignore;

impl<T> ReactOnAdd<T> for Ignore {
    fn added(&mut self, _: &EntityStore<T>, _: GroupId, _: Range<u32>) -> Result<()> {
        Ok(())
    }
}

// =============================================================================
// Deferred Visibility
// =============================================================================

#[test]
fn creations_are_invisible_before_submit() {
    let mut store = EntityStore::new();
    let group = store.new_group();
    let id = store.create("record", group);

    let (components, ids) = store.query(group);
    assert!(components.is_empty());
    assert!(ids.is_empty());
    assert!(store.is_pending(id));
}

#[test]
fn submit_makes_the_batch_visible_atomically() {
    let mut store = EntityStore::new();
    let group = store.new_group();
    let a = store.create(1u32, group);
    let b = store.create(2u32, group);

    store.submit(&mut Ignore).unwrap();

    let (components, ids) = store.query(group);
    assert_eq!(components, &[1, 2]);
    assert_eq!(ids, &[a, b]);
    assert_eq!(*store.query_one(a).unwrap(), 1);
    assert_eq!(*store.query_one(b).unwrap(), 2);
}

#[test]
fn query_one_on_pending_id_reports_pending() {
    let mut store = EntityStore::new();
    let group = store.new_group();
    let id = store.create(1u32, group);

    let err = store.query_one(id).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::PendingEntity(_)));
}

// =============================================================================
// Group Removal
// =============================================================================

#[test]
fn remove_group_is_immediate() {
    let mut store = EntityStore::new();
    let group = store.new_group();
    store.create(1u32, group);
    store.create(2u32, group);
    store.submit(&mut Ignore).unwrap();

    let removed = store.remove_group(group);

    assert_eq!(removed, 2);
    let (components, ids) = store.query(group);
    assert!(components.is_empty());
    assert!(ids.is_empty());
}

#[test]
fn removed_ids_are_stale_not_unknown() {
    let mut store = EntityStore::new();
    let group = store.new_group();
    let id = store.create(1u32, group);
    store.submit(&mut Ignore).unwrap();
    store.remove_group(group);

    assert!(!store.exists(id));
    assert!(matches!(
        store.query_one(id).unwrap_err().kind,
        ErrorKind::StaleEntity(_)
    ));
}

#[test]
fn groups_are_independent() {
    let mut store = EntityStore::new();
    let g0 = store.new_group();
    let g1 = store.new_group();
    store.create(1u32, g0);
    let kept = store.create(2u32, g1);
    store.submit(&mut Ignore).unwrap();

    store.remove_group(g0);

    assert_eq!(store.group_len(g0), 0);
    assert_eq!(store.group_len(g1), 1);
    assert_eq!(*store.query_one(kept).unwrap(), 2);
}

// =============================================================================
// Generational Reuse
// =============================================================================

#[test]
fn reused_slot_holds_a_new_identity() {
    let mut store = EntityStore::new();
    let group = store.new_group();
    let old = store.create(1u32, group);
    store.submit(&mut Ignore).unwrap();
    store.remove_group(group);

    let new = store.create(2u32, group);
    store.submit(&mut Ignore).unwrap();

    // Same slot, different generation
    assert_eq!(new.index, old.index);
    assert_ne!(new, old);

    let (current, component) = store.resolve_at(group, 0).unwrap();
    assert_eq!(current, new);
    assert_eq!(*component, 2);
    assert_ne!(current, old, "the old identity must not match the new record");
}

#[test]
fn repeated_cycles_keep_identities_unique() {
    let mut store = EntityStore::new();
    let group = store.new_group();
    let mut all_ids = Vec::new();

    for cycle in 0..5u32 {
        let id = store.create(cycle, group);
        store.submit(&mut Ignore).unwrap();
        all_ids.push(id);
        store.remove_group(group);
    }

    let unique: std::collections::HashSet<_> = all_ids.iter().copied().collect();
    assert_eq!(unique.len(), all_ids.len());
}
