//! Integration tests for forest traversal
//!
//! Tests visit counts against the closed form `1 + F + F^2 + ... + F^L`,
//! depth-first ordering, and stale-entry skipping.

use std::collections::HashSet;

use copse_engine::{Forest, TreeShape};
use copse_foundation::EntityId;

#[test]
fn visit_count_matches_the_closed_form() {
    for (levels, fanout) in [(0, 0), (1, 1), (1, 5), (2, 3), (3, 2)] {
        let shape = TreeShape::new(levels, fanout);
        let mut forest = Forest::new();
        forest.build_tree(&shape);
        forest.submit().unwrap();

        let visited = forest.traverse_all(|_, _| {});
        assert_eq!(
            visited as u64,
            shape.node_count(),
            "shape {levels}x{fanout}"
        );
    }
}

#[test]
fn every_node_is_visited_exactly_once() {
    let mut forest = Forest::new();
    forest.build_tree(&TreeShape::new(2, 4));
    forest.build_tree(&TreeShape::new(2, 4));
    forest.submit().unwrap();

    let mut seen: Vec<EntityId> = Vec::new();
    forest.traverse_all(|id, _| seen.push(id));

    let unique: HashSet<_> = seen.iter().copied().collect();
    assert_eq!(seen.len(), 42); // 2 * (1 + 4 + 16)
    assert_eq!(unique.len(), seen.len());
}

#[test]
fn nodes_appear_after_their_parents() {
    let mut forest = Forest::new();
    forest.build_tree(&TreeShape::new(2, 2));
    forest.submit().unwrap();

    let mut order: Vec<EntityId> = Vec::new();
    forest.traverse_all(|id, _| order.push(id));

    // Depth-first: every node appears after its parent, and the subtree of
    // a first child is fully visited before the second child.
    let position =
        |id: EntityId| order.iter().position(|o| *o == id).expect("visited");
    for id in &order {
        let node = forest.store().query_one(*id).unwrap();
        if let Some(parent) = node.parent() {
            assert!(position(parent) < position(*id));
        }
    }
}

#[test]
fn traversal_is_repeatable() {
    let mut forest = Forest::new();
    forest.build_tree(&TreeShape::new(2, 3));
    forest.submit().unwrap();

    let mut first = Vec::new();
    forest.traverse_all(|id, _| first.push(id));
    let mut second = Vec::new();
    forest.traverse_all(|id, _| second.push(id));

    assert_eq!(first, second);
}

#[test]
fn deep_chain_traverses_without_recursion_limits() {
    let mut forest = Forest::new();
    forest.build_tree(&TreeShape::new(50_000, 1));
    forest.submit().unwrap();

    assert_eq!(forest.traverse_all(|_, _| {}), 50_001);
}

#[test]
fn traversal_skips_entries_for_removed_records() {
    let mut forest = Forest::new();
    forest.build_tree(&TreeShape::new(1, 3));
    forest.submit().unwrap();
    assert_eq!(forest.traverse_all(|_, _| {}), 4);

    forest.remove_all();

    // Filters still hold the entries, but nothing resolves
    assert_eq!(forest.traverse_all(|_, _| {}), 0);
}

mod properties {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn visits_match_node_count_for_any_shape(
            levels in 0u32..5,
            fanout in 0u32..4,
            trees in 1usize..4,
        ) {
            let shape = TreeShape::new(levels, fanout);
            let mut forest = Forest::new();
            for _ in 0..trees {
                forest.build_tree(&shape);
            }
            forest.submit().unwrap();

            let visited = forest.traverse_all(|_, _| {});
            prop_assert_eq!(visited as u64, trees as u64 * shape.node_count());
            prop_assert_eq!(forest.root_count(), trees);
        }

        #[test]
        fn cleanup_always_returns_to_zero_visits(
            levels in 0u32..4,
            fanout in 0u32..4,
        ) {
            let mut forest = Forest::new();
            forest.build_tree(&TreeShape::new(levels, fanout));
            forest.submit().unwrap();
            forest.clear_roots();
            forest.remove_all();

            prop_assert_eq!(forest.traverse_all(|_, _| {}), 0);
            prop_assert_eq!(forest.root_count(), 0);
        }
    }
}

#[test]
fn visitor_sees_node_data() {
    let mut forest = Forest::new();
    let root = forest.create_node(None);
    forest.create_node(Some(root));
    forest.submit().unwrap();

    let mut parents = Vec::new();
    forest.traverse_all(|_, node| parents.push(node.parent()));

    assert_eq!(parents, vec![None, Some(root)]);
}
