//! Depth-first traversal of every tree in the forest.
//!
//! The walk starts from the root filter and descends through each node's
//! children filter. It runs on an explicit work stack rather than recursion,
//! so tree depth is bounded by memory, not by the call stack.

use copse_foundation::EntityId;
use copse_storage::{EntityStore, Filter, FilterContextId, FilterIndex, FilterKey};

use crate::node::Node;

/// Walks every node of every tree exactly once, depth-first.
///
/// Filter entries are resolved defensively: an entry whose cached location
/// no longer holds the identity it was filed under is stale (the record was
/// removed, and possibly its row reused) and is skipped rather than visited.
/// This is what keeps traversal correct across cycles even though child
/// filters are never cleared and group removal never touches filters.
pub struct TraversalEngine<'a> {
    store: &'a EntityStore<Node>,
    filters: &'a FilterIndex,
    root_key: FilterKey,
    roots_context: FilterContextId,
    children_context: FilterContextId,
}

impl<'a> TraversalEngine<'a> {
    /// Creates a traversal over the given store and filters.
    #[must_use]
    pub fn new(
        store: &'a EntityStore<Node>,
        filters: &'a FilterIndex,
        root_key: FilterKey,
        roots_context: FilterContextId,
        children_context: FilterContextId,
    ) -> Self {
        Self {
            store,
            filters,
            root_key,
            roots_context,
            children_context,
        }
    }

    /// Visits every live node reachable from the root filter.
    ///
    /// Depth-first, pre-order: a node is visited before its children, and a
    /// node's children are visited in filter (creation) order before any of
    /// its siblings. Returns the number of nodes visited.
    pub fn traverse_all<F>(&self, mut visit: F) -> usize
    where
        F: FnMut(EntityId, &Node),
    {
        let mut visited = 0;
        let mut stack: Vec<(EntityId, &'a Node)> = Vec::new();

        if let Some(roots) = self.filters.get(self.root_key, self.roots_context) {
            self.push_entries(roots, &mut stack);
        }

        while let Some((id, node)) = stack.pop() {
            visit(id, node);
            visited += 1;

            if let Some(children) = self.filters.get(node.children_key(), self.children_context) {
                self.push_entries(children, &mut stack);
            }
        }

        visited
    }

    /// Resolves a filter's entries and pushes the live ones so the stack
    /// pops them in filter order.
    ///
    /// The component slice is pulled once per group run, not once per entry;
    /// each entry then only checks that its cached row still holds the
    /// identity it was filed under, dropping it as stale otherwise.
    fn push_entries(&self, filter: &Filter, stack: &mut Vec<(EntityId, &'a Node)>) {
        let start = stack.len();
        for group in filter.iter_groups() {
            let (nodes, ids) = self.store.query(group.group());
            for (id, row) in group.entries() {
                let i = row as usize;
                if ids.get(i) == Some(&id) {
                    stack.push((id, &nodes[i]));
                }
            }
        }
        stack[start..].reverse();
    }
}
