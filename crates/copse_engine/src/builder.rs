//! Parent-linked tree construction.

use copse_foundation::{EntityId, GroupId};
use copse_storage::{EntityStore, KeyAllocator};

use crate::node::Node;

/// The shape of a tree: how many levels below the root, and how many
/// children each node fans out to.
///
/// A shape with zero levels is just a root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeShape {
    /// Levels of branching below the root.
    pub levels: u32,
    /// Children created under every non-leaf node.
    pub fanout: u32,
}

impl TreeShape {
    /// Creates a shape with the given depth and fan-out.
    #[must_use]
    pub const fn new(levels: u32, fanout: u32) -> Self {
        Self { levels, fanout }
    }

    /// Total nodes in a tree of this shape: `1 + F + F^2 + ... + F^levels`.
    #[must_use]
    pub fn node_count(&self) -> u64 {
        let mut total = 0u64;
        let mut level_width = 1u64;
        for _ in 0..=self.levels {
            total += level_width;
            level_width *= u64::from(self.fanout);
        }
        total
    }
}

/// Builds trees by repeated node creation, each call supplying the parent.
///
/// The builder knows nothing about filters; it only guarantees that every
/// parent is created before its children, which is what the router's
/// post-commit resolution relies on.
pub struct TreeBuilder<'a> {
    store: &'a mut EntityStore<Node>,
    keys: &'a mut KeyAllocator,
    group: GroupId,
}

impl<'a> TreeBuilder<'a> {
    /// Creates a builder placing nodes into `group`.
    #[must_use]
    pub fn new(
        store: &'a mut EntityStore<Node>,
        keys: &'a mut KeyAllocator,
        group: GroupId,
    ) -> Self {
        Self { store, keys, group }
    }

    /// Creates one node under `parent` (or a new root for `None`).
    ///
    /// The returned identity is usable as the parent argument of further
    /// creations immediately, before any submit.
    pub fn create_node(&mut self, parent: Option<EntityId>) -> EntityId {
        let node = Node::new(parent, self.keys.filter_key());
        self.store.create(node, self.group)
    }

    /// Builds a whole tree of the given shape, returning the root identity.
    ///
    /// Nodes are created level by level, so identities within one level are
    /// contiguous in creation order.
    pub fn build_tree(&mut self, shape: &TreeShape) -> EntityId {
        let root = self.create_node(None);

        let mut frontier = vec![root];
        for _ in 0..shape.levels {
            let mut next = Vec::with_capacity(frontier.len() * shape.fanout as usize);
            for parent in frontier {
                for _ in 0..shape.fanout {
                    next.push(self.create_node(Some(parent)));
                }
            }
            frontier = next;
        }

        root
    }
}
