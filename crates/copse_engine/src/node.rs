//! The hierarchical record stored in the forest.

use copse_foundation::EntityId;
use copse_storage::FilterKey;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One node of a tree.
///
/// A node knows only its parent's identity and the key of the filter that
/// will hold its own direct children. Every node reserves a children key at
/// construction, roots included; the key is populated lazily when the first
/// child routes into it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Node {
    parent: Option<EntityId>,
    children_key: FilterKey,
}

impl Node {
    /// Creates a node with the given parent and a freshly reserved children key.
    #[must_use]
    pub fn new(parent: Option<EntityId>, children_key: FilterKey) -> Self {
        Self {
            parent,
            children_key,
        }
    }

    /// The identity of this node's parent; `None` for a tree root.
    #[must_use]
    pub fn parent(&self) -> Option<EntityId> {
        self.parent
    }

    /// The filter key naming this node's direct children.
    #[must_use]
    pub fn children_key(&self) -> FilterKey {
        self.children_key
    }

    /// Returns true if this node is a tree root.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}
