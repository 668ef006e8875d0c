//! The forest façade tying storage, filters, and key allocation together.

use copse_foundation::{EntityId, GroupId, Result};
use copse_storage::{EntityStore, FilterContextId, FilterIndex, FilterKey, KeyAllocator};

use crate::builder::{TreeBuilder, TreeShape};
use crate::node::Node;
use crate::router::HierarchyRouter;
use crate::traverse::TraversalEngine;

/// A forest of flat-stored trees with persistent filter indices.
///
/// Owns every piece of state the mechanism needs: the entity store, the
/// filter index, the key allocator, the well-known root filter key, and the
/// two filter contexts keeping root keys and children keys apart. Nothing is
/// shared through globals, so independent forests can run side by side.
///
/// The intended cycle is: create trees, [`submit`](Self::submit), traverse,
/// then [`clear_roots`](Self::clear_roots) and [`remove_all`](Self::remove_all).
/// Child filters persist across cycles; traversal skips whatever has gone
/// stale in them.
#[derive(Debug)]
pub struct Forest {
    store: EntityStore<Node>,
    filters: FilterIndex,
    keys: KeyAllocator,
    group: GroupId,
    root_key: FilterKey,
    roots_context: FilterContextId,
    children_context: FilterContextId,
}

impl Default for Forest {
    fn default() -> Self {
        Self::new()
    }
}

impl Forest {
    /// Creates an empty forest with its own key spaces and storage group.
    #[must_use]
    pub fn new() -> Self {
        let mut keys = KeyAllocator::new();
        let roots_context = keys.filter_context();
        let children_context = keys.filter_context();
        let root_key = keys.filter_key();
        let mut store = EntityStore::new();
        let group = store.new_group();
        Self {
            store,
            filters: FilterIndex::new(),
            keys,
            group,
            root_key,
            roots_context,
            children_context,
        }
    }

    /// Queues the creation of one node; see [`TreeBuilder::create_node`].
    pub fn create_node(&mut self, parent: Option<EntityId>) -> EntityId {
        TreeBuilder::new(&mut self.store, &mut self.keys, self.group).create_node(parent)
    }

    /// Queues the creation of a whole tree, returning the root identity.
    pub fn build_tree(&mut self, shape: &TreeShape) -> EntityId {
        TreeBuilder::new(&mut self.store, &mut self.keys, self.group).build_tree(shape)
    }

    /// Commits all queued creations and routes them into filters.
    ///
    /// # Errors
    ///
    /// Fails if a queued node references a parent that cannot be resolved,
    /// which indicates a creation-ordering bug in the caller.
    pub fn submit(&mut self) -> Result<()> {
        let mut router = HierarchyRouter::new(
            &mut self.filters,
            self.root_key,
            self.roots_context,
            self.children_context,
        );
        self.store.submit(&mut router)
    }

    /// Walks every live node depth-first; returns the number visited.
    pub fn traverse_all<F>(&self, visit: F) -> usize
    where
        F: FnMut(EntityId, &Node),
    {
        TraversalEngine::new(
            &self.store,
            &self.filters,
            self.root_key,
            self.roots_context,
            self.children_context,
        )
        .traverse_all(visit)
    }

    /// Reconciles and returns the root filter's entry count.
    pub fn root_count(&mut self) -> usize {
        self.filters
            .get_or_create(self.root_key, self.roots_context)
            .compute_final_count()
    }

    /// Empties the root filter; its key stays registered.
    pub fn clear_roots(&mut self) {
        if let Some(filter) = self.filters.get_mut(self.root_key, self.roots_context) {
            filter.clear();
        }
    }

    /// Removes every record in the forest's group immediately.
    ///
    /// Filters are left untouched; stale entries are skipped on the next
    /// traversal. Returns the number of records removed.
    pub fn remove_all(&mut self) -> usize {
        self.store.remove_group(self.group)
    }

    /// Returns the identities currently filed as children of `parent`,
    /// in creation order.
    ///
    /// Stale entries are filtered out, so this reflects live records only.
    ///
    /// # Errors
    ///
    /// Fails if `parent` itself cannot be resolved.
    pub fn children_of(&self, parent: EntityId) -> Result<Vec<EntityId>> {
        let key = self.store.query_one(parent)?.children_key();
        let Some(filter) = self.filters.get(key, self.children_context) else {
            return Ok(Vec::new());
        };
        let mut children = Vec::new();
        for group in filter.iter_groups() {
            let (_, ids) = self.store.query(group.group());
            for (id, row) in group.entries() {
                if ids.get(row as usize) == Some(&id) {
                    children.push(id);
                }
            }
        }
        Ok(children)
    }

    /// Read access to the underlying store.
    #[must_use]
    pub fn store(&self) -> &EntityStore<Node> {
        &self.store
    }

    /// Read access to the filter index.
    #[must_use]
    pub fn filters(&self) -> &FilterIndex {
        &self.filters
    }

    /// The forest's storage group.
    #[must_use]
    pub fn group(&self) -> GroupId {
        self.group
    }

    /// The well-known root filter key.
    #[must_use]
    pub fn root_key(&self) -> FilterKey {
        self.root_key
    }

    /// The context holding children filters.
    #[must_use]
    pub fn children_context(&self) -> FilterContextId {
        self.children_context
    }

    /// The context holding the root filter.
    #[must_use]
    pub fn roots_context(&self) -> FilterContextId {
        self.roots_context
    }
}
