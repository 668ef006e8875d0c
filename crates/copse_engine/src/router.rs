//! Routing of newly committed nodes into filters.
//!
//! The router is the single place that decides where a node goes once a
//! submit makes it visible: the well-known root filter if it has no parent,
//! or its parent's children filter otherwise. The store invokes it through
//! the [`ReactOnAdd`] observer seam, once per contiguous same-group run.

use std::ops::Range;

use copse_foundation::{Error, GroupId, Result};
use copse_storage::{EntityStore, FilterContextId, FilterIndex, FilterKey, ReactOnAdd};

use crate::node::Node;

/// Files each newly visible node into the filter it belongs to.
///
/// Routing a child requires resolving its parent, so the parent must already
/// be committed. The tree builder creates parents before children and submit
/// flushes in creation order, which guarantees it; a failed resolve is
/// therefore a caller ordering bug and surfaces as an error.
pub struct HierarchyRouter<'a> {
    filters: &'a mut FilterIndex,
    root_key: FilterKey,
    roots_context: FilterContextId,
    children_context: FilterContextId,
}

impl<'a> HierarchyRouter<'a> {
    /// Creates a router writing into `filters`.
    #[must_use]
    pub fn new(
        filters: &'a mut FilterIndex,
        root_key: FilterKey,
        roots_context: FilterContextId,
        children_context: FilterContextId,
    ) -> Self {
        Self {
            filters,
            root_key,
            roots_context,
            children_context,
        }
    }
}

impl ReactOnAdd<Node> for HierarchyRouter<'_> {
    fn added(
        &mut self,
        store: &EntityStore<Node>,
        group: GroupId,
        rows: Range<u32>,
    ) -> Result<()> {
        let (nodes, ids) = store.query(group);
        for row in rows {
            let i = row as usize;
            let node = &nodes[i];
            let id = ids[i];

            match node.parent() {
                None => {
                    self.filters
                        .get_or_create(self.root_key, self.roots_context)
                        .append(id, group, row);
                }
                Some(parent) => {
                    let parent_node = store
                        .query_one(parent)
                        .map_err(|_| Error::parent_not_committed(id, parent))?;
                    self.filters
                        .get_or_create(parent_node.children_key(), self.children_context)
                        .append(id, group, row);
                }
            }
        }
        Ok(())
    }
}
