//! Hierarchy routing, tree construction, and traversal for Copse.
//!
//! This crate provides:
//! - [`Node`] - The hierarchical record: optional parent plus a children key
//! - [`HierarchyRouter`] - Files newly committed nodes into filters
//! - [`TreeBuilder`] - Parent-linked tree construction
//! - [`TraversalEngine`] - Work-stack depth-first walk over the forest
//! - [`Forest`] - Façade owning the store, filters, and key allocation

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod builder;
mod forest;
mod node;
mod router;
mod traverse;

pub use builder::{TreeBuilder, TreeShape};
pub use forest::Forest;
pub use node::Node;
pub use router::HierarchyRouter;
pub use traverse::TraversalEngine;
