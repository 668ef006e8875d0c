//! Copse - Flat-storage entity forests with persistent filter indices
//!
//! This crate re-exports all layers of the Copse system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 2: copse_engine     — Hierarchy routing, tree building, traversal
//! Layer 1: copse_storage    — Entity storage, deferred submission, filters
//! Layer 0: copse_foundation — Core types (EntityId, GroupId, Error)
//! ```

pub use copse_engine as engine;
pub use copse_foundation as foundation;
pub use copse_storage as storage;
