//! Group-partitioned entity storage, deferred submission, and filter indices.
//!
//! This crate provides:
//! - [`EntityStore`] - Generational, group-partitioned record storage
//! - [`DeferredBuffer`] - Creation requests held until an explicit submit
//! - [`ReactOnAdd`] - Observer invoked once per committed run of records
//! - [`FilterIndex`] - Persistent key-to-storage-location indices

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod deferred;
mod filter;
mod store;

pub use deferred::{DeferredBuffer, ReactOnAdd};
pub use filter::{Filter, FilterContextId, FilterGroup, FilterIndex, FilterKey, KeyAllocator};
pub use store::EntityStore;
