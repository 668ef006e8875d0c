//! Core identity types and errors for Copse.
//!
//! This crate provides:
//! - [`EntityId`] - Generational record identifiers
//! - [`GroupId`] - Names for contiguous storage partitions
//! - [`Error`] - Error types with categorized kinds

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod entity;
mod error;

pub use entity::{EntityId, GroupId};
pub use error::{Error, ErrorKind, Result};
