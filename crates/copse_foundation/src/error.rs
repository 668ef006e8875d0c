//! Error types for the Copse system.
//!
//! Uses `thiserror` for ergonomic error definition with categorized kinds.

use thiserror::Error;

use crate::entity::EntityId;

/// Convenient result alias used across the workspace.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for Copse operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind }
    }

    /// Creates an entity not found error.
    #[must_use]
    pub fn entity_not_found(id: EntityId) -> Self {
        Self::new(ErrorKind::EntityNotFound(id))
    }

    /// Creates a stale entity reference error.
    #[must_use]
    pub fn stale_entity(id: EntityId) -> Self {
        Self::new(ErrorKind::StaleEntity(id))
    }

    /// Creates a pending entity error.
    #[must_use]
    pub fn pending_entity(id: EntityId) -> Self {
        Self::new(ErrorKind::PendingEntity(id))
    }

    /// Creates a parent-not-committed routing error.
    #[must_use]
    pub fn parent_not_committed(child: EntityId, parent: EntityId) -> Self {
        Self::new(ErrorKind::ParentNotCommitted { child, parent })
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal(message.into()))
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// Entity was not found in storage.
    #[error("entity not found: {0:?}")]
    EntityNotFound(EntityId),

    /// Entity reference is stale (generation mismatch).
    #[error("stale entity reference: {0:?}")]
    StaleEntity(EntityId),

    /// Entity was created but not yet committed by a submit.
    #[error("entity pending submission: {0:?}")]
    PendingEntity(EntityId),

    /// A newly committed record references a parent that is not resident.
    ///
    /// Routing a child requires its parent to be committed first; hitting
    /// this is a caller ordering bug, not a transient condition.
    #[error("cannot route {child:?}: parent {parent:?} is not committed")]
    ParentNotCommitted {
        /// The record being routed.
        child: EntityId,
        /// The parent identity that failed to resolve.
        parent: EntityId,
    },

    /// Internal error (should not happen).
    #[error("internal error: {0}")]
    Internal(String),
}
