//! Domain error types.

use store::StoreError;
use thiserror::Error;

/// Errors that can occur during domain operations.
///
/// The taxonomy mirrors what the HTTP boundary needs to map: absent
/// aggregates, uniqueness/guard conflicts, rejected input, and failures
/// of the backing store.
#[derive(Debug, Error)]
pub enum DomainError {
    /// The referenced record does not exist.
    #[error("{entity} not found")]
    NotFound { entity: &'static str },

    /// A uniqueness violation on create, or a delete blocked by
    /// dependent records.
    #[error("{0}")]
    Conflict(String),

    /// The supplied input was rejected before any write.
    #[error("{0}")]
    Validation(String),

    /// The backing store failed; any open unit of work was aborted.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl DomainError {
    pub(crate) fn not_found(entity: &'static str) -> Self {
        Self::NotFound { entity }
    }
}
