//! Error types
//!
//! `StoreError` is what a backend (and therefore a case hook) reports.
//! `BenchError` is what the scheduler reports: a failed operation, a cooperative
//! abort, or an invalid configuration.

use thiserror::Error;

/// Failure reported by a storage backend
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The named store was never provisioned
    #[error("unknown store: {0}")]
    UnknownStore(String),

    /// The backend does not implement an optional operation
    #[error("operation not supported by this backend: {0}")]
    Unsupported(&'static str),

    /// The named index does not exist on the store
    #[error("unknown index '{index}' on store '{store}'")]
    UnknownIndex {
        /// Store the lookup targeted
        store: String,
        /// Missing index name
        index: String,
    },

    /// A concurrent write collided with this one
    #[error("write conflict: {0}")]
    Conflict(String),

    /// The backend ran out of space
    #[error("quota exceeded: {0}")]
    QuotaExceeded(String),

    /// Any other backend-specific failure
    #[error("backend error: {0}")]
    Backend(String),
}

/// Failure reported by the scheduler
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BenchError {
    /// A backend call inside a hook failed
    #[error("operation failed: {0}")]
    Operation(#[from] StoreError),

    /// Cancellation was observed at a checkpoint
    #[error("run aborted")]
    Aborted,

    /// Invalid run options or case definition
    #[error("invalid configuration: {0}")]
    Configuration(String),
}

impl BenchError {
    /// Whether this is a clean cooperative unwind rather than a failure
    pub fn is_abort(&self) -> bool {
        matches!(self, BenchError::Aborted)
    }
}
