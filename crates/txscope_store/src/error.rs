//! Error types for store operations.

use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur during store operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The request was malformed and nothing was applied.
    #[error("validation error: {0}")]
    Validation(String),

    /// An atomic write was canceled and nothing was applied.
    #[error("transaction canceled: {reason}")]
    TransactionCanceled {
        /// Why the store canceled the batch.
        reason: String,
    },

    /// The store could not be reached.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}
