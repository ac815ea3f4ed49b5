//! Error types for txscope core.

use crate::types::TransactionId;
use thiserror::Error;
use txscope_store::StoreError;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in coordinator operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The manager was already committed (or a commit was already attempted).
    #[error("transaction {id} already committed")]
    AlreadyCommitted {
        /// The closed transaction.
        id: TransactionId,
    },

    /// Commit was requested on a manager that recorded no operation.
    #[error("transaction {id} has no operations to commit")]
    EmptyTransaction {
        /// The empty transaction.
        id: TransactionId,
    },

    /// The store rejected or failed a call.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// An entity could not be marshalled into an item.
    #[error("codec error: {message}")]
    Codec {
        /// Description of the failure.
        message: String,
    },
}

impl CoreError {
    /// Creates an already committed error.
    pub fn already_committed(id: TransactionId) -> Self {
        Self::AlreadyCommitted { id }
    }

    /// Creates an empty transaction error.
    pub fn empty_transaction(id: TransactionId) -> Self {
        Self::EmptyTransaction { id }
    }

    /// Creates a codec error.
    pub fn codec(message: impl Into<String>) -> Self {
        Self::Codec {
            message: message.into(),
        }
    }

    /// Returns true if this is an [`CoreError::AlreadyCommitted`] error.
    #[must_use]
    pub fn is_already_committed(&self) -> bool {
        matches!(self, Self::AlreadyCommitted { .. })
    }

    /// Returns true if this is an [`CoreError::EmptyTransaction`] error.
    #[must_use]
    pub fn is_empty_transaction(&self) -> bool {
        matches!(self, Self::EmptyTransaction { .. })
    }
}
