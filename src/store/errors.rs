//! Store error types

use thiserror::Error;

/// Errors that can occur during store operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Failed to connect to the store backend
    #[error("Store connection error: {0}")]
    ConnectionError(String),

    /// Generic backend error
    #[error("Store backend error: {0}")]
    BackendError(String),
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;
