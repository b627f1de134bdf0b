//! Error types for stockpile-core.

use thiserror::Error;

/// Result type alias for stockpile-core operations.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Boxed error raised by an [`ItemStore`](crate::store::ItemStore) implementation.
pub type BoxedStoreError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur in stockpile-core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The identifier does not resolve to a stored item.
    #[error("item not found: {0}")]
    NotFound(String),

    /// A required attribute is missing or malformed.
    #[error("validation error: {0}")]
    Validation(String),

    /// The persistence layer is unreachable or rejected the operation.
    #[error("store error: {0}")]
    Store(#[source] BoxedStoreError),

    /// JSON serialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CoreError {
    /// Wrap a store-specific error.
    pub fn store(err: impl Into<BoxedStoreError>) -> Self {
        Self::Store(err.into())
    }

    /// Build a validation error from a message.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}
