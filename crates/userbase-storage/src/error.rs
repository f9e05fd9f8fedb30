//! Storage error types.

use thiserror::Error;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The requested record was not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Another record already uses this email address.
    #[error("duplicate email: {0}")]
    DuplicateEmail(String),

    /// The connection string names a backend this build does not provide.
    #[error("unsupported store scheme: {0}")]
    UnsupportedUri(String),

    /// The backend failed (I/O, connectivity, corruption).
    #[error("backend error: {0}")]
    Backend(String),

    /// A stored document could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// A specialized Result type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;
