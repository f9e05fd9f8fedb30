//! Error types for account and authentication operations.

use thiserror::Error;
use userbase_storage::StorageError;
use userbase_types::ValidationError;

/// Result type for auth operations.
pub type Result<T> = std::result::Result<T, AuthError>;

/// Errors that can occur in account and authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No user matches the given ID or email.
    #[error("user not found: {0}")]
    NotFound(String),

    /// The payload was rejected before reaching the store.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The password did not match the stored hash.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// A bearer token failed verification.
    #[error("invalid token: {0}")]
    InvalidToken(String),

    /// The store failed.
    #[error("storage error: {0}")]
    Storage(StorageError),

    /// Hashing or signing failed.
    #[error("crypto error: {0}")]
    Crypto(String),
}

impl From<StorageError> for AuthError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(id) => Self::NotFound(id),
            StorageError::DuplicateEmail(email) => {
                Self::Validation(ValidationError::EmailTaken { email })
            }
            other => Self::Storage(other),
        }
    }
}

impl AuthError {
    /// Whether this error is the caller's fault rather than the service's.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Self::Storage(_) | Self::Crypto(_))
    }
}
