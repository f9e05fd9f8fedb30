//! Storage backend traits.
//!
//! Defines the interface that all user store backends must implement,
//! enabling pluggable storage strategies.

use crate::Result;
use async_trait::async_trait;
use std::sync::Arc;
use userbase_types::{IssuedToken, User, UserId};

/// Trait for user record storage backends.
///
/// Implementations include in-memory and RocksDB storage. Every backend
/// enforces email uniqueness and serialises writes to a single record.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Persists a new user.
    ///
    /// Fails with [`StorageError::DuplicateEmail`](crate::StorageError::DuplicateEmail)
    /// if another user already has this email.
    async fn insert(&self, user: User) -> Result<User>;

    /// Lists every user, in no guaranteed order.
    async fn list(&self) -> Result<Vec<User>>;

    /// Retrieves a user by ID.
    async fn get(&self, id: &UserId) -> Result<Option<User>>;

    /// Retrieves a user by (normalised) email.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Replaces an existing user record wholesale.
    async fn replace(&self, user: User) -> Result<User>;

    /// Appends a token to a user's token list and returns the updated record.
    async fn append_token(&self, id: &UserId, token: IssuedToken) -> Result<User>;

    /// Deletes a user, returning the removed record.
    async fn delete(&self, id: &UserId) -> Result<User>;

    /// Returns the number of stored users.
    async fn count(&self) -> Result<usize>;
}

#[async_trait]
impl<T: UserStore + ?Sized> UserStore for Arc<T> {
    async fn insert(&self, user: User) -> Result<User> {
        (**self).insert(user).await
    }

    async fn list(&self) -> Result<Vec<User>> {
        (**self).list().await
    }

    async fn get(&self, id: &UserId) -> Result<Option<User>> {
        (**self).get(id).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        (**self).find_by_email(email).await
    }

    async fn replace(&self, user: User) -> Result<User> {
        (**self).replace(user).await
    }

    async fn append_token(&self, id: &UserId, token: IssuedToken) -> Result<User> {
        (**self).append_token(id, token).await
    }

    async fn delete(&self, id: &UserId) -> Result<User> {
        (**self).delete(id).await
    }

    async fn count(&self) -> Result<usize> {
        (**self).count().await
    }
}
