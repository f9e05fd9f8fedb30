//! In-memory user store.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use userbase_types::{IssuedToken, User, UserId};

use crate::{Result, StorageError, UserStore};

/// User storage backed by process memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryUserStore {
    /// Users by ID.
    users: Arc<RwLock<HashMap<UserId, User>>>,
    /// Email to ID index.
    email_index: Arc<RwLock<HashMap<String, UserId>>>,
}

impl MemoryUserStore {
    /// Create a new, empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn insert(&self, user: User) -> Result<User> {
        let mut users = self.users.write();
        let mut email_index = self.email_index.write();

        if email_index.contains_key(&user.email) {
            return Err(StorageError::DuplicateEmail(user.email));
        }

        email_index.insert(user.email.clone(), user.id);
        users.insert(user.id, user.clone());

        Ok(user)
    }

    async fn list(&self) -> Result<Vec<User>> {
        let mut users: Vec<User> = self.users.read().values().cloned().collect();
        users.sort_by_key(|u| u.created_at);
        Ok(users)
    }

    async fn get(&self, id: &UserId) -> Result<Option<User>> {
        Ok(self.users.read().get(id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        // Writers lock users before the index, so the index guard is dropped first.
        let Some(id) = self.email_index.read().get(email).copied() else {
            return Ok(None);
        };
        Ok(self.users.read().get(&id).cloned())
    }

    async fn replace(&self, user: User) -> Result<User> {
        let mut users = self.users.write();
        let mut email_index = self.email_index.write();

        let existing = users
            .get(&user.id)
            .ok_or_else(|| StorageError::NotFound(user.id.to_string()))?;

        if existing.email != user.email {
            if email_index.contains_key(&user.email) {
                return Err(StorageError::DuplicateEmail(user.email));
            }
            email_index.remove(&existing.email);
            email_index.insert(user.email.clone(), user.id);
        }

        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn append_token(&self, id: &UserId, token: IssuedToken) -> Result<User> {
        let mut users = self.users.write();
        let user = users
            .get_mut(id)
            .ok_or_else(|| StorageError::NotFound(id.to_string()))?;

        user.tokens.push(token);
        Ok(user.clone())
    }

    async fn delete(&self, id: &UserId) -> Result<User> {
        let mut users = self.users.write();
        let mut email_index = self.email_index.write();

        let user = users
            .remove(id)
            .ok_or_else(|| StorageError::NotFound(id.to_string()))?;
        email_index.remove(&user.email);

        Ok(user)
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.users.read().len())
    }
}
