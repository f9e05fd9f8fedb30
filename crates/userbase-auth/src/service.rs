//! Account operations: register, list, get, update, delete and login.

use std::sync::Arc;
use userbase_storage::UserStore;
use userbase_types::{
    normalize_email, normalize_name, NewUser, User, UserChanges, UserId, ValidationError,
};

use crate::credentials::verify_credentials;
use crate::error::{AuthError, Result};
use crate::password::hash_password_blocking;
use crate::token::{issue_token, TokenIssuer};

/// Account service over an explicitly supplied store.
#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn UserStore>,
    issuer: TokenIssuer,
}

impl UserService {
    /// Create a service from a store handle and a token issuer.
    pub fn new(store: Arc<dyn UserStore>, issuer: TokenIssuer) -> Self {
        Self { store, issuer }
    }

    /// The underlying store.
    pub fn store(&self) -> &Arc<dyn UserStore> {
        &self.store
    }

    /// The token issuer.
    pub fn issuer(&self) -> &TokenIssuer {
        &self.issuer
    }

    /// Register a new user. The password is hashed before anything is stored.
    pub async fn register(&self, req: NewUser) -> Result<User> {
        req.validate()?;

        let NewUser {
            name,
            email,
            password,
        } = req;
        let (Some(email), Some(password)) = (email, password) else {
            // validate() has already rejected missing fields
            return Err(ValidationError::MissingField { field: "email" }.into());
        };

        let hash = hash_password_blocking(password).await?;
        let name = name.as_deref().and_then(normalize_name);
        let user = User::new(name, normalize_email(&email), hash);
        let user = self.store.insert(user).await?;

        tracing::info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    /// List all users.
    pub async fn list(&self) -> Result<Vec<User>> {
        Ok(self.store.list().await?)
    }

    /// Get a user by ID. An ID that does not parse is simply not found.
    pub async fn get(&self, id: &str) -> Result<User> {
        let user_id = parse_id(id)?;
        self.store
            .get(&user_id)
            .await?
            .ok_or_else(|| AuthError::NotFound(id.to_string()))
    }

    /// Apply a partial update.
    ///
    /// The changes are validated before the store is touched; a rejected
    /// update leaves the stored record as it was.
    pub async fn update(&self, id: &str, changes: UserChanges) -> Result<User> {
        changes.validate()?;
        let mut user = self.get(id).await?;

        if changes.is_empty() {
            return Ok(user);
        }

        let UserChanges {
            name,
            email,
            password,
        } = changes;

        // A blank name clears it.
        if let Some(name) = name {
            user.name = normalize_name(&name);
        }
        if let Some(email) = email {
            user.email = normalize_email(&email);
        }
        if let Some(password) = password {
            user.password = hash_password_blocking(password).await?;
        }

        user.touch();
        let updated = self.store.replace(user).await?;

        tracing::info!(user_id = %updated.id, "User updated");
        Ok(updated)
    }

    /// Delete a user, returning the removed record.
    pub async fn delete(&self, id: &str) -> Result<User> {
        let user_id = parse_id(id)?;
        let deleted = self.store.delete(&user_id).await?;

        tracing::info!(user_id = %deleted.id, "User deleted");
        Ok(deleted)
    }

    /// Verify credentials and issue a bearer token.
    pub async fn login(&self, email: &str, password: &str) -> Result<String> {
        let user = match verify_credentials(self.store.as_ref(), email, password).await {
            Ok(user) => user,
            Err(err) => {
                if err.is_client_error() {
                    tracing::warn!(reason = %login_failure_reason(&err), "Login rejected");
                }
                return Err(err);
            }
        };

        let token = issue_token(self.store.as_ref(), &self.issuer, &user).await?;

        tracing::info!(user_id = %user.id, "Login succeeded");
        Ok(token)
    }
}

fn parse_id(id: &str) -> Result<UserId> {
    UserId::parse_str(id).map_err(|_| AuthError::NotFound(id.to_string()))
}

fn login_failure_reason(err: &AuthError) -> &'static str {
    match err {
        AuthError::NotFound(_) => "unknown email",
        AuthError::InvalidCredentials => "password mismatch",
        _ => "other",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use userbase_storage::{MemoryUserStore, StorageError};
    use userbase_types::IssuedToken;

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    fn service() -> UserService {
        UserService::new(
            Arc::new(MemoryUserStore::new()),
            TokenIssuer::new(SECRET, 3600).unwrap(),
        )
    }

    fn new_user(email: &str, password: &str) -> NewUser {
        NewUser {
            name: Some("Alice".to_string()),
            email: Some(email.to_string()),
            password: Some(password.to_string()),
        }
    }

    #[tokio::test]
    async fn test_register_hashes_password() {
        let svc = service();
        let user = svc.register(new_user("a@x.com", "secret123")).await.unwrap();

        assert_ne!(user.password, "secret123");
        let stored = svc.store().get(&user.id).await.unwrap().unwrap();
        assert_ne!(stored.password, "secret123");
        assert!(stored.password.starts_with("$argon2id$"));
    }

    #[tokio::test]
    async fn test_register_normalises_email() {
        let svc = service();
        let user = svc.register(new_user(" A@X.Com ", "secret123")).await.unwrap();
        assert_eq!(user.email, "a@x.com");
    }

    #[tokio::test]
    async fn test_register_rejects_invalid() {
        let svc = service();
        let err = svc.register(new_user("a@x.com", "abc")).await.unwrap_err();
        assert!(matches!(
            err,
            AuthError::Validation(ValidationError::PasswordTooShort { .. })
        ));
        assert_eq!(svc.store().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let svc = service();
        svc.register(new_user("a@x.com", "secret123")).await.unwrap();

        let err = svc
            .register(new_user("A@x.com", "another1"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AuthError::Validation(ValidationError::EmailTaken { .. })
        ));
    }

    #[tokio::test]
    async fn test_get_roundtrip_and_bad_id() {
        let svc = service();
        let user = svc.register(new_user("a@x.com", "secret123")).await.unwrap();

        let fetched = svc.get(&user.id.to_string()).await.unwrap();
        assert_eq!(fetched.to_profile(), user.to_profile());

        assert!(matches!(
            svc.get("not-an-id").await,
            Err(AuthError::NotFound(_))
        ));
        assert!(matches!(
            svc.get(&UserId::new_v4().to_string()).await,
            Err(AuthError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_update_rehashes_password() {
        let svc = service();
        let user = svc.register(new_user("a@x.com", "secret123")).await.unwrap();
        let id = user.id.to_string();

        let changes = UserChanges {
            password: Some("newsecret".to_string()),
            ..Default::default()
        };
        let updated = svc.update(&id, changes).await.unwrap();

        assert_ne!(updated.password, user.password);
        assert_ne!(updated.password, "newsecret");
        assert!(svc.login("a@x.com", "newsecret").await.is_ok());
        assert!(matches!(
            svc.login("a@x.com", "secret123").await,
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn test_invalid_update_leaves_record_unchanged() {
        let svc = service();
        let user = svc.register(new_user("a@x.com", "secret123")).await.unwrap();
        let id = user.id.to_string();

        let changes = UserChanges {
            name: Some("Renamed".to_string()),
            email: Some("not-an-email".to_string()),
            password: None,
        };
        let err = svc.update(&id, changes).await.unwrap_err();
        assert!(matches!(err, AuthError::Validation(_)));

        let stored = svc.get(&id).await.unwrap();
        assert_eq!(stored, user);
    }

    #[tokio::test]
    async fn test_blank_name_is_stored_as_none() {
        let svc = service();
        let user = svc
            .register(NewUser {
                name: Some("   ".to_string()),
                email: Some("a@x.com".to_string()),
                password: Some("secret123".to_string()),
            })
            .await
            .unwrap();
        assert_eq!(user.name, None);

        let id = user.id.to_string();
        let renamed = svc
            .update(
                &id,
                UserChanges {
                    name: Some("  Alice ".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(renamed.name.as_deref(), Some("Alice"));

        let cleared = svc
            .update(
                &id,
                UserChanges {
                    name: Some(String::new()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(cleared.name, None);
    }

    #[tokio::test]
    async fn test_update_missing_user() {
        let svc = service();
        let changes = UserChanges {
            name: Some("Ghost".to_string()),
            ..Default::default()
        };
        let err = svc
            .update(&UserId::new_v4().to_string(), changes)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_twice() {
        let svc = service();
        let user = svc.register(new_user("a@x.com", "secret123")).await.unwrap();
        let id = user.id.to_string();

        let deleted = svc.delete(&id).await.unwrap();
        assert_eq!(deleted.id, user.id);
        assert!(matches!(svc.delete(&id).await, Err(AuthError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_login_flow() {
        let svc = service();
        let user = svc.register(new_user("a@x.com", "secret123")).await.unwrap();

        let token = svc.login("a@x.com", "secret123").await.unwrap();
        let claims = svc.issuer().verify(&token).unwrap();
        assert_eq!(claims.sub, user.id.to_string());

        let second = svc.login("a@x.com", "secret123").await.unwrap();
        let stored = svc.get(&user.id.to_string()).await.unwrap();
        let tokens: Vec<_> = stored.tokens.iter().map(|t| t.token.clone()).collect();
        assert_eq!(tokens, vec![token, second]);

        assert!(matches!(
            svc.login("a@x.com", "wrong").await,
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            svc.login("nobody@x.com", "secret123").await,
            Err(AuthError::NotFound(_))
        ));
    }

    /// Store whose token writes always fail.
    struct FailingTokenStore(MemoryUserStore);

    #[async_trait]
    impl UserStore for FailingTokenStore {
        async fn insert(&self, user: User) -> userbase_storage::Result<User> {
            self.0.insert(user).await
        }

        async fn list(&self) -> userbase_storage::Result<Vec<User>> {
            self.0.list().await
        }

        async fn get(&self, id: &UserId) -> userbase_storage::Result<Option<User>> {
            self.0.get(id).await
        }

        async fn find_by_email(&self, email: &str) -> userbase_storage::Result<Option<User>> {
            self.0.find_by_email(email).await
        }

        async fn replace(&self, user: User) -> userbase_storage::Result<User> {
            self.0.replace(user).await
        }

        async fn append_token(
            &self,
            _id: &UserId,
            _token: IssuedToken,
        ) -> userbase_storage::Result<User> {
            Err(StorageError::Backend("connection reset".to_string()))
        }

        async fn delete(&self, id: &UserId) -> userbase_storage::Result<User> {
            self.0.delete(id).await
        }

        async fn count(&self) -> userbase_storage::Result<usize> {
            self.0.count().await
        }
    }

    #[tokio::test]
    async fn test_login_fails_when_token_not_persisted() {
        let svc = UserService::new(
            Arc::new(FailingTokenStore(MemoryUserStore::new())),
            TokenIssuer::new(SECRET, 3600).unwrap(),
        );
        svc.register(new_user("a@x.com", "secret123")).await.unwrap();

        let err = svc.login("a@x.com", "secret123").await.unwrap_err();
        assert!(matches!(err, AuthError::Storage(_)));
    }
}
