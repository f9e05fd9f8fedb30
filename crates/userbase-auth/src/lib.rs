//! Account and authentication operations for Userbase.
//!
//! This crate provides:
//! - **Passwords**: Argon2id hashing and verification
//! - **Tokens**: HS256 bearer tokens recorded against the user that received them
//! - **Credentials**: email + password checks against a [`UserStore`]
//! - **UserService**: register, list, get, update, delete and login
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use userbase_auth::{TokenIssuer, UserService};
//! use userbase_storage::MemoryUserStore;
//! use userbase_types::NewUser;
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let issuer = TokenIssuer::new("0123456789abcdef0123456789abcdef", 3600).unwrap();
//! let service = UserService::new(Arc::new(MemoryUserStore::new()), issuer);
//!
//! service
//!     .register(NewUser {
//!         name: Some("Alice".into()),
//!         email: Some("alice@example.com".into()),
//!         password: Some("secret123".into()),
//!     })
//!     .await
//!     .unwrap();
//!
//! let token = service.login("alice@example.com", "secret123").await.unwrap();
//! assert!(service.issuer().verify(&token).is_ok());
//! # });
//! ```
//!
//! [`UserStore`]: userbase_storage::UserStore

pub mod credentials;
pub mod error;
pub mod password;
pub mod service;
pub mod token;

pub use credentials::verify_credentials;
pub use error::{AuthError, Result};
pub use password::{hash_password, verify_password};
pub use service::UserService;
pub use token::{issue_token, Claims, TokenIssuer, MIN_SECRET_LENGTH};
