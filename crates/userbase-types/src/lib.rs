//! # Userbase Types
//!
//! Common types shared by the Userbase crates:
//!
//! - **User**: the persisted identity record (email, password hash, issued tokens)
//! - **UserProfile**: the public view rendered in API responses
//! - **NewUser / UserChanges**: registration and update payloads
//! - **ValidationError**: structured reasons a payload was rejected
//!
//! Validation is explicit: payloads are checked with [`NewUser::validate`] or
//! [`UserChanges::validate`] before anything reaches the store.
//!
//! ```rust
//! use userbase_types::{NewUser, ValidationError};
//!
//! let payload = NewUser {
//!     name: None,
//!     email: Some("a@x.com".to_string()),
//!     password: Some("abc".to_string()),
//! };
//!
//! assert_eq!(
//!     payload.validate(),
//!     Err(ValidationError::PasswordTooShort { min: 6 })
//! );
//! ```

mod user;
mod validation;

pub use user::{IssuedToken, NewUser, User, UserChanges, UserId, UserProfile};
pub use validation::{
    normalize_email, normalize_name, validate_email, validate_name, validate_password,
    ValidationError, MAX_EMAIL_LENGTH, MAX_NAME_LENGTH, MAX_PASSWORD_LENGTH, MIN_PASSWORD_LENGTH,
};
