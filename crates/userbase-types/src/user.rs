//! User account types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::validation::{validate_email, validate_name, validate_password, ValidationError};

/// Unique identifier for a user.
pub type UserId = Uuid;

/// A bearer token recorded against the user that it was issued to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuedToken {
    /// The signed token string.
    pub token: String,
}

/// A user account as persisted by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Unique user ID, assigned at registration.
    pub id: UserId,
    /// Optional display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Normalised (trimmed, lower-case) email address. Unique per store.
    pub email: String,
    /// Argon2id hash of the password in PHC string format.
    pub password: String,
    /// Tokens issued at login, oldest first.
    #[serde(default)]
    pub tokens: Vec<IssuedToken>,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
    /// When the account was last modified.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with a fresh ID.
    ///
    /// `password_hash` must already be hashed; this type never sees plaintext.
    pub fn new(name: Option<String>, email: String, password_hash: String) -> Self {
        let now = Utc::now();

        Self {
            id: Uuid::new_v4(),
            name,
            email,
            password: password_hash,
            tokens: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Update the `updated_at` timestamp.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Convert to the public profile returned by the API.
    pub fn to_profile(&self) -> UserProfile {
        UserProfile {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// User profile for API responses. Never carries the password hash or tokens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// User ID.
    pub id: UserId,
    /// Display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Email address.
    pub email: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Request to register a new user.
///
/// Every field is optional at the wire level so that a missing field is
/// reported as a [`ValidationError::MissingField`] rather than a decode error.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct NewUser {
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Email address.
    #[serde(default)]
    pub email: Option<String>,
    /// Plaintext password.
    #[serde(default)]
    pub password: Option<String>,
}

impl NewUser {
    /// Check the payload, returning the first problem found.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let email = required("email", self.email.as_deref())?;
        let password = required("password", self.password.as_deref())?;

        validate_email(email)?;
        validate_password(password)?;
        if let Some(name) = &self.name {
            validate_name(name)?;
        }

        Ok(())
    }
}

impl fmt::Debug for NewUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewUser")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Partial update of a user. Absent fields are left unchanged.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct UserChanges {
    /// New display name.
    #[serde(default)]
    pub name: Option<String>,
    /// New email address.
    #[serde(default)]
    pub email: Option<String>,
    /// New plaintext password; re-hashed before it is stored.
    #[serde(default)]
    pub password: Option<String>,
}

impl UserChanges {
    /// Check every field that is present.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(email) = &self.email {
            validate_email(required("email", Some(email.as_str()))?)?;
        }
        if let Some(password) = &self.password {
            validate_password(password)?;
        }
        if let Some(name) = &self.name {
            validate_name(name)?;
        }

        Ok(())
    }

    /// Whether the update carries no fields at all.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.password.is_none()
    }
}

impl fmt::Debug for UserChanges {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserChanges")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

fn required<'a>(field: &'static str, value: Option<&'a str>) -> Result<&'a str, ValidationError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ValidationError::MissingField { field }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(email: Option<&str>, password: Option<&str>) -> NewUser {
        NewUser {
            name: None,
            email: email.map(String::from),
            password: password.map(String::from),
        }
    }

    #[test]
    fn test_create_user() {
        let user = User::new(None, "a@x.com".to_string(), "$argon2id$hash".to_string());
        assert_eq!(user.email, "a@x.com");
        assert!(user.tokens.is_empty());
        assert_eq!(user.created_at, user.updated_at);
    }

    #[test]
    fn test_profile_hides_secrets() {
        let mut user = User::new(
            Some("Alice".to_string()),
            "a@x.com".to_string(),
            "$argon2id$hash".to_string(),
        );
        user.tokens.push(IssuedToken {
            token: "tok".to_string(),
        });

        let json = serde_json::to_value(user.to_profile()).unwrap();
        assert_eq!(json["email"], "a@x.com");
        assert_eq!(json["name"], "Alice");
        assert!(json.get("password").is_none());
        assert!(json.get("tokens").is_none());
    }

    #[test]
    fn test_profile_omits_missing_name() {
        let user = User::new(None, "a@x.com".to_string(), "h".to_string());
        let json = serde_json::to_value(user.to_profile()).unwrap();
        assert!(json.get("name").is_none());
    }

    #[test]
    fn test_new_user_missing_fields() {
        assert_eq!(
            new_user(None, Some("secret123")).validate(),
            Err(ValidationError::MissingField { field: "email" })
        );
        assert_eq!(
            new_user(Some("a@x.com"), None).validate(),
            Err(ValidationError::MissingField { field: "password" })
        );
        assert_eq!(
            new_user(Some("   "), Some("secret123")).validate(),
            Err(ValidationError::MissingField { field: "email" })
        );
    }

    #[test]
    fn test_new_user_valid() {
        assert!(new_user(Some("a@x.com"), Some("secret123")).validate().is_ok());
    }

    #[test]
    fn test_new_user_deserialize_partial() {
        let payload: NewUser = serde_json::from_str(r#"{"email":"a@x.com"}"#).unwrap();
        assert_eq!(payload.email.as_deref(), Some("a@x.com"));
        assert!(payload.password.is_none());
    }

    #[test]
    fn test_debug_redacts_password() {
        let payload = new_user(Some("a@x.com"), Some("secret123"));
        let rendered = format!("{:?}", payload);
        assert!(!rendered.contains("secret123"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_changes_validate_only_present_fields() {
        assert!(UserChanges::default().validate().is_ok());
        assert!(UserChanges::default().is_empty());

        let changes = UserChanges {
            email: Some("not-an-email".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            changes.validate(),
            Err(ValidationError::InvalidEmail { .. })
        ));

        let changes = UserChanges {
            password: Some("abc".to_string()),
            ..Default::default()
        };
        assert_eq!(
            changes.validate(),
            Err(ValidationError::PasswordTooShort { min: 6 })
        );
    }

    #[test]
    fn test_changes_blank_email_is_missing() {
        let changes = UserChanges {
            email: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(
            changes.validate(),
            Err(ValidationError::MissingField { field: "email" })
        );
    }
}
