//! Field validation for user payloads.

use thiserror::Error;
use validator::ValidateEmail;

/// Minimum password length in characters.
pub const MIN_PASSWORD_LENGTH: usize = 6;
/// Maximum password length in characters. Bounds the hashing cost per request.
pub const MAX_PASSWORD_LENGTH: usize = 128;
/// Maximum display name length in characters.
pub const MAX_NAME_LENGTH: usize = 100;
/// Maximum email length (RFC 5321 path limit).
pub const MAX_EMAIL_LENGTH: usize = 254;

/// Reasons a user payload is rejected before it reaches the store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field was absent or blank.
    #[error("{field} is required")]
    MissingField {
        /// Field name.
        field: &'static str,
    },

    /// The email address is not syntactically valid.
    #[error("'{value}' is not a valid email address")]
    InvalidEmail {
        /// The rejected value.
        value: String,
    },

    /// The password is shorter than [`MIN_PASSWORD_LENGTH`].
    #[error("password must be at least {min} characters")]
    PasswordTooShort {
        /// Required minimum.
        min: usize,
    },

    /// A field exceeds its maximum length.
    #[error("{field} must be at most {max} characters")]
    FieldTooLong {
        /// Field name.
        field: &'static str,
        /// Allowed maximum.
        max: usize,
    },

    /// Another account already uses this email address.
    #[error("email already registered: {email}")]
    EmailTaken {
        /// The conflicting email.
        email: String,
    },
}

impl ValidationError {
    /// Name of the offending field.
    pub fn field(&self) -> &str {
        match self {
            Self::MissingField { field } | Self::FieldTooLong { field, .. } => field,
            Self::InvalidEmail { .. } | Self::EmailTaken { .. } => "email",
            Self::PasswordTooShort { .. } => "password",
        }
    }

    /// Short machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingField { .. } => "required",
            Self::InvalidEmail { .. } => "email",
            Self::PasswordTooShort { .. } | Self::FieldTooLong { .. } => "length",
            Self::EmailTaken { .. } => "unique",
        }
    }
}

/// Canonical form of an email address, used for storage and lookup.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Canonical form of a display name: trimmed, with a blank name meaning none.
pub fn normalize_name(name: &str) -> Option<String> {
    let trimmed = name.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Validate an email address (after normalisation).
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    let candidate = normalize_email(email);

    if candidate.chars().count() > MAX_EMAIL_LENGTH {
        return Err(ValidationError::FieldTooLong {
            field: "email",
            max: MAX_EMAIL_LENGTH,
        });
    }

    if !candidate.validate_email() {
        return Err(ValidationError::InvalidEmail {
            value: email.to_string(),
        });
    }

    Ok(())
}

/// Validate a plaintext password.
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    let len = password.chars().count();

    if len < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::PasswordTooShort {
            min: MIN_PASSWORD_LENGTH,
        });
    }

    if len > MAX_PASSWORD_LENGTH {
        return Err(ValidationError::FieldTooLong {
            field: "password",
            max: MAX_PASSWORD_LENGTH,
        });
    }

    Ok(())
}

/// Validate a display name.
pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(ValidationError::FieldTooLong {
            field: "name",
            max: MAX_NAME_LENGTH,
        });
    }

    Ok(())
}
