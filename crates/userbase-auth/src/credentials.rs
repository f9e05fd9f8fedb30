//! Credential verification.

use userbase_storage::UserStore;
use userbase_types::{normalize_email, User};

use crate::error::{AuthError, Result};
use crate::password::verify_password_blocking;

/// Look up a user by email and check their password.
///
/// Fails with [`AuthError::NotFound`] when no user has the email and with
/// [`AuthError::InvalidCredentials`] when the password does not match. The
/// two outcomes are kept distinct.
pub async fn verify_credentials(store: &dyn UserStore, email: &str, password: &str) -> Result<User> {
    let email = normalize_email(email);

    let user = store
        .find_by_email(&email)
        .await?
        .ok_or_else(|| AuthError::NotFound(email.clone()))?;

    if !verify_password_blocking(password.to_string(), user.password.clone()).await? {
        return Err(AuthError::InvalidCredentials);
    }

    Ok(user)
}
