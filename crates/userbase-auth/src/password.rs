//! Password hashing with Argon2id.
//!
//! Hashes are stored in PHC string format, which embeds the algorithm,
//! parameters and per-hash random salt, so verification needs nothing but
//! the stored string.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::error::{AuthError, Result};

/// Hash a plaintext password with a fresh random salt.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::Crypto(e.to_string()))
}

/// Check a plaintext password against a stored hash.
///
/// Returns `Ok(false)` on mismatch; `Err` only if the stored hash is
/// malformed.
pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let parsed_hash = PasswordHash::new(hash).map_err(|e| AuthError::Crypto(e.to_string()))?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(AuthError::Crypto(e.to_string())),
    }
}

/// [`hash_password`] on the blocking thread pool.
pub async fn hash_password_blocking(password: String) -> Result<String> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| AuthError::Crypto(format!("hashing task failed: {}", e)))?
}

/// [`verify_password`] on the blocking thread pool.
pub async fn verify_password_blocking(password: String, hash: String) -> Result<bool> {
    tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .map_err(|e| AuthError::Crypto(format!("verification task failed: {}", e)))?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("secret123").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("secret123", &hash).unwrap());
        assert!(!verify_password("wrong", &hash).unwrap());
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password("secret123").unwrap();
        let b = hash_password("secret123").unwrap();
        assert_ne!(a, b);
        assert!(verify_password("secret123", &a).unwrap());
        assert!(verify_password("secret123", &b).unwrap());
    }

    #[test]
    fn test_verify_malformed_hash() {
        let err = verify_password("secret123", "not-a-phc-string").unwrap_err();
        assert!(matches!(err, AuthError::Crypto(_)));
    }

    #[tokio::test]
    async fn test_blocking_variants() {
        let hash = hash_password_blocking("secret123".to_string()).await.unwrap();
        assert!(verify_password_blocking("secret123".to_string(), hash.clone())
            .await
            .unwrap());
        assert!(!verify_password_blocking("nope".to_string(), hash).await.unwrap());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(8))]

        /// Property: the stored hash never equals the plaintext
        #[test]
        fn prop_hash_never_plaintext(password in "[a-zA-Z0-9]{6,32}") {
            let hash = hash_password(&password).unwrap();
            prop_assert_ne!(&hash, &password);
            prop_assert!(verify_password(&password, &hash).unwrap());
        }
    }
}
