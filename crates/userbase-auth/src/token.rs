//! Bearer token issuance.
//!
//! Tokens are HS256 JWTs. Every token is signed with the same secret and
//! carries the same claim structure, so any holder of the secret can verify
//! it later without a store lookup.

use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use userbase_storage::UserStore;
use userbase_types::{IssuedToken, User};
use uuid::Uuid;

use crate::error::{AuthError, Result};

/// Minimum signing secret length in bytes (256 bits).
pub const MIN_SECRET_LENGTH: usize = 32;

/// Claims carried by every issued token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user ID.
    pub sub: String,
    /// Email of the user at issue time.
    pub email: String,
    /// Issued at (unix seconds).
    pub iat: i64,
    /// Expiration (unix seconds).
    pub exp: i64,
    /// Unique token ID.
    pub jti: String,
}

/// Signs and verifies bearer tokens.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl_secs: i64,
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("ttl_secs", &self.ttl_secs)
            .finish_non_exhaustive()
    }
}

impl TokenIssuer {
    /// Create an issuer from an HMAC secret and a token lifetime.
    pub fn new(secret: &str, ttl_secs: u64) -> Result<Self> {
        if secret.len() < MIN_SECRET_LENGTH {
            return Err(AuthError::Crypto(format!(
                "signing secret too short: {} bytes (minimum {} bytes required)",
                secret.len(),
                MIN_SECRET_LENGTH
            )));
        }

        let ttl_secs = i64::try_from(ttl_secs)
            .map_err(|_| AuthError::Crypto("token lifetime out of range".to_string()))?;

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::default(),
            ttl_secs,
        })
    }

    /// Token lifetime in seconds.
    pub fn ttl_secs(&self) -> i64 {
        self.ttl_secs
    }

    /// Sign a token for a user.
    pub fn issue(&self, user: &User) -> Result<String> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            iat: now,
            exp: now + self.ttl_secs,
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Crypto(format!("failed to sign token: {}", e)))
    }

    /// Verify a token's signature and expiry and return its claims.
    pub fn verify(&self, token: &str) -> Result<Claims> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))
    }
}

/// Issue a token for a verified user and record it against them.
///
/// The token is returned only once the store has accepted it; if the write
/// fails the token is dropped and never reaches the caller.
pub async fn issue_token(store: &dyn UserStore, issuer: &TokenIssuer, user: &User) -> Result<String> {
    let token = issuer.issue(user)?;

    store
        .append_token(
            &user.id,
            IssuedToken {
                token: token.clone(),
            },
        )
        .await?;

    Ok(token)
}
