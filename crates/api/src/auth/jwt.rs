//! Bearer and refresh tokens for staff sessions.
//!
//! The bearer token is an HS256 JWT issued by `staydesk` and carrying the
//! user id and role name. A refresh token is 32 random bytes, hex encoded;
//! the client holds the plaintext and `user_sessions` holds its SHA-256, so
//! each refresh looks the session up by hash and rotates it.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use staydesk_core::types::DbId;

use crate::config::JwtConfig;

/// `iss` claim on every bearer token.
pub const ISSUER: &str = "staydesk";

/// Claims of a bearer token.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct AccessClaims {
    pub sub: DbId,
    /// Role name at issue time.
    pub role: String,
    pub iss: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("token signing failed: {0}")]
    Signing(jsonwebtoken::errors::Error),

    #[error("token rejected: {0}")]
    Rejected(jsonwebtoken::errors::Error),
}

/// A signed bearer token and its lifetime in seconds.
#[derive(Debug, Clone)]
pub struct AccessToken {
    pub token: String,
    pub expires_in: i64,
}

/// Sign a bearer token for `user_id` acting as `role`.
pub fn issue_access_token(
    user_id: DbId,
    role: &str,
    config: &JwtConfig,
) -> Result<AccessToken, TokenError> {
    let expires_in = config.access_token_expiry_mins * 60;
    let now = Utc::now().timestamp();
    let claims = AccessClaims {
        sub: user_id,
        role: role.to_string(),
        iss: ISSUER.to_string(),
        iat: now,
        exp: now + expires_in,
    };

    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
    .map_err(TokenError::Signing)?;

    Ok(AccessToken { token, expires_in })
}

/// Verify signature, issuer and expiry of a bearer token.
pub fn verify_access_token(token: &str, config: &JwtConfig) -> Result<AccessClaims, TokenError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);
    validation.set_required_spec_claims(&["exp", "iss", "sub"]);

    decode::<AccessClaims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(TokenError::Rejected)
}

/// A freshly minted refresh token.
#[derive(Debug, Clone)]
pub struct RefreshToken {
    /// Returned to the client once.
    pub plaintext: String,
    /// Persisted in `user_sessions.refresh_token_hash`.
    pub hash: String,
    pub expires_at: DateTime<Utc>,
}

impl RefreshToken {
    pub fn issue(config: &JwtConfig) -> Self {
        let mut bytes = [0u8; 32];
        rand::rng().fill_bytes(&mut bytes);
        let plaintext = to_hex(&bytes);
        Self {
            hash: Self::hash(&plaintext),
            plaintext,
            expires_at: Utc::now() + Duration::days(config.refresh_token_expiry_days),
        }
    }

    /// Lookup key for a presented refresh token.
    pub fn hash(plaintext: &str) -> String {
        to_hex(&Sha256::digest(plaintext.as_bytes()))
    }
}

fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
