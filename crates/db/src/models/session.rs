//! Refresh sessions.

use sqlx::FromRow;
use staydesk_core::types::{DbId, Timestamp};

/// A `user_sessions` row as the auth flow needs it. The token hash and the
/// revocation flag stay in the database.
#[derive(Debug, Clone, FromRow)]
pub struct UserSession {
    pub id: DbId,
    pub user_id: DbId,
    pub expires_at: Timestamp,
}

pub struct NewSession {
    pub user_id: DbId,
    /// SHA-256 of the refresh token handed to the client.
    pub refresh_token_hash: String,
    pub expires_at: Timestamp,
}
