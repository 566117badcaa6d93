//! Staff accounts.

use serde::Serialize;
use sqlx::FromRow;
use staydesk_core::types::{DbId, Timestamp};

/// A `users` row joined with the name of its role.
///
/// Holds the password hash, so it is never serialized. Render it through
/// [`UserResponse`].
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub password_hash: String,
    pub role_id: DbId,
    pub role: String,
    pub is_active: bool,
    pub last_login_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// What the API shows of a user.
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub role: String,
    pub phone: Option<String>,
    pub is_active: bool,
    pub last_login_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            phone: user.phone,
            is_active: user.is_active,
            last_login_at: user.last_login_at,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    /// Stored as submitted; lookups compare with whitespace removed.
    pub phone: Option<String>,
    pub password_hash: String,
    pub role_id: DbId,
}
