//! Refresh sessions in `user_sessions`.
//!
//! A session is live while it is unrevoked and unexpired. Refreshing spends
//! the session in one statement, so a refresh token works at most once.

use sqlx::PgPool;
use staydesk_core::types::DbId;

use crate::models::session::{NewSession, UserSession};

pub struct SessionRepo;

impl SessionRepo {
    pub async fn open(pool: &PgPool, input: &NewSession) -> Result<UserSession, sqlx::Error> {
        sqlx::query_as::<_, UserSession>(
            "INSERT INTO user_sessions (user_id, refresh_token_hash, expires_at)
             VALUES ($1, $2, $3)
             RETURNING id, user_id, expires_at",
        )
        .bind(input.user_id)
        .bind(&input.refresh_token_hash)
        .bind(input.expires_at)
        .fetch_one(pool)
        .await
    }

    /// Revoke the live session holding `refresh_token_hash` and return it.
    /// `None` when no live session matches, including when a concurrent
    /// refresh spent it first.
    pub async fn consume(
        pool: &PgPool,
        refresh_token_hash: &str,
    ) -> Result<Option<UserSession>, sqlx::Error> {
        sqlx::query_as::<_, UserSession>(
            "UPDATE user_sessions SET is_revoked = true
             WHERE refresh_token_hash = $1
               AND NOT is_revoked
               AND expires_at > NOW()
             RETURNING id, user_id, expires_at",
        )
        .bind(refresh_token_hash)
        .fetch_optional(pool)
        .await
    }

    /// Revoke every live session of `user_id`; returns how many there were.
    pub async fn revoke_all_for_user(pool: &PgPool, user_id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE user_sessions SET is_revoked = true
             WHERE user_id = $1 AND NOT is_revoked",
        )
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}
