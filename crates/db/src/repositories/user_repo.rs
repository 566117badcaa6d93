//! Queries over `users`. Every read joins `roles` so callers get the role
//! name with the account.

use sqlx::PgPool;
use staydesk_core::types::DbId;

use crate::models::user::{NewUser, User};

const SELECT_USER: &str = "SELECT u.id, u.name, u.email, u.phone, u.password_hash, u.role_id, \
                           r.name AS role, u.is_active, u.last_login_at, u.created_at, \
                           u.updated_at \
                           FROM users u JOIN roles r ON r.id = u.role_id";

pub struct UserRepo;

impl UserRepo {
    /// Insert an account and read it back with its role name.
    pub async fn create(pool: &PgPool, input: &NewUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "WITH inserted AS (
                 INSERT INTO users (name, email, phone, password_hash, role_id)
                 VALUES ($1, $2, $3, $4, $5)
                 RETURNING id
             )
             {SELECT_USER} JOIN inserted ON inserted.id = u.id"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.password_hash)
            .bind(input.role_id)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("{SELECT_USER} WHERE u.id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Email match ignores case.
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!("{SELECT_USER} WHERE LOWER(u.email) = LOWER($1)");
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// `phone` must already be stripped of whitespace; stored numbers are
    /// stripped before comparing.
    pub async fn find_by_phone(pool: &PgPool, phone: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!("{SELECT_USER} WHERE regexp_replace(u.phone, '\\s', '', 'g') = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(phone)
            .fetch_optional(pool)
            .await
    }

    pub async fn email_taken(pool: &PgPool, email: &str) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM users WHERE LOWER(email) = LOWER($1))")
            .bind(email)
            .fetch_one(pool)
            .await
    }

    /// The `limit` most recently created accounts, newest first.
    pub async fn list_latest(pool: &PgPool, limit: i64) -> Result<Vec<User>, sqlx::Error> {
        let query = format!("{SELECT_USER} ORDER BY u.created_at DESC, u.id DESC LIMIT $1");
        sqlx::query_as::<_, User>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    pub async fn touch_last_login(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE users SET last_login_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }
}
