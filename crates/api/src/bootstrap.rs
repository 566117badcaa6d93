//! Startup seeding of the first administrator account.

use sqlx::PgPool;
use staydesk_core::roles::ROLE_ADMIN;
use staydesk_db::models::user::NewUser;
use staydesk_db::repositories::{RoleRepo, UserRepo};

use crate::auth::password::hash_password;
use crate::config::BootstrapAdmin;
use crate::error::{AppError, AppResult};

/// Create the configured admin unless a user with that email already exists.
///
/// Returns `true` when a row was inserted. An existing account is left as is,
/// including its password.
pub async fn ensure_admin(pool: &PgPool, admin: &BootstrapAdmin) -> AppResult<bool> {
    if UserRepo::email_taken(pool, &admin.email).await? {
        tracing::debug!(email = %admin.email, "Bootstrap admin already present");
        return Ok(false);
    }

    let role_id = RoleRepo::id_for_name(pool, ROLE_ADMIN)
        .await?
        .ok_or_else(|| AppError::InternalError("admin role is not seeded".into()))?;
    let password_hash = hash_password(&admin.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        pool,
        &NewUser {
            name: admin.name.clone(),
            email: admin.email.clone(),
            phone: None,
            password_hash,
            role_id,
        },
    )
    .await?;

    tracing::info!(user_id = user.id, email = %user.email, "Bootstrap admin created");
    Ok(true)
}
