//! Role guards for handler signatures.
//!
//! `RequireAdmin(user)` in a handler's arguments is the whole authorization
//! rule for that route: the guard authenticates the bearer token, then checks
//! the role against its allow-list and answers 403 on a mismatch.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use staydesk_core::error::CoreError;
use staydesk_core::roles::{ROLE_ADMIN, USER_DIRECTORY_ROLES};

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Authenticate, then admit only principals whose role is in `allowed`.
/// An empty list admits every signed-in user.
async fn admit(
    parts: &mut Parts,
    state: &AppState,
    allowed: &[&str],
    denial: &str,
) -> Result<AuthUser, AppError> {
    let user = AuthUser::from_request_parts(parts, state).await?;
    if !allowed.is_empty() && !allowed.contains(&user.role.as_str()) {
        tracing::debug!(user_id = user.user_id, role = %user.role, "Role not admitted");
        return Err(AppError::Core(CoreError::Forbidden(denial.into())));
    }
    Ok(user)
}

macro_rules! role_guard {
    ($(#[$doc:meta])* $name:ident, $allowed:expr, $denial:literal) => {
        $(#[$doc])*
        pub struct $name(pub AuthUser);

        impl FromRequestParts<AppState> for $name {
            type Rejection = AppError;

            async fn from_request_parts(
                parts: &mut Parts,
                state: &AppState,
            ) -> Result<Self, Self::Rejection> {
                admit(parts, state, $allowed, $denial).await.map($name)
            }
        }
    };
}

role_guard!(
    /// Any signed-in staff member.
    RequireAuth,
    &[],
    "Forbidden"
);

role_guard!(
    /// Staff registration and other account administration.
    RequireAdmin,
    &[ROLE_ADMIN],
    "Admin role required"
);

role_guard!(
    /// The user directory: managers and admins.
    RequireManager,
    USER_DIRECTORY_ROLES,
    "Manager or Admin role required"
);
