//! Bearer authentication for staff routes.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use staydesk_core::error::CoreError;
use staydesk_core::types::DbId;

use crate::auth::jwt::verify_access_token;
use crate::error::AppError;
use crate::state::AppState;

/// The signed-in staff member behind a request.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: DbId,
    /// Role name carried by the bearer token.
    pub role: String,
}

fn unauthenticated(message: &str) -> AppError {
    AppError::Core(CoreError::Unauthorized(message.into()))
}

/// The token of an `Authorization: Bearer <token>` header. The scheme is
/// matched case-insensitively.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    let value = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| unauthenticated("Unauthenticated."))?;

    match value.split_once(' ') {
        Some((scheme, token)) if scheme.eq_ignore_ascii_case("bearer") && !token.trim().is_empty() => {
            Ok(token.trim())
        }
        _ => Err(unauthenticated(
            "Invalid Authorization format. Expected: Bearer <token>",
        )),
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)?;
        let claims = verify_access_token(token, &state.config.jwt).map_err(|e| {
            tracing::debug!(error = %e, "Rejected bearer token");
            unauthenticated("Invalid or expired token")
        })?;

        Ok(AuthUser {
            user_id: claims.sub,
            role: claims.role,
        })
    }
}
