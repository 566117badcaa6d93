//! Staff directory for managers and admins.

use axum::extract::{Query, State};
use axum::Json;
use staydesk_db::models::user::UserResponse;
use staydesk_db::repositories::UserRepo;

use crate::error::AppResult;
use crate::middleware::rbac::RequireManager;
use crate::query::LimitParams;
use crate::response::ApiResponse;
use crate::state::AppState;

const DEFAULT_LIMIT: i64 = 4;
const MAX_LIMIT: i64 = 50;

/// GET /api/v1/admin/users?limit=N
///
/// Newest users first. `limit` defaults to 4 and is clamped to `[1, 50]`.
pub async fn list(
    State(state): State<AppState>,
    RequireManager(_user): RequireManager,
    Query(params): Query<LimitParams>,
) -> AppResult<Json<ApiResponse<Vec<UserResponse>>>> {
    let limit = params.resolve(DEFAULT_LIMIT, MAX_LIMIT);
    let users = UserRepo::list_latest(&state.pool, limit).await?;
    Ok(Json(ApiResponse::data(
        users.into_iter().map(UserResponse::from).collect(),
    )))
}
