//! Handlers for rooms and their image sets.
//!
//! All work is delegated to [`RoomAggregate`]; these functions only bind
//! extractors and wrap results in the response envelope.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use staydesk_core::types::DbId;

use crate::error::AppResult;
use crate::form::FormData;
use crate::middleware::rbac::RequireAuth;
use crate::response::ApiResponse;
use crate::rooms::{RoomAggregate, RoomView};
use crate::state::AppState;

/// GET /api/v1/rooms
///
/// Public listing; also served at `/home/rooms` and `/admin/rooms`.
pub async fn list(State(state): State<AppState>) -> AppResult<Json<ApiResponse<Vec<RoomView>>>> {
    let rooms = RoomAggregate::from_state(&state).list().await?;
    Ok(Json(ApiResponse::data(rooms)))
}

/// GET /api/v1/admin/rooms
pub async fn admin_list(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
) -> AppResult<Json<ApiResponse<Vec<RoomView>>>> {
    list(State(state)).await
}

/// GET /api/v1/admin/properties/{id}/rooms
pub async fn list_for_property(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(property_id): Path<DbId>,
) -> AppResult<Json<ApiResponse<Vec<RoomView>>>> {
    let rooms = RoomAggregate::from_state(&state)
        .list_for_property(property_id)
        .await?;
    Ok(Json(ApiResponse::data(rooms)))
}

/// POST /api/v1/admin/rooms
///
/// Multipart: `name`, `description`, `property_id?`, `is_active?`,
/// `sort_order?` and one to three `images[]` files.
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    form: FormData,
) -> AppResult<(StatusCode, Json<ApiResponse<RoomView>>)> {
    let room = RoomAggregate::from_state(&state).create(&form).await?;
    tracing::debug!(room_id = room.id, user_id = user.user_id, "Room created via API");
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message("Room created successfully.", room)),
    ))
}

/// GET /api/v1/admin/rooms/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<Json<ApiResponse<RoomView>>> {
    let room = RoomAggregate::from_state(&state).read(id).await?;
    Ok(Json(ApiResponse::data(room)))
}

/// PUT|PATCH /api/v1/admin/rooms/{id}
///
/// Partial update. Sending `images` (even empty) replaces the whole set.
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<DbId>,
    form: FormData,
) -> AppResult<Json<ApiResponse<RoomView>>> {
    let room = RoomAggregate::from_state(&state).update(id, &form).await?;
    Ok(Json(ApiResponse::with_message(
        "Room updated successfully.",
        room,
    )))
}

/// DELETE /api/v1/admin/rooms/{id}
pub async fn delete(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<Json<ApiResponse<()>>> {
    RoomAggregate::from_state(&state).delete(id).await?;
    Ok(Json(ApiResponse::ack("Room deleted successfully.")))
}
