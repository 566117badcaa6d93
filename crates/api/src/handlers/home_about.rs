//! Handlers for the homepage "about" block.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use staydesk_core::error::CoreError;
use staydesk_core::fields::FieldErrors;
use staydesk_core::types::DbId;
use staydesk_db::models::home::{CreateHomeAbout, HomeAbout, UpdateHomeAbout};
use staydesk_db::repositories::HomeAboutRepo;

use crate::error::{AppError, AppResult};
use crate::form::FormData;
use crate::middleware::rbac::RequireAuth;
use crate::response::ApiResponse;
use crate::rules;
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "HomeAbout",
        id,
    })
}

/// GET /api/v1/home/about
pub async fn show_public(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Option<HomeAbout>>>> {
    let about = HomeAboutRepo::find_latest_active(&state.pool).await?;
    Ok(Json(ApiResponse::data(about)))
}

/// GET /api/v1/admin/home/about
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
) -> AppResult<Json<ApiResponse<Vec<HomeAbout>>>> {
    let rows = HomeAboutRepo::list(&state.pool).await?;
    Ok(Json(ApiResponse::data(rows)))
}

/// GET /api/v1/admin/home/about/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<Json<ApiResponse<HomeAbout>>> {
    let about = HomeAboutRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(ApiResponse::data(about)))
}

/// POST /api/v1/admin/home/about
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    form: FormData,
) -> AppResult<(StatusCode, Json<ApiResponse<HomeAbout>>)> {
    let mut errors = FieldErrors::new();
    let input = CreateHomeAbout {
        title: rules::required_text(&form, &mut errors, "title", 255).unwrap_or_default(),
        description: form.text("description", &mut errors).filter(|s| !s.is_empty()),
        mission_title: rules::optional_text(&form, &mut errors, "mission_title", 255),
        mission_text: form.text("mission_text", &mut errors).filter(|s| !s.is_empty()),
        vision_title: rules::optional_text(&form, &mut errors, "vision_title", 255),
        vision_text: form.text("vision_text", &mut errors).filter(|s| !s.is_empty()),
        is_active: form.boolean("is_active", &mut errors).unwrap_or(true),
    };
    errors.into_result()?;

    let about = HomeAboutRepo::create(&state.pool, &input).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message("Home About created.", about)),
    ))
}

/// PUT|PATCH /api/v1/admin/home/about/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<DbId>,
    form: FormData,
) -> AppResult<Json<ApiResponse<HomeAbout>>> {
    if HomeAboutRepo::find_by_id(&state.pool, id).await?.is_none() {
        return Err(not_found(id));
    }

    let mut errors = FieldErrors::new();
    let patch = UpdateHomeAbout {
        title: rules::sometimes_text(&form, &mut errors, "title", 255),
        description: rules::nullable_text(&form, &mut errors, "description", None),
        mission_title: rules::optional_text(&form, &mut errors, "mission_title", 255),
        mission_text: rules::nullable_text(&form, &mut errors, "mission_text", None),
        vision_title: rules::optional_text(&form, &mut errors, "vision_title", 255),
        vision_text: rules::nullable_text(&form, &mut errors, "vision_text", None),
        is_active: form.boolean("is_active", &mut errors),
    };
    errors.into_result()?;

    let about = HomeAboutRepo::update(&state.pool, id, &patch)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(ApiResponse::with_message("Home About updated.", about)))
}

/// DELETE /api/v1/admin/home/about/{id}
pub async fn delete(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<Json<ApiResponse<()>>> {
    if !HomeAboutRepo::delete(&state.pool, id).await? {
        return Err(not_found(id));
    }
    Ok(Json(ApiResponse::ack("Deleted.")))
}
