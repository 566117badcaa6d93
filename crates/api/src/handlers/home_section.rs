//! Handlers for the homepage hero ("section one").

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use staydesk_core::blob::{resolve_url, BlobStore};
use staydesk_core::error::CoreError;
use staydesk_core::fields::FieldErrors;
use staydesk_core::types::DbId;
use staydesk_core::upload::HERO_IMAGE_MAX_KIB;
use staydesk_db::models::home::{CreateHomeSection, HomeSection, UpdateHomeSection};
use staydesk_db::repositories::HomeSectionRepo;

use crate::error::{AppError, AppResult};
use crate::form::FormData;
use crate::middleware::rbac::RequireAuth;
use crate::response::ApiResponse;
use crate::rules;
use crate::state::AppState;
use crate::uploads::{accept_image, discard_blob};

/// Blob store directory for hero images.
pub const HERO_IMAGE_DIR: &str = "home/section1";

#[derive(Debug, Serialize)]
pub struct HomeSectionView {
    #[serde(flatten)]
    pub section: HomeSection,
    pub image_url: Option<String>,
}

impl HomeSectionView {
    fn new(section: HomeSection, blobs: &dyn BlobStore) -> Self {
        let image_url = section.image.as_deref().map(|path| resolve_url(blobs, path));
        Self { section, image_url }
    }
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "HomeSectionOne",
        id,
    })
}

/// GET /api/v1/home/section-one
///
/// Public: the latest active hero, or `null`.
pub async fn show_public(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Option<HomeSectionView>>>> {
    let section = HomeSectionRepo::find_latest_active(&state.pool).await?;
    Ok(Json(ApiResponse::data(
        section.map(|s| HomeSectionView::new(s, state.blobs.as_ref())),
    )))
}

/// GET /api/v1/admin/home/section-one
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
) -> AppResult<Json<ApiResponse<Vec<HomeSectionView>>>> {
    let sections = HomeSectionRepo::list(&state.pool).await?;
    let views = sections
        .into_iter()
        .map(|s| HomeSectionView::new(s, state.blobs.as_ref()))
        .collect();
    Ok(Json(ApiResponse::data(views)))
}

/// GET /api/v1/admin/home/section-one/current
///
/// The latest row. An empty active row is created when none exists, so the
/// admin editor always has something to bind to.
pub async fn current(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
) -> AppResult<Json<ApiResponse<HomeSectionView>>> {
    let section = match HomeSectionRepo::find_latest(&state.pool).await? {
        Some(section) => section,
        None => {
            let created = HomeSectionRepo::create(
                &state.pool,
                &CreateHomeSection {
                    title: String::new(),
                    subtitle: Some(String::new()),
                    image: None,
                    is_active: true,
                },
            )
            .await?;
            tracing::info!(section_id = created.id, "Created empty hero section");
            created
        }
    };
    Ok(Json(ApiResponse::data(HomeSectionView::new(
        section,
        state.blobs.as_ref(),
    ))))
}

/// GET /api/v1/admin/home/section-one/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<Json<ApiResponse<HomeSectionView>>> {
    let section = HomeSectionRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(ApiResponse::data(HomeSectionView::new(
        section,
        state.blobs.as_ref(),
    ))))
}

/// POST /api/v1/admin/home/section-one
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    form: FormData,
) -> AppResult<(StatusCode, Json<ApiResponse<HomeSectionView>>)> {
    let mut errors = FieldErrors::new();
    let title = rules::required_text(&form, &mut errors, "title", 255);
    let subtitle = rules::nullable_text(&form, &mut errors, "subtitle", Some(255)).flatten();
    let is_active = form.boolean("is_active", &mut errors).unwrap_or(true);
    let image = accept_image(&form, "image", HERO_IMAGE_MAX_KIB, &mut errors);
    errors.into_result()?;

    let image_path = match &image {
        Some(image) => Some(image.store(state.blobs.as_ref(), HERO_IMAGE_DIR).await?),
        None => None,
    };

    let input = CreateHomeSection {
        title: title.unwrap_or_default(),
        subtitle,
        image: image_path.clone(),
        is_active,
    };
    let section = match HomeSectionRepo::create(&state.pool, &input).await {
        Ok(section) => section,
        Err(e) => {
            if let Some(path) = &image_path {
                discard_blob(state.blobs.as_ref(), path).await;
            }
            return Err(e.into());
        }
    };

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            "Home Section One created.",
            HomeSectionView::new(section, state.blobs.as_ref()),
        )),
    ))
}

/// PUT|PATCH /api/v1/admin/home/section-one/{id}
///
/// `remove_image=true` drops the stored image; a new `image` replaces it.
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<DbId>,
    form: FormData,
) -> AppResult<Json<ApiResponse<HomeSectionView>>> {
    let existing = HomeSectionRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    let mut errors = FieldErrors::new();
    let mut patch = UpdateHomeSection {
        title: rules::sometimes_text(&form, &mut errors, "title", 255),
        subtitle: rules::nullable_text(&form, &mut errors, "subtitle", Some(255)),
        image: None,
        is_active: form.boolean("is_active", &mut errors),
    };
    let remove_image = form.boolean("remove_image", &mut errors).unwrap_or(false);
    let image = accept_image(&form, "image", HERO_IMAGE_MAX_KIB, &mut errors);
    errors.into_result()?;

    let mut new_image = None;
    if let Some(image) = &image {
        let path = image.store(state.blobs.as_ref(), HERO_IMAGE_DIR).await?;
        patch.image = Some(Some(path.clone()));
        new_image = Some(path);
    } else if remove_image {
        patch.image = Some(None);
    }

    let updated = match HomeSectionRepo::update(&state.pool, id, &patch).await {
        Ok(Some(section)) => section,
        result => {
            if let Some(path) = &new_image {
                discard_blob(state.blobs.as_ref(), path).await;
            }
            return match result {
                Err(e) => Err(e.into()),
                _ => Err(not_found(id)),
            };
        }
    };

    if patch.image.is_some() {
        if let Some(old) = existing.image.as_deref() {
            discard_blob(state.blobs.as_ref(), old).await;
        }
    }

    Ok(Json(ApiResponse::with_message(
        "Home Section One updated.",
        HomeSectionView::new(updated, state.blobs.as_ref()),
    )))
}

/// DELETE /api/v1/admin/home/section-one/{id}
pub async fn delete(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<Json<ApiResponse<()>>> {
    let existing = HomeSectionRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    if !HomeSectionRepo::delete(&state.pool, id).await? {
        return Err(not_found(id));
    }
    if let Some(image) = existing.image.as_deref() {
        discard_blob(state.blobs.as_ref(), image).await;
    }
    Ok(Json(ApiResponse::ack("Deleted.")))
}
