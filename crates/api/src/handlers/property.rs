//! Handlers for the `/admin/properties` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use serde_json::Value;
use staydesk_core::blob::{resolve_url, BlobStore};
use staydesk_core::error::CoreError;
use staydesk_core::fields::FieldErrors;
use staydesk_core::types::DbId;
use staydesk_core::upload::PROPERTY_LOGO_MAX_KIB;
use staydesk_db::models::property::{CreateProperty, Property, PropertyFilter, UpdateProperty};
use staydesk_db::repositories::PropertyRepo;

use crate::error::{AppError, AppResult};
use crate::form::FormData;
use crate::middleware::rbac::RequireAuth;
use crate::query::PropertyListParams;
use crate::response::ApiResponse;
use crate::rules;
use crate::state::AppState;
use crate::uploads::{accept_image, discard_blob};

/// Blob store directory for property logos.
pub const PROPERTY_LOGO_DIR: &str = "properties/logos";

/// A property with its logo URL resolved.
#[derive(Debug, Serialize)]
pub struct PropertyView {
    #[serde(flatten)]
    pub property: Property,
    pub logo_url: Option<String>,
}

impl PropertyView {
    fn new(property: Property, blobs: &dyn BlobStore) -> Self {
        let logo_url = property.logo.as_deref().map(|path| resolve_url(blobs, path));
        Self { property, logo_url }
    }
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Property",
        id,
    })
}

/// Services arrive as a JSON array or, from multipart forms, as a
/// JSON-encoded string. Anything else is stored as an empty list.
fn parse_services(value: Option<&Value>) -> Value {
    match value {
        Some(Value::Array(items)) => Value::Array(items.clone()),
        Some(Value::String(raw)) => match serde_json::from_str::<Value>(raw) {
            Ok(Value::Array(items)) => Value::Array(items),
            _ => Value::Array(Vec::new()),
        },
        _ => Value::Array(Vec::new()),
    }
}

/// GET /api/v1/admin/properties?search=&stage=
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Query(params): Query<PropertyListParams>,
) -> AppResult<Json<ApiResponse<Vec<PropertyView>>>> {
    let filter = PropertyFilter {
        search: params.search.filter(|s| !s.trim().is_empty()),
        stage: params.stage.filter(|s| !s.trim().is_empty()),
    };
    let properties = PropertyRepo::list(&state.pool, &filter).await?;
    let views = properties
        .into_iter()
        .map(|p| PropertyView::new(p, state.blobs.as_ref()))
        .collect();
    Ok(Json(ApiResponse::data(views)))
}

/// POST /api/v1/admin/properties
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    form: FormData,
) -> AppResult<(StatusCode, Json<ApiResponse<PropertyView>>)> {
    let mut errors = FieldErrors::new();

    let property_name = rules::required_text(&form, &mut errors, "property_name", 255);
    let property_type = rules::optional_text(&form, &mut errors, "property_type", 100);
    let star_rating = rules::optional_text(&form, &mut errors, "star_rating", 10);
    let contact_person = rules::required_text(&form, &mut errors, "contact_person", 255);
    let phone = rules::required_text(&form, &mut errors, "phone", 50);
    let email = rules::required_text(&form, &mut errors, "email", 255);
    rules::check_email(&mut errors, "email", email.as_deref());
    let country = rules::optional_text(&form, &mut errors, "country", 100);
    let city = rules::required_text(&form, &mut errors, "city", 100);
    let address = rules::optional_text(&form, &mut errors, "address", 255);
    let onboarding_stage = rules::optional_text(&form, &mut errors, "onboarding_stage", 100);
    let ota_status = rules::optional_text(&form, &mut errors, "ota_status", 100);
    let seo_status = rules::optional_text(&form, &mut errors, "seo_status", 100);
    let notes = form.text("notes", &mut errors).filter(|s| !s.is_empty());
    let logo = accept_image(&form, "logo", PROPERTY_LOGO_MAX_KIB, &mut errors);

    errors.into_result()?;

    let logo_path = match &logo {
        Some(image) => Some(image.store(state.blobs.as_ref(), PROPERTY_LOGO_DIR).await?),
        None => None,
    };

    let input = CreateProperty {
        property_name: property_name.unwrap_or_default(),
        property_type,
        star_rating,
        logo: logo_path.clone(),
        contact_person: contact_person.unwrap_or_default(),
        phone: phone.unwrap_or_default(),
        email: email.unwrap_or_default(),
        country,
        city: city.unwrap_or_default(),
        address,
        onboarding_stage,
        ota_status,
        seo_status,
        services: parse_services(form.json("services")),
        notes,
    };

    let property = match PropertyRepo::create(&state.pool, &input).await {
        Ok(property) => property,
        Err(e) => {
            if let Some(path) = &logo_path {
                discard_blob(state.blobs.as_ref(), path).await;
            }
            return Err(e.into());
        }
    };

    tracing::info!(property_id = property.id, "Property created");
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            "Property created successfully",
            PropertyView::new(property, state.blobs.as_ref()),
        )),
    ))
}

/// GET /api/v1/admin/properties/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<Json<ApiResponse<PropertyView>>> {
    let property = PropertyRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(ApiResponse::data(PropertyView::new(
        property,
        state.blobs.as_ref(),
    ))))
}

/// PUT|PATCH /api/v1/admin/properties/{id}
///
/// A new `logo` file replaces the stored one; `remove_logo=true` drops it.
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<DbId>,
    form: FormData,
) -> AppResult<Json<ApiResponse<PropertyView>>> {
    let existing = PropertyRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    let mut errors = FieldErrors::new();
    let email = rules::sometimes_text(&form, &mut errors, "email", 255);
    rules::check_email(&mut errors, "email", email.as_deref());

    let mut patch = UpdateProperty {
        property_name: rules::sometimes_text(&form, &mut errors, "property_name", 255),
        property_type: rules::optional_text(&form, &mut errors, "property_type", 100),
        star_rating: rules::nullable_text(&form, &mut errors, "star_rating", Some(10)),
        logo: None,
        contact_person: rules::sometimes_text(&form, &mut errors, "contact_person", 255),
        phone: rules::sometimes_text(&form, &mut errors, "phone", 50),
        email,
        country: rules::optional_text(&form, &mut errors, "country", 100),
        city: rules::sometimes_text(&form, &mut errors, "city", 100),
        address: rules::nullable_text(&form, &mut errors, "address", Some(255)),
        onboarding_stage: rules::optional_text(&form, &mut errors, "onboarding_stage", 100),
        ota_status: rules::optional_text(&form, &mut errors, "ota_status", 100),
        seo_status: rules::optional_text(&form, &mut errors, "seo_status", 100),
        services: form
            .has("services")
            .then(|| parse_services(form.json("services"))),
        notes: rules::nullable_text(&form, &mut errors, "notes", None),
    };
    let remove_logo = form.boolean("remove_logo", &mut errors).unwrap_or(false);
    let logo = accept_image(&form, "logo", PROPERTY_LOGO_MAX_KIB, &mut errors);

    errors.into_result()?;

    let mut new_logo = None;
    if let Some(image) = &logo {
        let path = image.store(state.blobs.as_ref(), PROPERTY_LOGO_DIR).await?;
        patch.logo = Some(Some(path.clone()));
        new_logo = Some(path);
    } else if remove_logo {
        patch.logo = Some(None);
    }

    let updated = match PropertyRepo::update(&state.pool, id, &patch).await {
        Ok(Some(property)) => property,
        result => {
            if let Some(path) = &new_logo {
                discard_blob(state.blobs.as_ref(), path).await;
            }
            return match result {
                Err(e) => Err(e.into()),
                _ => Err(not_found(id)),
            };
        }
    };

    // The old logo goes only once nothing references it.
    if patch.logo.is_some() {
        if let Some(old) = existing.logo.as_deref() {
            discard_blob(state.blobs.as_ref(), old).await;
        }
    }

    Ok(Json(ApiResponse::with_message(
        "Property updated successfully",
        PropertyView::new(updated, state.blobs.as_ref()),
    )))
}

/// DELETE /api/v1/admin/properties/{id}
///
/// Rooms of the property stay, unattached.
pub async fn delete(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<Json<ApiResponse<()>>> {
    let existing = PropertyRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    if !PropertyRepo::delete(&state.pool, id).await? {
        return Err(not_found(id));
    }
    if let Some(logo) = existing.logo.as_deref() {
        discard_blob(state.blobs.as_ref(), logo).await;
    }

    tracing::info!(property_id = id, "Property deleted");
    Ok(Json(ApiResponse::ack("Property deleted successfully")))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn services_accept_arrays_and_encoded_arrays() {
        assert_eq!(
            parse_services(Some(&json!(["wifi", "spa"]))),
            json!(["wifi", "spa"])
        );
        assert_eq!(
            parse_services(Some(&json!("[\"pool\"]"))),
            json!(["pool"])
        );
    }

    #[test]
    fn services_fall_back_to_empty_list() {
        assert_eq!(parse_services(None), json!([]));
        assert_eq!(parse_services(Some(&json!("not json"))), json!([]));
        assert_eq!(parse_services(Some(&json!({ "a": 1 }))), json!([]));
        assert_eq!(parse_services(Some(&json!(null))), json!([]));
    }
}
