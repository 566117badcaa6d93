//! Property entity model and DTOs.

use serde::Serialize;
use sqlx::FromRow;
use staydesk_core::types::{DbId, Timestamp};

/// A row from the `properties` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Property {
    pub id: DbId,
    pub property_name: String,
    pub property_type: String,
    pub star_rating: Option<String>,
    /// Blob store path of the logo.
    pub logo: Option<String>,
    pub contact_person: String,
    pub phone: String,
    pub email: String,
    pub country: String,
    pub city: String,
    pub address: Option<String>,
    pub onboarding_stage: String,
    pub ota_status: String,
    pub seo_status: String,
    /// JSON array of free-form service tags.
    pub services: serde_json::Value,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a property. `None` optional columns take their defaults.
#[derive(Debug, Clone)]
pub struct CreateProperty {
    pub property_name: String,
    pub property_type: Option<String>,
    pub star_rating: Option<String>,
    pub logo: Option<String>,
    pub contact_person: String,
    pub phone: String,
    pub email: String,
    pub country: Option<String>,
    pub city: String,
    pub address: Option<String>,
    pub onboarding_stage: Option<String>,
    pub ota_status: Option<String>,
    pub seo_status: Option<String>,
    pub services: serde_json::Value,
    pub notes: Option<String>,
}

/// DTO for patching a property. All fields are optional.
///
/// Nullable columns use `Option<Option<_>>` so a present-but-empty value
/// clears them.
#[derive(Debug, Clone, Default)]
pub struct UpdateProperty {
    pub property_name: Option<String>,
    pub property_type: Option<String>,
    pub star_rating: Option<Option<String>>,
    pub logo: Option<Option<String>>,
    pub contact_person: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
    pub address: Option<Option<String>>,
    pub onboarding_stage: Option<String>,
    pub ota_status: Option<String>,
    pub seo_status: Option<String>,
    pub services: Option<serde_json::Value>,
    pub notes: Option<Option<String>>,
}

/// Filters for the admin property listing.
#[derive(Debug, Clone, Default)]
pub struct PropertyFilter {
    /// Case-insensitive substring over name, city, contact person and e-mail.
    pub search: Option<String>,
    /// Exact onboarding stage; `All` or `None` disables the filter.
    pub stage: Option<String>,
}
