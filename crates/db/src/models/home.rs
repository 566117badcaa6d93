//! Homepage content models: the hero section and the about block.

use serde::Serialize;
use sqlx::FromRow;
use staydesk_core::types::{DbId, Timestamp};

/// A row from `home_section_ones` (the homepage hero).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct HomeSection {
    pub id: DbId,
    pub title: String,
    pub subtitle: Option<String>,
    /// Blob store path of the hero image.
    pub image: Option<String>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone)]
pub struct CreateHomeSection {
    pub title: String,
    pub subtitle: Option<String>,
    pub image: Option<String>,
    pub is_active: bool,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateHomeSection {
    pub title: Option<String>,
    pub subtitle: Option<Option<String>>,
    pub image: Option<Option<String>>,
    pub is_active: Option<bool>,
}

/// A row from `home_abouts`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct HomeAbout {
    pub id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub mission_title: String,
    pub mission_text: Option<String>,
    pub vision_title: String,
    pub vision_text: Option<String>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone)]
pub struct CreateHomeAbout {
    pub title: String,
    pub description: Option<String>,
    pub mission_title: Option<String>,
    pub mission_text: Option<String>,
    pub vision_title: Option<String>,
    pub vision_text: Option<String>,
    pub is_active: bool,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateHomeAbout {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub mission_title: Option<String>,
    pub mission_text: Option<Option<String>>,
    pub vision_title: Option<String>,
    pub vision_text: Option<Option<String>>,
    pub is_active: Option<bool>,
}
