//! Room and room image models.
//!
//! Rows are read through the resolved [`RoomSchema`], so `name`,
//! `description`, `is_active` and `sort_order` always carry their canonical
//! names here regardless of the physical columns behind them.
//!
//! [`RoomSchema`]: staydesk_core::room_schema::RoomSchema

use serde::Serialize;
use sqlx::FromRow;
use staydesk_core::types::{DbId, Timestamp};

/// A room row, normalised to canonical field names.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Room {
    pub id: DbId,
    pub property_id: Option<DbId>,
    pub name: String,
    pub description: String,
    pub is_active: bool,
    pub sort_order: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A room image row. `image_path` is a blob store path, never a URL.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RoomImage {
    pub id: DbId,
    pub room_id: DbId,
    pub image_path: String,
    pub sort_order: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting a room. Optional columns default when absent.
#[derive(Debug, Clone)]
pub struct CreateRoom {
    pub property_id: Option<DbId>,
    pub name: String,
    pub description: String,
    pub is_active: bool,
    pub sort_order: i32,
}

/// DTO for patching a room. `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateRoom {
    pub property_id: Option<Option<DbId>>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
    pub sort_order: Option<i32>,
}

