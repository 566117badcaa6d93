//! JSON shape of a room and its images.

use serde::Serialize;
use staydesk_core::blob::{resolve_url, BlobStore};
use staydesk_core::types::{DbId, Timestamp};
use staydesk_db::models::room::{Room, RoomImage};

#[derive(Debug, Clone, Serialize)]
pub struct RoomImageView {
    pub id: DbId,
    pub image_path: String,
    /// Derived on read, never stored.
    pub image_url: String,
    pub sort_order: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Serialize)]
pub struct RoomView {
    pub id: DbId,
    pub property_id: Option<DbId>,
    pub name: String,
    pub description: String,
    pub is_active: bool,
    pub sort_order: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub images: Vec<RoomImageView>,
}

impl RoomImageView {
    pub fn new(image: RoomImage, blobs: &dyn BlobStore) -> Self {
        Self {
            image_url: resolve_url(blobs, &image.image_path),
            id: image.id,
            image_path: image.image_path,
            sort_order: image.sort_order,
            created_at: image.created_at,
            updated_at: image.updated_at,
        }
    }
}

impl RoomView {
    /// `images` must already be in display order.
    pub fn new(room: Room, images: Vec<RoomImage>, blobs: &dyn BlobStore) -> Self {
        Self {
            id: room.id,
            property_id: room.property_id,
            name: room.name,
            description: room.description,
            is_active: room.is_active,
            sort_order: room.sort_order,
            created_at: room.created_at,
            updated_at: room.updated_at,
            images: images
                .into_iter()
                .map(|image| RoomImageView::new(image, blobs))
                .collect(),
        }
    }

    /// Attach images to rooms, keeping both orders.
    ///
    /// `images` may be for any subset of `rooms`; each room keeps its images
    /// in the order they appear in `images`.
    pub fn assemble(rooms: Vec<Room>, images: Vec<RoomImage>, blobs: &dyn BlobStore) -> Vec<Self> {
        let mut by_room: std::collections::HashMap<DbId, Vec<RoomImage>> =
            std::collections::HashMap::new();
        for image in images {
            by_room.entry(image.room_id).or_default().push(image);
        }

        rooms
            .into_iter()
            .map(|room| {
                let images = by_room.remove(&room.id).unwrap_or_default();
                Self::new(room, images, blobs)
            })
            .collect()
    }
}
