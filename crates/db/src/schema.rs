//! Runtime schema descriptor for the rooms and room_images tables.
//!
//! Column sets are read from `information_schema.columns` the first time a
//! table is asked about and cached for the life of the process. Each table
//! is loaded at most once, even under concurrent first use.

use std::collections::HashSet;

use sqlx::PgPool;
use staydesk_core::room_schema::{RoomSchema, SchemaError, ROOMS_TABLE, ROOM_IMAGES_TABLE};
use tokio::sync::OnceCell;

/// Failure while resolving the room capability record.
#[derive(Debug, thiserror::Error)]
pub enum SchemaLoadError {
    #[error("Failed to introspect schema: {0}")]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Schema(#[from] SchemaError),
}

/// Answers "does column X exist" for the room tables.
///
/// Construct one per process and share it; there is no invalidation.
pub struct SchemaDescriptor {
    pool: PgPool,
    rooms: OnceCell<HashSet<String>>,
    room_images: OnceCell<HashSet<String>>,
}

impl SchemaDescriptor {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            rooms: OnceCell::new(),
            room_images: OnceCell::new(),
        }
    }

    pub async fn has_room_column(&self, column: &str) -> Result<bool, sqlx::Error> {
        Ok(self.room_columns().await?.contains(column))
    }

    pub async fn has_image_column(&self, column: &str) -> Result<bool, sqlx::Error> {
        Ok(self.image_columns().await?.contains(column))
    }

    /// Resolve the capability record the room aggregate runs against.
    pub async fn resolve_room_schema(&self) -> Result<RoomSchema, SchemaLoadError> {
        let rooms = self.room_columns().await?;
        let images = self.image_columns().await?;

        let schema = RoomSchema::from_columns(|c| rooms.contains(c), |c| images.contains(c))?;
        tracing::info!(
            name_column = schema.name.as_str(),
            description_column = schema.description.as_str(),
            property_id = schema.property_id,
            is_active = schema.is_active,
            sort_order = schema.sort_order,
            image_sort_order = schema.image_sort_order,
            "Resolved room schema"
        );
        Ok(schema)
    }

    async fn room_columns(&self) -> Result<&HashSet<String>, sqlx::Error> {
        self.rooms
            .get_or_try_init(|| load_columns(&self.pool, ROOMS_TABLE))
            .await
    }

    async fn image_columns(&self) -> Result<&HashSet<String>, sqlx::Error> {
        self.room_images
            .get_or_try_init(|| load_columns(&self.pool, ROOM_IMAGES_TABLE))
            .await
    }
}

async fn load_columns(pool: &PgPool, table: &str) -> Result<HashSet<String>, sqlx::Error> {
    let rows: Vec<(String,)> = sqlx::query_as(
        "SELECT column_name::TEXT
         FROM information_schema.columns
         WHERE table_schema = current_schema()
           AND table_name = $1",
    )
    .bind(table)
    .fetch_all(pool)
    .await?;

    tracing::debug!(table, columns = rows.len(), "Loaded table columns");
    Ok(rows.into_iter().map(|(c,)| c).collect())
}
