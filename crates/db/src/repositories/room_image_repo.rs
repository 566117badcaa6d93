//! Repository for the `room_images` table.
//!
//! Images are only ever written through the room aggregate; there is no
//! per-image update. `sort_order` reads as 0 when the column is absent.

use sqlx::PgExecutor;
use staydesk_core::room_schema::RoomSchema;
use staydesk_core::types::DbId;

use crate::models::room::RoomImage;

fn select_list(schema: &RoomSchema) -> String {
    let sort_order = if schema.image_sort_order {
        "COALESCE(sort_order, 0)::INTEGER"
    } else {
        "0::INTEGER"
    };
    format!("id, room_id, image_path, {sort_order} AS sort_order, created_at, updated_at")
}

fn order_by(schema: &RoomSchema) -> &'static str {
    if schema.image_sort_order {
        "sort_order ASC, id ASC"
    } else {
        "id ASC"
    }
}

/// Provides operations on a room's image set.
pub struct RoomImageRepo;

impl RoomImageRepo {
    /// Images of one room in display order.
    pub async fn list_for_room<'e, E>(
        executor: E,
        schema: &RoomSchema,
        room_id: DbId,
    ) -> Result<Vec<RoomImage>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "SELECT {} FROM room_images WHERE room_id = $1 ORDER BY {}",
            select_list(schema),
            order_by(schema)
        );
        sqlx::query_as::<_, RoomImage>(&query)
            .bind(room_id)
            .fetch_all(executor)
            .await
    }

    /// Images of several rooms, grouped by room and in display order within each.
    pub async fn list_for_rooms<'e, E>(
        executor: E,
        schema: &RoomSchema,
        room_ids: &[DbId],
    ) -> Result<Vec<RoomImage>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        if room_ids.is_empty() {
            return Ok(Vec::new());
        }
        let query = format!(
            "SELECT {} FROM room_images WHERE room_id = ANY($1) ORDER BY room_id, {}",
            select_list(schema),
            order_by(schema)
        );
        sqlx::query_as::<_, RoomImage>(&query)
            .bind(room_ids)
            .fetch_all(executor)
            .await
    }

    /// Insert one image row. `sort_order` is dropped when the column is absent.
    pub async fn create<'e, E>(
        executor: E,
        schema: &RoomSchema,
        room_id: DbId,
        image_path: &str,
        sort_order: i32,
    ) -> Result<RoomImage, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let returning = select_list(schema);
        if schema.image_sort_order {
            let query = format!(
                "INSERT INTO room_images (room_id, image_path, sort_order)
                 VALUES ($1, $2, $3)
                 RETURNING {returning}"
            );
            sqlx::query_as::<_, RoomImage>(&query)
                .bind(room_id)
                .bind(image_path)
                .bind(sort_order)
                .fetch_one(executor)
                .await
        } else {
            let query = format!(
                "INSERT INTO room_images (room_id, image_path)
                 VALUES ($1, $2)
                 RETURNING {returning}"
            );
            sqlx::query_as::<_, RoomImage>(&query)
                .bind(room_id)
                .bind(image_path)
                .fetch_one(executor)
                .await
        }
    }

    /// Delete every image row of a room. Returns the count of deleted rows.
    pub async fn delete_for_room<'e, E>(executor: E, room_id: DbId) -> Result<u64, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM room_images WHERE room_id = $1")
            .bind(room_id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }
}
