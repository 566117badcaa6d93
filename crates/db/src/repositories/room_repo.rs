//! Repository for the `rooms` table.
//!
//! Every statement is assembled from the resolved [`RoomSchema`]: reads alias
//! whichever physical columns exist onto the canonical [`Room`] shape, and
//! writes touch only columns the schema says are present. Methods accept any
//! executor so the room aggregate can run them inside its transaction.

use sqlx::{PgExecutor, Postgres, QueryBuilder};
use staydesk_core::room_schema::RoomSchema;
use staydesk_core::types::DbId;

use crate::models::room::{CreateRoom, Room, UpdateRoom};

/// Select list normalising the live columns onto [`Room`].
fn select_list(schema: &RoomSchema) -> String {
    let property_id = if schema.property_id {
        "property_id::BIGINT"
    } else {
        "NULL::BIGINT"
    };
    let is_active = if schema.is_active {
        "COALESCE(is_active, TRUE)"
    } else {
        "TRUE"
    };
    let sort_order = if schema.sort_order {
        "COALESCE(sort_order, 0)::INTEGER"
    } else {
        "0::INTEGER"
    };
    format!(
        "id, {property_id} AS property_id, \
         COALESCE({name}::TEXT, '') AS name, \
         COALESCE({description}::TEXT, '') AS description, \
         {is_active} AS is_active, {sort_order} AS sort_order, \
         created_at, updated_at",
        name = schema.name.as_str(),
        description = schema.description.as_str(),
    )
}

/// Listing order: `sort_order` ascending when the column exists, newest first after that.
fn order_by(schema: &RoomSchema) -> &'static str {
    if schema.sort_order {
        "sort_order ASC, id DESC"
    } else {
        "id DESC"
    }
}

/// Provides schema-aware CRUD operations for rooms.
pub struct RoomRepo;

impl RoomRepo {
    /// List every room.
    pub async fn list<'e, E>(executor: E, schema: &RoomSchema) -> Result<Vec<Room>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "SELECT {} FROM rooms ORDER BY {}",
            select_list(schema),
            order_by(schema)
        );
        sqlx::query_as::<_, Room>(&query).fetch_all(executor).await
    }

    /// List rooms attached to a property. Empty when the schema has no
    /// `property_id` column.
    pub async fn list_for_property<'e, E>(
        executor: E,
        schema: &RoomSchema,
        property_id: DbId,
    ) -> Result<Vec<Room>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        if !schema.property_id {
            return Ok(Vec::new());
        }
        let query = format!(
            "SELECT {} FROM rooms WHERE property_id = $1 ORDER BY {}",
            select_list(schema),
            order_by(schema)
        );
        sqlx::query_as::<_, Room>(&query)
            .bind(property_id)
            .fetch_all(executor)
            .await
    }

    /// Find a room by ID.
    pub async fn find_by_id<'e, E>(
        executor: E,
        schema: &RoomSchema,
        id: DbId,
    ) -> Result<Option<Room>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!("SELECT {} FROM rooms WHERE id = $1", select_list(schema));
        sqlx::query_as::<_, Room>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Take a row lock on a room for the rest of the enclosing transaction.
    ///
    /// Returns `false` if the room does not exist.
    pub async fn lock_by_id<'e, E>(executor: E, id: DbId) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let row: Option<(DbId,)> = sqlx::query_as("SELECT id FROM rooms WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(row.is_some())
    }

    /// Insert a room, returning the created row.
    pub async fn create<'e, E>(
        executor: E,
        schema: &RoomSchema,
        input: &CreateRoom,
    ) -> Result<Room, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let mut columns = vec![schema.name.as_str(), schema.description.as_str()];
        if schema.property_id {
            columns.push("property_id");
        }
        if schema.is_active {
            columns.push("is_active");
        }
        if schema.sort_order {
            columns.push("sort_order");
        }

        let mut qb = QueryBuilder::<Postgres>::new(format!(
            "INSERT INTO rooms ({}) VALUES (",
            columns.join(", ")
        ));
        {
            let mut values = qb.separated(", ");
            values.push_bind(input.name.clone());
            values.push_bind(input.description.clone());
            if schema.property_id {
                values.push_bind(input.property_id);
            }
            if schema.is_active {
                values.push_bind(input.is_active);
            }
            if schema.sort_order {
                values.push_bind(input.sort_order);
            }
        }
        qb.push(format!(") RETURNING {}", select_list(schema)));

        qb.build_query_as::<Room>().fetch_one(executor).await
    }

    /// Apply the present fields of `input` that the schema can store.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update<'e, E>(
        executor: E,
        schema: &RoomSchema,
        id: DbId,
        input: &UpdateRoom,
    ) -> Result<Option<Room>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let mut qb = QueryBuilder::<Postgres>::new("UPDATE rooms SET ");
        let mut touched = false;
        {
            let mut sets = qb.separated(", ");
            if let Some(name) = &input.name {
                sets.push(format!("{} = ", schema.name.as_str()));
                sets.push_bind_unseparated(name.clone());
                touched = true;
            }
            if let Some(description) = &input.description {
                sets.push(format!("{} = ", schema.description.as_str()));
                sets.push_bind_unseparated(description.clone());
                touched = true;
            }
            if let (true, Some(property_id)) = (schema.property_id, input.property_id) {
                sets.push("property_id = ");
                sets.push_bind_unseparated(property_id);
                touched = true;
            }
            if let (true, Some(is_active)) = (schema.is_active, input.is_active) {
                sets.push("is_active = ");
                sets.push_bind_unseparated(is_active);
                touched = true;
            }
            if let (true, Some(sort_order)) = (schema.sort_order, input.sort_order) {
                sets.push("sort_order = ");
                sets.push_bind_unseparated(sort_order);
                touched = true;
            }
            if touched {
                sets.push("updated_at = NOW()");
            }
        }

        if !touched {
            return Self::find_by_id(executor, schema, id).await;
        }

        qb.push(" WHERE id = ");
        qb.push_bind(id);
        qb.push(format!(" RETURNING {}", select_list(schema)));

        qb.build_query_as::<Room>().fetch_optional(executor).await
    }

    /// Delete a room row. Returns `true` if a row was removed.
    pub async fn delete<'e, E>(executor: E, id: DbId) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM rooms WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
