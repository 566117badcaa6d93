//! Repository for the `home_abouts` table.

use sqlx::{PgPool, Postgres, QueryBuilder};
use staydesk_core::types::DbId;

use crate::models::home::{CreateHomeAbout, HomeAbout, UpdateHomeAbout};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, title, description, mission_title, mission_text, vision_title, \
                       vision_text, is_active, created_at, updated_at";

/// Provides CRUD operations for about blocks.
pub struct HomeAboutRepo;

impl HomeAboutRepo {
    pub async fn create(pool: &PgPool, input: &CreateHomeAbout) -> Result<HomeAbout, sqlx::Error> {
        let query = format!(
            "INSERT INTO home_abouts
                (title, description, mission_title, mission_text, vision_title, vision_text, is_active)
             VALUES ($1, $2, COALESCE($3, 'Our Mission'), $4, COALESCE($5, 'Our Vision'), $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, HomeAbout>(&query)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.mission_title)
            .bind(&input.mission_text)
            .bind(&input.vision_title)
            .bind(&input.vision_text)
            .bind(input.is_active)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<HomeAbout>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM home_abouts WHERE id = $1");
        sqlx::query_as::<_, HomeAbout>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// All rows, newest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<HomeAbout>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM home_abouts ORDER BY id DESC");
        sqlx::query_as::<_, HomeAbout>(&query).fetch_all(pool).await
    }

    /// The most recent active row, as shown on the public homepage.
    pub async fn find_latest_active(pool: &PgPool) -> Result<Option<HomeAbout>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM home_abouts
             WHERE is_active = true
             ORDER BY id DESC LIMIT 1"
        );
        sqlx::query_as::<_, HomeAbout>(&query)
            .fetch_optional(pool)
            .await
    }

    /// Apply the present fields of `input`.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateHomeAbout,
    ) -> Result<Option<HomeAbout>, sqlx::Error> {
        let mut qb = QueryBuilder::<Postgres>::new("UPDATE home_abouts SET updated_at = NOW()");
        if let Some(v) = &input.title {
            qb.push(", title = ");
            qb.push_bind(v.clone());
        }
        if let Some(v) = &input.description {
            qb.push(", description = ");
            qb.push_bind(v.clone());
        }
        if let Some(v) = &input.mission_title {
            qb.push(", mission_title = ");
            qb.push_bind(v.clone());
        }
        if let Some(v) = &input.mission_text {
            qb.push(", mission_text = ");
            qb.push_bind(v.clone());
        }
        if let Some(v) = &input.vision_title {
            qb.push(", vision_title = ");
            qb.push_bind(v.clone());
        }
        if let Some(v) = &input.vision_text {
            qb.push(", vision_text = ");
            qb.push_bind(v.clone());
        }
        if let Some(v) = input.is_active {
            qb.push(", is_active = ");
            qb.push_bind(v);
        }
        qb.push(" WHERE id = ");
        qb.push_bind(id);
        qb.push(format!(" RETURNING {COLUMNS}"));
        qb.build_query_as::<HomeAbout>().fetch_optional(pool).await
    }

    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM home_abouts WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
