//! Repository for the `home_section_ones` table (homepage hero).

use sqlx::{PgPool, Postgres, QueryBuilder};
use staydesk_core::types::DbId;

use crate::models::home::{CreateHomeSection, HomeSection, UpdateHomeSection};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, title, subtitle, image, is_active, created_at, updated_at";

/// Provides CRUD operations for hero sections.
pub struct HomeSectionRepo;

impl HomeSectionRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreateHomeSection,
    ) -> Result<HomeSection, sqlx::Error> {
        let query = format!(
            "INSERT INTO home_section_ones (title, subtitle, image, is_active)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, HomeSection>(&query)
            .bind(&input.title)
            .bind(&input.subtitle)
            .bind(&input.image)
            .bind(input.is_active)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<HomeSection>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM home_section_ones WHERE id = $1");
        sqlx::query_as::<_, HomeSection>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// All rows, newest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<HomeSection>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM home_section_ones ORDER BY id DESC");
        sqlx::query_as::<_, HomeSection>(&query)
            .fetch_all(pool)
            .await
    }

    /// The most recent row regardless of status.
    pub async fn find_latest(pool: &PgPool) -> Result<Option<HomeSection>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM home_section_ones ORDER BY id DESC LIMIT 1");
        sqlx::query_as::<_, HomeSection>(&query)
            .fetch_optional(pool)
            .await
    }

    /// The most recent active row, as shown on the public homepage.
    pub async fn find_latest_active(pool: &PgPool) -> Result<Option<HomeSection>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM home_section_ones
             WHERE is_active = true
             ORDER BY id DESC LIMIT 1"
        );
        sqlx::query_as::<_, HomeSection>(&query)
            .fetch_optional(pool)
            .await
    }

    /// Apply the present fields of `input`.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateHomeSection,
    ) -> Result<Option<HomeSection>, sqlx::Error> {
        let mut qb = QueryBuilder::<Postgres>::new("UPDATE home_section_ones SET updated_at = NOW()");
        if let Some(title) = &input.title {
            qb.push(", title = ");
            qb.push_bind(title.clone());
        }
        if let Some(subtitle) = &input.subtitle {
            qb.push(", subtitle = ");
            qb.push_bind(subtitle.clone());
        }
        if let Some(image) = &input.image {
            qb.push(", image = ");
            qb.push_bind(image.clone());
        }
        if let Some(is_active) = input.is_active {
            qb.push(", is_active = ");
            qb.push_bind(is_active);
        }
        qb.push(" WHERE id = ");
        qb.push_bind(id);
        qb.push(format!(" RETURNING {COLUMNS}"));
        qb.build_query_as::<HomeSection>().fetch_optional(pool).await
    }

    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM home_section_ones WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
