//! Repository for the `properties` table.

use sqlx::{PgPool, Postgres, QueryBuilder};
use staydesk_core::types::DbId;

use crate::models::property::{CreateProperty, Property, PropertyFilter, UpdateProperty};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, property_name, property_type, star_rating, logo, contact_person, \
                       phone, email, country, city, address, onboarding_stage, ota_status, \
                       seo_status, services, notes, created_at, updated_at";

/// Stage filter value meaning "no filter".
pub const STAGE_ALL: &str = "All";

/// Provides CRUD operations for properties.
pub struct PropertyRepo;

impl PropertyRepo {
    /// Insert a new property, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateProperty) -> Result<Property, sqlx::Error> {
        let query = format!(
            "INSERT INTO properties
                (property_name, property_type, star_rating, logo, contact_person, phone, email,
                 country, city, address, onboarding_stage, ota_status, seo_status, services, notes)
             VALUES ($1, COALESCE($2, 'Hotel'), $3, $4, $5, $6, $7,
                     COALESCE($8, 'Rwanda'), $9, $10, COALESCE($11, 'Draft'),
                     COALESCE($12, 'Not Started'), COALESCE($13, 'Not Started'), $14, $15)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Property>(&query)
            .bind(&input.property_name)
            .bind(&input.property_type)
            .bind(&input.star_rating)
            .bind(&input.logo)
            .bind(&input.contact_person)
            .bind(&input.phone)
            .bind(&input.email)
            .bind(&input.country)
            .bind(&input.city)
            .bind(&input.address)
            .bind(&input.onboarding_stage)
            .bind(&input.ota_status)
            .bind(&input.seo_status)
            .bind(&input.services)
            .bind(&input.notes)
            .fetch_one(pool)
            .await
    }

    /// Find a property by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Property>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM properties WHERE id = $1");
        sqlx::query_as::<_, Property>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Whether a property with this ID exists.
    pub async fn exists(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let row: (bool,) = sqlx::query_as("SELECT EXISTS (SELECT 1 FROM properties WHERE id = $1)")
            .bind(id)
            .fetch_one(pool)
            .await?;
        Ok(row.0)
    }

    /// List properties newest first, optionally filtered.
    pub async fn list(pool: &PgPool, filter: &PropertyFilter) -> Result<Vec<Property>, sqlx::Error> {
        let mut qb = QueryBuilder::<Postgres>::new(format!("SELECT {COLUMNS} FROM properties WHERE TRUE"));

        if let Some(search) = filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            let pattern = format!("%{}%", escape_like(search));
            qb.push(" AND (property_name ILIKE ");
            qb.push_bind(pattern.clone());
            qb.push(" OR city ILIKE ");
            qb.push_bind(pattern.clone());
            qb.push(" OR contact_person ILIKE ");
            qb.push_bind(pattern.clone());
            qb.push(" OR email ILIKE ");
            qb.push_bind(pattern);
            qb.push(")");
        }

        if let Some(stage) = filter
            .stage
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty() && *s != STAGE_ALL)
        {
            qb.push(" AND onboarding_stage = ");
            qb.push_bind(stage.to_string());
        }

        qb.push(" ORDER BY created_at DESC, id DESC");
        qb.build_query_as::<Property>().fetch_all(pool).await
    }

    /// Apply the present fields of `input`.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProperty,
    ) -> Result<Option<Property>, sqlx::Error> {
        let mut qb = QueryBuilder::<Postgres>::new("UPDATE properties SET updated_at = NOW()");

        fn set<'a, T>(qb: &mut QueryBuilder<'a, Postgres>, column: &str, value: T)
        where
            T: 'a + sqlx::Encode<'a, Postgres> + sqlx::Type<Postgres> + Send,
        {
            qb.push(format!(", {column} = "));
            qb.push_bind(value);
        }

        if let Some(v) = &input.property_name {
            set(&mut qb, "property_name", v.clone());
        }
        if let Some(v) = &input.property_type {
            set(&mut qb, "property_type", v.clone());
        }
        if let Some(v) = &input.star_rating {
            set(&mut qb, "star_rating", v.clone());
        }
        if let Some(v) = &input.logo {
            set(&mut qb, "logo", v.clone());
        }
        if let Some(v) = &input.contact_person {
            set(&mut qb, "contact_person", v.clone());
        }
        if let Some(v) = &input.phone {
            set(&mut qb, "phone", v.clone());
        }
        if let Some(v) = &input.email {
            set(&mut qb, "email", v.clone());
        }
        if let Some(v) = &input.country {
            set(&mut qb, "country", v.clone());
        }
        if let Some(v) = &input.city {
            set(&mut qb, "city", v.clone());
        }
        if let Some(v) = &input.address {
            set(&mut qb, "address", v.clone());
        }
        if let Some(v) = &input.onboarding_stage {
            set(&mut qb, "onboarding_stage", v.clone());
        }
        if let Some(v) = &input.ota_status {
            set(&mut qb, "ota_status", v.clone());
        }
        if let Some(v) = &input.seo_status {
            set(&mut qb, "seo_status", v.clone());
        }
        if let Some(v) = &input.services {
            set(&mut qb, "services", v.clone());
        }
        if let Some(v) = &input.notes {
            set(&mut qb, "notes", v.clone());
        }

        qb.push(" WHERE id = ");
        qb.push_bind(id);
        qb.push(format!(" RETURNING {COLUMNS}"));
        qb.build_query_as::<Property>().fetch_optional(pool).await
    }

    /// Delete a property. Rooms attached to it become unattached.
    ///
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM properties WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// Escape `%`, `_` and `\` so user input matches literally inside ILIKE.
fn escape_like(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
