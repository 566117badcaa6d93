//! Role lookups. Roles are seeded by migration and fixed at runtime.

use sqlx::PgPool;
use staydesk_core::types::DbId;

pub struct RoleRepo;

impl RoleRepo {
    /// Id of the role called exactly `name`.
    pub async fn id_for_name(pool: &PgPool, name: &str) -> Result<Option<DbId>, sqlx::Error> {
        sqlx::query_scalar("SELECT id FROM roles WHERE name = $1")
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    /// Role names in seed order.
    pub async fn names(pool: &PgPool) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar("SELECT name FROM roles ORDER BY id")
            .fetch_all(pool)
            .await
    }
}
