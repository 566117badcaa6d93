//! Conventions every migration follows, checked against the migrated
//! catalog rather than the SQL text.

use std::collections::BTreeMap;

use sqlx::{FromRow, PgPool};

#[derive(Debug, FromRow)]
struct Column {
    table_name: String,
    column_name: String,
    data_type: String,
}

/// Columns of every application table in `public`.
async fn app_columns(pool: &PgPool) -> Vec<Column> {
    sqlx::query_as(
        "SELECT c.table_name::TEXT, c.column_name::TEXT, c.data_type::TEXT
         FROM information_schema.columns c
         JOIN information_schema.tables t
           ON t.table_schema = c.table_schema AND t.table_name = c.table_name
         WHERE c.table_schema = 'public'
           AND t.table_type = 'BASE TABLE'
           AND c.table_name <> '_sqlx_migrations'
         ORDER BY c.table_name, c.ordinal_position",
    )
    .fetch_all(pool)
    .await
    .unwrap()
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_ids_are_bigint(pool: PgPool) {
    let ids: Vec<_> = app_columns(&pool)
        .await
        .into_iter()
        .filter(|c| c.column_name == "id")
        .collect();

    assert!(ids.len() >= 8, "expected every table to have an id: {ids:?}");
    for c in &ids {
        assert_eq!(c.data_type, "bigint", "{}.id", c.table_name);
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_tables_carry_timestamptz_audit_columns(pool: PgPool) {
    let mut by_table: BTreeMap<String, BTreeMap<String, String>> = BTreeMap::new();
    for c in app_columns(&pool).await {
        by_table
            .entry(c.table_name)
            .or_default()
            .insert(c.column_name, c.data_type);
    }

    for (table, columns) in &by_table {
        for audit in ["created_at", "updated_at"] {
            assert_eq!(
                columns.get(audit).map(String::as_str),
                Some("timestamp with time zone"),
                "{table}.{audit}"
            );
        }
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_strings_are_text(pool: PgPool) {
    let varchar: Vec<String> = app_columns(&pool)
        .await
        .into_iter()
        .filter(|c| c.data_type == "character varying")
        .map(|c| format!("{}.{}", c.table_name, c.column_name))
        .collect();

    assert!(varchar.is_empty(), "VARCHAR columns: {varchar:?}");
}

/// Each single-column foreign key leads some index on its table.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_foreign_keys_are_indexed(pool: PgPool) {
    let unindexed: Vec<(String, String)> = sqlx::query_as(
        "SELECT con.conrelid::regclass::TEXT, att.attname::TEXT
         FROM pg_constraint con
         JOIN pg_attribute att
           ON att.attrelid = con.conrelid AND att.attnum = con.conkey[1]
         WHERE con.contype = 'f'
           AND con.connamespace = 'public'::regnamespace
           AND NOT EXISTS (
               SELECT 1 FROM pg_index idx
               WHERE idx.indrelid = con.conrelid
                 AND idx.indkey[0] = con.conkey[1]
           )
         ORDER BY 1, 2",
    )
    .fetch_all(&pool)
    .await
    .unwrap();

    assert!(unindexed.is_empty(), "unindexed foreign keys: {unindexed:?}");
}

/// Rooms survive the deletion of their property; images do not survive their room.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_room_fk_delete_rules(pool: PgPool) {
    let rules: Vec<(String, String)> = sqlx::query_as(
        "SELECT tc.table_name::TEXT, rc.delete_rule::TEXT
         FROM information_schema.referential_constraints rc
         JOIN information_schema.table_constraints tc
             ON rc.constraint_name = tc.constraint_name
             AND rc.constraint_schema = tc.table_schema
         WHERE rc.constraint_schema = 'public'
           AND tc.table_name IN ('rooms', 'room_images')
         ORDER BY 1",
    )
    .fetch_all(&pool)
    .await
    .unwrap();

    assert_eq!(
        rules,
        vec![
            ("room_images".to_string(), "CASCADE".to_string()),
            ("rooms".to_string(), "SET NULL".to_string()),
        ]
    );
}

/// Seeded roles match the constants in `staydesk_core::roles`.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_roles_are_seeded(pool: PgPool) {
    staydesk_db::health_check(&pool).await.unwrap();

    let names = staydesk_db::repositories::RoleRepo::names(&pool).await.unwrap();
    assert_eq!(
        names,
        [
            staydesk_core::roles::ROLE_ADMIN,
            staydesk_core::roles::ROLE_MANAGER,
            staydesk_core::roles::ROLE_WAITERS,
        ]
    );
}
