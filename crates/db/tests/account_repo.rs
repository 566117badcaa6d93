use chrono::{Duration, Utc};
use sqlx::PgPool;
use staydesk_core::roles::{ROLE_MANAGER, ROLE_WAITERS};
use staydesk_db::models::session::NewSession;
use staydesk_db::models::user::{NewUser, User};
use staydesk_db::repositories::{RoleRepo, SessionRepo, UserRepo};

async fn insert_user(pool: &PgPool, email: &str, phone: Option<&str>, role: &str) -> User {
    let role_id = RoleRepo::id_for_name(pool, role).await.unwrap().unwrap();
    UserRepo::create(
        pool,
        &NewUser {
            name: "Aline Uwase".to_string(),
            email: email.to_string(),
            phone: phone.map(str::to_string),
            password_hash: "$argon2id$placeholder".to_string(),
            role_id,
        },
    )
    .await
    .unwrap()
}

fn session_for(user: &User, hash: &str, ttl: Duration) -> NewSession {
    NewSession {
        user_id: user.id,
        refresh_token_hash: hash.to_string(),
        expires_at: Utc::now() + ttl,
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_users_carry_their_role_name(pool: PgPool) {
    let created = insert_user(&pool, "aline@staydesk.test", None, ROLE_MANAGER).await;
    assert_eq!(created.role, ROLE_MANAGER);

    let found = UserRepo::find_by_email(&pool, "ALINE@staydesk.test")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.id, created.id);
    assert_eq!(found.role, ROLE_MANAGER);
    assert!(UserRepo::email_taken(&pool, "Aline@Staydesk.Test").await.unwrap());
    assert!(RoleRepo::id_for_name(&pool, "Manager").await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_phone_lookup_ignores_stored_whitespace(pool: PgPool) {
    let user = insert_user(&pool, "desk@staydesk.test", Some("0788 123 456"), ROLE_WAITERS).await;

    let found = UserRepo::find_by_phone(&pool, "0788123456").await.unwrap();
    assert_eq!(found.map(|u| u.id), Some(user.id));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_latest_is_newest_first(pool: PgPool) {
    let first = insert_user(&pool, "first@staydesk.test", None, ROLE_WAITERS).await;
    let second = insert_user(&pool, "second@staydesk.test", None, ROLE_WAITERS).await;

    let ids: Vec<_> = UserRepo::list_latest(&pool, 10)
        .await
        .unwrap()
        .into_iter()
        .map(|u| u.id)
        .collect();
    assert_eq!(ids, vec![second.id, first.id]);

    assert_eq!(UserRepo::list_latest(&pool, 1).await.unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_session_is_consumed_once(pool: PgPool) {
    let user = insert_user(&pool, "once@staydesk.test", None, ROLE_WAITERS).await;
    let opened = SessionRepo::open(&pool, &session_for(&user, "hash-a", Duration::days(7)))
        .await
        .unwrap();

    let spent = SessionRepo::consume(&pool, "hash-a").await.unwrap().unwrap();
    assert_eq!(spent.id, opened.id);
    assert_eq!(spent.user_id, user.id);

    assert!(SessionRepo::consume(&pool, "hash-a").await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_expired_session_cannot_be_consumed(pool: PgPool) {
    let user = insert_user(&pool, "late@staydesk.test", None, ROLE_WAITERS).await;
    SessionRepo::open(&pool, &session_for(&user, "hash-old", Duration::minutes(-1)))
        .await
        .unwrap();

    assert!(SessionRepo::consume(&pool, "hash-old").await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_revoke_all_counts_only_live_sessions(pool: PgPool) {
    let user = insert_user(&pool, "all@staydesk.test", None, ROLE_WAITERS).await;
    for hash in ["h1", "h2", "h3"] {
        SessionRepo::open(&pool, &session_for(&user, hash, Duration::days(1)))
            .await
            .unwrap();
    }
    SessionRepo::consume(&pool, "h1").await.unwrap();

    assert_eq!(SessionRepo::revoke_all_for_user(&pool, user.id).await.unwrap(), 2);
    assert!(SessionRepo::consume(&pool, "h2").await.unwrap().is_none());
}
