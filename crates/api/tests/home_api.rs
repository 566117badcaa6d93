//! HTTP-level integration tests for homepage content.

mod common;

use axum::http::{Method, StatusCode};
use common::{body_json, delete, get, json, token_for, Multipart, TestApp, JPEG, PNG};
use serde_json::{json, Value};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Hero section
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_public_hero_is_null_until_created(pool: PgPool) {
    let app = TestApp::new(pool).await;

    let response = app.send(get("/api/v1/home/section-one", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"], Value::Null);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_hero_create_update_delete(pool: PgPool) {
    let token = token_for(&pool, "admin").await;
    let app = TestApp::new(pool).await;

    let response = app
        .send(
            Multipart::new()
                .text("title", "Stay by the lake")
                .text("subtitle", "Book direct")
                .file("image", "hero.jpg", JPEG)
                .request(Method::POST, "/api/v1/admin/home/section-one", Some(&token)),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Home Section One created.");
    let id = body["data"]["id"].as_i64().unwrap();
    let image = body["data"]["image"].as_str().unwrap().to_string();
    assert!(image.starts_with("home/section1/"));
    assert!(body["data"]["image_url"].as_str().unwrap().ends_with(&image));

    let response = app.send(get("/api/v1/home/section-one", None)).await;
    let body = body_json(response).await;
    assert_eq!(body["data"]["title"], "Stay by the lake");

    // Replace the image; the old blob goes.
    let response = app
        .send(
            Multipart::new()
                .file("image", "hero2.png", PNG)
                .request(
                    Method::PATCH,
                    &format!("/api/v1/admin/home/section-one/{id}"),
                    Some(&token),
                ),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Home Section One updated.");
    assert_eq!(body["data"]["title"], "Stay by the lake");
    let second = body["data"]["image"].as_str().unwrap().to_string();
    assert!(!app.blob_exists(&image));
    assert!(app.blob_exists(&second));

    // Deactivated sections are not public.
    let response = app
        .send(json(
            Method::PUT,
            &format!("/api/v1/admin/home/section-one/{id}"),
            Some(&token),
            json!({ "is_active": false, "subtitle": null }),
        ))
        .await;
    let body = body_json(response).await;
    assert_eq!(body["data"]["is_active"], false);
    assert_eq!(body["data"]["subtitle"], Value::Null);

    let response = app.send(get("/api/v1/home/section-one", None)).await;
    assert_eq!(body_json(response).await["data"], Value::Null);

    let response = app
        .send(delete(&format!("/api/v1/admin/home/section-one/{id}"), Some(&token)))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["message"], "Deleted.");
    assert!(!app.blob_exists(&second));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_current_hero_is_created_on_demand(pool: PgPool) {
    let token = token_for(&pool, "manager").await;
    let app = TestApp::new(pool.clone()).await;

    let response = app
        .send(get("/api/v1/admin/home/section-one/current", Some(&token)))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let first = body_json(response).await["data"].clone();
    assert_eq!(first["title"], "");
    assert_eq!(first["is_active"], true);
    assert_eq!(first["image"], Value::Null);

    let response = app
        .send(get("/api/v1/admin/home/section-one/current", Some(&token)))
        .await;
    let second = body_json(response).await["data"].clone();
    assert_eq!(second["id"], first["id"]);

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM home_section_ones")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_hero_requires_title(pool: PgPool) {
    let token = token_for(&pool, "admin").await;
    let app = TestApp::new(pool).await;

    let response = app
        .send(json(
            Method::POST,
            "/api/v1/admin/home/section-one",
            Some(&token),
            json!({ "subtitle": "No title" }),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert_eq!(body["message"], "The title field is required.");
}

// ---------------------------------------------------------------------------
// About block
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_about_defaults_and_public_read(pool: PgPool) {
    let token = token_for(&pool, "admin").await;
    let app = TestApp::new(pool).await;

    let response = app
        .send(json(
            Method::POST,
            "/api/v1/admin/home/about",
            Some(&token),
            json!({ "title": "About us", "description": "Family run since 1998" }),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Home About created.");
    assert_eq!(body["data"]["mission_title"], "Our Mission");
    assert_eq!(body["data"]["vision_title"], "Our Vision");
    let id = body["data"]["id"].as_i64().unwrap();

    let response = app
        .send(json(
            Method::PATCH,
            &format!("/api/v1/admin/home/about/{id}"),
            Some(&token),
            json!({ "mission_text": "Rest well", "description": "" }),
        ))
        .await;
    let body = body_json(response).await;
    assert_eq!(body["message"], "Home About updated.");
    assert_eq!(body["data"]["mission_text"], "Rest well");
    assert_eq!(body["data"]["description"], Value::Null);
    assert_eq!(body["data"]["title"], "About us");

    let response = app.send(get("/api/v1/home/about", None)).await;
    assert_eq!(body_json(response).await["data"]["id"], id);

    let response = app
        .send(delete(&format!("/api/v1/admin/home/about/{id}"), Some(&token)))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .send(get(&format!("/api/v1/admin/home/about/{id}"), Some(&token)))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_admin_home_routes_require_a_token(pool: PgPool) {
    let app = TestApp::new(pool).await;
    for uri in ["/api/v1/admin/home/about", "/api/v1/admin/home/section-one"] {
        let response = app.send(get(uri, None)).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
