#![allow(dead_code)]

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tempfile::TempDir;
use tower::ServiceExt;

use staydesk_api::auth::jwt::issue_access_token;
use staydesk_api::auth::password::hash_password;
use staydesk_api::config::{JwtConfig, ServerConfig, StorageConfig};
use staydesk_api::notify::{CredentialNotifier, IssuedCredentials, NotifyError};
use staydesk_api::router::build_app_router;
use staydesk_api::state::AppState;
use staydesk_core::blob::{BlobError, BlobStore, LocalBlobStore};
use staydesk_db::models::user::{NewUser, User};
use staydesk_db::repositories::{RoleRepo, UserRepo};
use staydesk_db::schema::SchemaDescriptor;

pub const PUBLIC_URL: &str = "http://localhost:3000/storage";
pub const TEST_PASSWORD: &str = "secret-pass-123";

/// Smallest byte strings the type sniffer accepts.
pub const PNG: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR\0\0\0\x01\0\0\0\x01";
pub const JPEG: &[u8] = b"\xFF\xD8\xFF\xE0\0\x10JFIF\0\x01\x01\0\0\x01";

const BOUNDARY: &str = "X-STAYDESK-TEST";

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

pub fn test_jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "test-secret-for-integration-tests".to_string(),
        access_token_expiry_mins: 15,
        refresh_token_expiry_days: 7,
    }
}

/// Build a test `ServerConfig` with safe defaults and a storage root under `dir`.
pub fn test_config(dir: &Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        max_upload_bytes: 32 * 1024 * 1024,
        storage: StorageConfig {
            root: dir.join("public").to_string_lossy().into_owned(),
            public_url: PUBLIC_URL.to_string(),
        },
        jwt: test_jwt_config(),
        bootstrap_admin: None,
    }
}

/// Records every delivery so tests can assert on it.
#[derive(Default)]
pub struct RecordingNotifier {
    pub sent: Mutex<Vec<IssuedCredentials>>,
}

#[async_trait]
impl CredentialNotifier for RecordingNotifier {
    async fn send_credentials(&self, credentials: &IssuedCredentials) -> Result<(), NotifyError> {
        self.sent.lock().unwrap().push(credentials.clone());
        Ok(())
    }
}

/// Local blob store whose writes can be made to fail after a set number of
/// successful puts.
pub struct FaultyBlobStore {
    inner: LocalBlobStore,
    puts_left: AtomicUsize,
}

impl FaultyBlobStore {
    fn new(inner: LocalBlobStore) -> Self {
        Self {
            inner,
            puts_left: AtomicUsize::new(usize::MAX),
        }
    }

    /// Allow `n` more successful puts, then fail every following one.
    pub fn fail_puts_after(&self, n: usize) {
        self.puts_left.store(n, Ordering::SeqCst);
    }
}

#[async_trait]
impl BlobStore for FaultyBlobStore {
    async fn put(&self, dir: &str, ext: &str, data: &[u8]) -> Result<String, BlobError> {
        let allowed = self
            .puts_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if !allowed {
            return Err(BlobError::Io(std::io::Error::other("disk full")));
        }
        self.inner.put(dir, ext, data).await
    }

    async fn delete(&self, path: &str) -> Result<bool, BlobError> {
        self.inner.delete(path).await
    }

    fn url_for(&self, path: &str) -> String {
        self.inner.url_for(path)
    }
}

/// The full application router plus the handles tests inspect.
///
/// The room schema is resolved from the live database, so a test that alters
/// the rooms tables must do so before calling [`TestApp::new`].
pub struct TestApp {
    pub router: Router,
    pub pool: PgPool,
    pub notifier: Arc<RecordingNotifier>,
    pub blobs: Arc<FaultyBlobStore>,
    storage: TempDir,
}

impl TestApp {
    pub async fn new(pool: PgPool) -> Self {
        let storage = tempfile::tempdir().unwrap();
        let config = test_config(storage.path());

        let room_schema = SchemaDescriptor::new(pool.clone())
            .resolve_room_schema()
            .await
            .unwrap();
        let blobs = Arc::new(FaultyBlobStore::new(
            LocalBlobStore::new(&config.storage.root, &config.storage.public_url)
                .await
                .unwrap(),
        ));
        let notifier = Arc::new(RecordingNotifier::default());

        let state = AppState {
            pool: pool.clone(),
            config: Arc::new(config.clone()),
            blobs: blobs.clone(),
            room_schema,
            notifier: notifier.clone(),
        };

        Self {
            router: build_app_router(state, &config),
            pool,
            notifier,
            blobs,
            storage,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    /// Absolute path of a stored blob.
    pub fn blob_path(&self, path: &str) -> std::path::PathBuf {
        self.storage.path().join("public").join(path)
    }

    pub fn blob_exists(&self, path: &str) -> bool {
        self.blob_path(path).is_file()
    }

    /// Number of files stored under `dir`.
    pub fn blob_count(&self, dir: &str) -> usize {
        std::fs::read_dir(self.blob_path(dir))
            .map(|entries| entries.filter_map(Result::ok).count())
            .unwrap_or(0)
    }
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

/// Insert a user with `role` and [`TEST_PASSWORD`].
pub async fn create_user(pool: &PgPool, email: &str, role: &str) -> User {
    let role_id = RoleRepo::id_for_name(pool, role).await.unwrap().unwrap();
    UserRepo::create(
        pool,
        &NewUser {
            name: format!("User {email}"),
            email: email.to_string(),
            phone: None,
            password_hash: hash_password(TEST_PASSWORD).unwrap(),
            role_id,
        },
    )
    .await
    .unwrap()
}

/// Insert a user with `role` and return a valid access token for them.
pub async fn token_for(pool: &PgPool, role: &str) -> String {
    let user = create_user(pool, &format!("{role}@staydesk.test"), role).await;
    issue_access_token(user.id, role, &test_jwt_config())
        .unwrap()
        .token
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

fn with_token(builder: axum::http::request::Builder, token: Option<&str>) -> axum::http::request::Builder {
    match token {
        Some(token) => builder.header(AUTHORIZATION, format!("Bearer {token}")),
        None => builder,
    }
}

pub fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    with_token(Request::builder().method(Method::GET).uri(uri), token)
        .body(Body::empty())
        .unwrap()
}

pub fn delete(uri: &str, token: Option<&str>) -> Request<Body> {
    with_token(Request::builder().method(Method::DELETE).uri(uri), token)
        .body(Body::empty())
        .unwrap()
}

pub fn json(method: Method, uri: &str, token: Option<&str>, body: serde_json::Value) -> Request<Body> {
    with_token(Request::builder().method(method).uri(uri), token)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Builder for `multipart/form-data` request bodies.
#[derive(Default)]
pub struct Multipart {
    body: Vec<u8>,
}

impl Multipart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, name: &str, file_name: &str, bytes: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; \
                 filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(bytes);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    pub fn request(mut self, method: Method, uri: &str, token: Option<&str>) -> Request<Body> {
        self.body
            .extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        with_token(Request::builder().method(method).uri(uri), token)
            .header(CONTENT_TYPE, format!("multipart/form-data; boundary={BOUNDARY}"))
            .body(Body::from(self.body))
            .unwrap()
    }
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
