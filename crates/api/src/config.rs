/// Default request body limit for upload routes: three 10 MiB images plus form overhead.
const DEFAULT_MAX_UPLOAD_BYTES: usize = 32 * 1024 * 1024;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Request body limit in bytes for every route (default: 32 MiB).
    pub max_upload_bytes: usize,
    /// Where uploaded blobs live and how they are addressed publicly.
    pub storage: StorageConfig,
    /// JWT token configuration (secret, expiry durations).
    pub jwt: JwtConfig,
    /// Optional first administrator, created at startup if missing.
    pub bootstrap_admin: Option<BootstrapAdmin>,
}

/// Signing secret and token lifetimes for staff sessions.
#[derive(Clone)]
pub struct JwtConfig {
    pub secret: String,
    /// Bearer token lifetime in minutes (default: `60`).
    pub access_token_expiry_mins: i64,
    /// Refresh token lifetime in days (default: `7`).
    pub refresh_token_expiry_days: i64,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("access_token_expiry_mins", &self.access_token_expiry_mins)
            .field("refresh_token_expiry_days", &self.refresh_token_expiry_days)
            .finish_non_exhaustive()
    }
}

/// Local blob storage settings.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Filesystem directory holding blobs, also served at `/storage`.
    pub root: String,
    /// Public URL prefix that maps onto `root`.
    pub public_url: String,
}

/// Credentials for the administrator seeded on an empty deployment.
#[derive(Clone)]
pub struct BootstrapAdmin {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for BootstrapAdmin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BootstrapAdmin")
            .field("name", &self.name)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                                         |
    /// |------------------------|-------------------------------------------------|
    /// | `HOST`                 | `0.0.0.0`                                       |
    /// | `PORT`                 | `3000`                                          |
    /// | `CORS_ORIGINS`         | `http://localhost:5173,http://127.0.0.1:5173`   |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                                            |
    /// | `MAX_UPLOAD_BYTES`     | `33554432`                                      |
    /// | `STORAGE_ROOT`         | `storage/public`                                |
    /// | `STORAGE_PUBLIC_URL`   | `http://localhost:3000/storage`                 |
    /// | `ADMIN_EMAIL`          | unset (no bootstrap admin)                      |
    /// | `ADMIN_PASSWORD`       | required when `ADMIN_EMAIL` is set              |
    /// | `ADMIN_NAME`           | `System Admin`                                  |
    /// | `JWT_SECRET`           | required, non-empty                             |
    /// | `JWT_ACCESS_EXPIRY_MINS` | `60`                                          |
    /// | `JWT_REFRESH_EXPIRY_DAYS` | `7`                                          |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173,http://127.0.0.1:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let max_upload_bytes: usize = std::env::var("MAX_UPLOAD_BYTES")
            .unwrap_or_else(|_| DEFAULT_MAX_UPLOAD_BYTES.to_string())
            .parse()
            .expect("MAX_UPLOAD_BYTES must be a valid usize");

        let storage = StorageConfig {
            root: std::env::var("STORAGE_ROOT").unwrap_or_else(|_| "storage/public".into()),
            public_url: std::env::var("STORAGE_PUBLIC_URL")
                .unwrap_or_else(|_| "http://localhost:3000/storage".into()),
        };

        let bootstrap_admin = std::env::var("ADMIN_EMAIL")
            .ok()
            .filter(|e| !e.trim().is_empty())
            .map(|email| BootstrapAdmin {
                name: std::env::var("ADMIN_NAME").unwrap_or_else(|_| "System Admin".into()),
                email: email.trim().to_string(),
                password: std::env::var("ADMIN_PASSWORD")
                    .expect("ADMIN_PASSWORD must be set when ADMIN_EMAIL is set"),
            });

        let secret = std::env::var("JWT_SECRET").expect("JWT_SECRET must be set");
        assert!(!secret.trim().is_empty(), "JWT_SECRET must not be empty");
        let jwt = JwtConfig {
            secret,
            access_token_expiry_mins: std::env::var("JWT_ACCESS_EXPIRY_MINS")
                .unwrap_or_else(|_| "60".into())
                .parse()
                .expect("JWT_ACCESS_EXPIRY_MINS must be a valid i64"),
            refresh_token_expiry_days: std::env::var("JWT_REFRESH_EXPIRY_DAYS")
                .unwrap_or_else(|_| "7".into())
                .parse()
                .expect("JWT_REFRESH_EXPIRY_DAYS must be a valid i64"),
        };

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            max_upload_bytes,
            storage,
            jwt,
            bootstrap_admin,
        }
    }
}
