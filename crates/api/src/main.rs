use std::net::SocketAddr;
use std::sync::Arc;

use staydesk_core::blob::LocalBlobStore;
use staydesk_db::schema::SchemaDescriptor;
use staydesk_db::DbPool;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use staydesk_api::bootstrap::ensure_admin;
use staydesk_api::config::ServerConfig;
use staydesk_api::notify::LogNotifier;
use staydesk_api::router::build_app_router;
use staydesk_api::state::AppState;

const DEFAULT_LOG_FILTER: &str = "staydesk_api=debug,staydesk_db=info,tower_http=debug";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = Arc::new(ServerConfig::from_env());
    tracing::info!(host = %config.host, port = config.port, "Configuration loaded");

    let pool = open_database().await;
    if let Some(admin) = &config.bootstrap_admin {
        ensure_admin(&pool, admin)
            .await
            .expect("Failed to create bootstrap admin");
    }

    let state = assemble_state(pool, Arc::clone(&config)).await;
    let ip = config.host.parse().expect("HOST must be an IP address");
    let addr = SocketAddr::new(ip, config.port);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .unwrap_or_else(|e| panic!("Failed to bind {addr}: {e}"));
    tracing::info!(%addr, "Listening");

    axum::serve(listener, build_app_router(state, &config))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Server stopped");
}

/// `RUST_LOG` wins over the built-in filter.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Connect, verify and migrate. Any failure aborts startup.
async fn open_database() -> DbPool {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = staydesk_db::create_pool(&url)
        .await
        .expect("Failed to connect to database");
    staydesk_db::health_check(&pool)
        .await
        .expect("Database is not answering");
    staydesk_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database ready");
    pool
}

/// Resolve the room schema against the live database and prepare blob
/// storage, then bundle everything handlers share.
async fn assemble_state(pool: DbPool, config: Arc<ServerConfig>) -> AppState {
    let room_schema = SchemaDescriptor::new(pool.clone())
        .resolve_room_schema()
        .await
        .expect("Failed to resolve room schema");
    tracing::info!(?room_schema, "Room schema resolved");

    let blobs = LocalBlobStore::new(&config.storage.root, &config.storage.public_url)
        .await
        .expect("Failed to prepare blob storage root");
    tracing::info!(root = %config.storage.root, "Blob storage ready");

    AppState {
        pool,
        config,
        blobs: Arc::new(blobs),
        room_schema,
        notifier: Arc::new(LogNotifier),
    }
}

/// Resolves on SIGINT, or SIGTERM on unix.
async fn shutdown_signal() {
    let interrupt = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Cannot listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Cannot listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = interrupt => tracing::info!("Interrupted, draining connections"),
        () = terminate => tracing::info!("Terminated, draining connections"),
    }
}
