//! Liveness of the service and of what it depends on.

use axum::extract::State;
use axum::http::StatusCode;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthReport {
    /// `"ok"` when every dependency answers, `"degraded"` otherwise.
    pub status: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
    /// The blob storage root exists and is a directory.
    pub storage_ready: bool,
}

/// GET /health
///
/// Answers 200 when healthy and 503 when degraded, with the same body.
async fn report(State(state): State<AppState>) -> (StatusCode, Json<HealthReport>) {
    let db_healthy = match staydesk_db::health_check(&state.pool).await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Database unreachable from health check");
            false
        }
    };
    let storage_ready = tokio::fs::metadata(&state.config.storage.root)
        .await
        .is_ok_and(|meta| meta.is_dir());
    if !storage_ready {
        tracing::warn!(root = %state.config.storage.root, "Blob storage root missing");
    }

    let healthy = db_healthy && storage_ready;
    let status = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (
        status,
        Json(HealthReport {
            status: if healthy { "ok" } else { "degraded" },
            version: env!("CARGO_PKG_VERSION"),
            db_healthy,
            storage_ready,
        }),
    )
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(report))
}
