//! `/auth`: sessions and staff registration. Only `login` and `refresh` are
//! reachable without a bearer token; the handlers enforce the rest.

use axum::routing::post;
use axum::Router;

use crate::handlers::auth::{login, logout, refresh, register};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/refresh", post(refresh))
        .route("/logout", post(logout))
        .route("/register", post(register))
}
