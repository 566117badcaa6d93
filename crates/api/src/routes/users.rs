//! Route definitions for the `/admin/users` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::user_admin;
use crate::state::AppState;

/// Routes mounted at `/admin/users`.
///
/// ```text
/// GET /   -> list (?limit=, admin or manager)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(user_admin::list))
}
