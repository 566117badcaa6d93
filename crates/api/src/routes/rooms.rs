//! Route definitions for rooms.

use axum::routing::get;
use axum::Router;

use crate::handlers::room;
use crate::state::AppState;

/// Routes mounted at `/rooms`.
///
/// ```text
/// GET    /        -> list (public)
/// ```
pub fn public_router() -> Router<AppState> {
    Router::new().route("/", get(room::list))
}

/// Routes mounted at `/admin/rooms`.
///
/// ```text
/// GET    /        -> admin_list
/// POST   /        -> create
/// GET    /{id}    -> get_by_id
/// PUT    /{id}    -> update
/// PATCH  /{id}    -> update
/// DELETE /{id}    -> delete
/// ```
pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/", get(room::admin_list).post(room::create))
        .route(
            "/{id}",
            get(room::get_by_id)
                .put(room::update)
                .patch(room::update)
                .delete(room::delete),
        )
}
