//! Route definitions for the `/admin/properties` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::{property, room};
use crate::state::AppState;

/// Routes mounted at `/admin/properties`.
///
/// ```text
/// GET    /              -> list (?search=&stage=)
/// POST   /              -> create
/// GET    /{id}          -> get_by_id
/// PUT    /{id}          -> update
/// PATCH  /{id}          -> update
/// DELETE /{id}          -> delete
/// GET    /{id}/rooms    -> room::list_for_property
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(property::list).post(property::create))
        .route(
            "/{id}",
            get(property::get_by_id)
                .put(property::update)
                .patch(property::update)
                .delete(property::delete),
        )
        .route("/{id}/rooms", get(room::list_for_property))
}
