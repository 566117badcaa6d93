//! Route definitions for homepage content.

use axum::routing::get;
use axum::Router;

use crate::handlers::{home_about, home_section, room};
use crate::state::AppState;

/// Routes mounted at `/home`.
///
/// ```text
/// GET /rooms          -> room::list
/// GET /section-one    -> home_section::show_public
/// GET /about          -> home_about::show_public
/// ```
pub fn public_router() -> Router<AppState> {
    Router::new()
        .route("/rooms", get(room::list))
        .route("/section-one", get(home_section::show_public))
        .route("/about", get(home_about::show_public))
}

/// Routes mounted at `/admin/home`.
///
/// ```text
/// GET    /section-one            -> list
/// POST   /section-one            -> create
/// GET    /section-one/current    -> current
/// GET    /section-one/{id}       -> get_by_id
/// PUT    /section-one/{id}       -> update
/// PATCH  /section-one/{id}       -> update
/// DELETE /section-one/{id}       -> delete
///
/// GET    /about                  -> list
/// POST   /about                  -> create
/// GET    /about/{id}             -> get_by_id
/// PUT    /about/{id}             -> update
/// PATCH  /about/{id}             -> update
/// DELETE /about/{id}             -> delete
/// ```
pub fn admin_router() -> Router<AppState> {
    let section_routes = Router::new()
        .route("/", get(home_section::list).post(home_section::create))
        .route("/current", get(home_section::current))
        .route(
            "/{id}",
            get(home_section::get_by_id)
                .put(home_section::update)
                .patch(home_section::update)
                .delete(home_section::delete),
        );

    let about_routes = Router::new()
        .route("/", get(home_about::list).post(home_about::create))
        .route(
            "/{id}",
            get(home_about::get_by_id)
                .put(home_about::update)
                .patch(home_about::update)
                .delete(home_about::delete),
        );

    Router::new()
        .nest("/section-one", section_routes)
        .nest("/about", about_routes)
}
