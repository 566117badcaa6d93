pub mod auth;
pub mod health;
pub mod home;
pub mod properties;
pub mod rooms;
pub mod users;

use axum::routing::get;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /rooms                                  public room listing
/// /home/rooms                             public room listing (homepage alias)
/// /home/section-one                       active hero (public)
/// /home/about                             active about block (public)
///
/// /auth/login                             login (public)
/// /auth/refresh                           refresh (public)
/// /auth/logout                            logout (requires auth)
/// /auth/register                          register staff (admin only)
/// /me                                     current profile (requires auth)
///
/// /admin/rooms                            list, create
/// /admin/rooms/{id}                       get, update, delete
/// /admin/properties                       list, create
/// /admin/properties/{id}                  get, update, delete
/// /admin/properties/{id}/rooms            rooms of one property
/// /admin/home/section-one                 list, create
/// /admin/home/section-one/current         latest (created on demand)
/// /admin/home/section-one/{id}            get, update, delete
/// /admin/home/about                       list, create
/// /admin/home/about/{id}                  get, update, delete
/// /admin/users                            latest users (admin or manager)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Public content.
        .nest("/rooms", rooms::public_router())
        .nest("/home", home::public_router())
        // Authentication.
        .nest("/auth", auth::router())
        .route("/me", get(handlers::auth::me))
        // Back office.
        .nest("/admin/rooms", rooms::admin_router())
        .nest("/admin/properties", properties::router())
        .nest("/admin/home", home::admin_router())
        .nest("/admin/users", users::router())
}
