//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- the principal behind a JWT Bearer token.
//! - [`rbac::RequireAdmin`] -- requires the `admin` role.
//! - [`rbac::RequireManager`] -- requires `manager` or `admin`.
//! - [`rbac::RequireAuth`] -- requires any valid principal.

pub mod auth;
pub mod rbac;
