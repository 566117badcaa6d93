//! Staydesk API server library.
//!
//! Exposes the building blocks (config, state, error handling, routes, the
//! room aggregate) so integration tests and the binary entrypoint can both
//! access them.

pub mod auth;
pub mod bootstrap;
pub mod config;
pub mod error;
pub mod form;
pub mod handlers;
pub mod middleware;
pub mod notify;
pub mod query;
pub mod response;
pub mod rooms;
pub mod router;
pub mod routes;
pub mod rules;
pub mod state;
pub mod uploads;
