//! Domain building blocks shared by the db and api crates.
//!
//! Nothing in here talks to Postgres or HTTP. The blob store is the one
//! module that performs I/O, behind the [`blob::BlobStore`] trait.

pub mod blob;
pub mod error;
pub mod fields;
pub mod roles;
pub mod room;
pub mod room_schema;
pub mod types;
pub mod upload;
