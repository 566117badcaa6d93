//! Row structs and the input DTOs their repositories take.
//!
//! Content models pair a row struct with a create DTO and an all-`Option`
//! update DTO. Account models only have inserts.

pub mod home;
pub mod property;
pub mod room;
pub mod session;
pub mod user;
