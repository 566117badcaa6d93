//! Authentication primitives.
//!
//! - [`password`] -- Argon2id hashing, verification and temporary password generation.
//! - [`jwt`] -- access-token issue/validation and refresh-token helpers.

pub mod jwt;
pub mod password;
