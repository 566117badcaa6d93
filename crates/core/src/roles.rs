//! Well-known role name constants.
//!
//! These must match the seed data in `20260221000001_create_users_and_roles.sql`.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_MANAGER: &str = "manager";
pub const ROLE_WAITERS: &str = "waiters";

/// Role assigned to newly registered users when none is requested.
pub const DEFAULT_ROLE: &str = ROLE_WAITERS;

/// Roles allowed to browse the user directory.
pub const USER_DIRECTORY_ROLES: &[&str] = &[ROLE_ADMIN, ROLE_MANAGER];
