pub mod auth;
pub mod home_about;
pub mod home_section;
pub mod property;
pub mod room;
pub mod user_admin;
