//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods.
//! Most accept `&PgPool`; the room repositories accept any executor so the
//! room aggregate can compose them inside one transaction.

pub mod home_about_repo;
pub mod home_section_repo;
pub mod property_repo;
pub mod role_repo;
pub mod room_image_repo;
pub mod room_repo;
pub mod session_repo;
pub mod user_repo;

pub use home_about_repo::HomeAboutRepo;
pub use home_section_repo::HomeSectionRepo;
pub use property_repo::PropertyRepo;
pub use role_repo::RoleRepo;
pub use room_image_repo::RoomImageRepo;
pub use room_repo::RoomRepo;
pub use session_repo::SessionRepo;
pub use user_repo::UserRepo;
