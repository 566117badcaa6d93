//! Room image-set management.
//!
//! - [`aggregate::RoomAggregate`] -- create, read, replace and tear down rooms
//!   together with their images.
//! - [`view::RoomView`] -- the serialized shape, with image URLs resolved.

pub mod aggregate;
pub mod view;

pub use aggregate::RoomAggregate;
pub use view::{RoomImageView, RoomView};
