//! Room input rules.
//!
//! A room carries a bounded, ordered set of photographs. Creation requires
//! between one and [`MAX_ROOM_IMAGES`] files; an update that mentions the
//! `images` field replaces the whole set with zero to [`MAX_ROOM_IMAGES`]
//! files, and an update that omits it leaves the set untouched.

use crate::fields::{self, FieldErrors};
use crate::types::DbId;
use crate::upload::{check_image, ImageKind, UploadRejection, ROOM_IMAGE_MAX_KIB};

/// Upper bound on the number of images a room may hold.
pub const MAX_ROOM_IMAGES: usize = 3;

/// Blob store directory for room photographs.
pub const ROOM_IMAGE_DIR: &str = "rooms";

/// Maximum length of a room name, in characters.
pub const ROOM_NAME_MAX_CHARS: usize = 255;

pub const TOO_MANY_IMAGES: &str = "One room can have maximum 3 images.";
pub const IMAGE_TOO_LARGE: &str = "Each image must not be greater than 10MB.";

/// Whether a write creates a room or patches an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    Create,
    Update,
}

/// Scalar room fields as submitted. `None` means the field was absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoomFields {
    pub name: Option<String>,
    pub description: Option<String>,
    /// `Some(None)` clears the association.
    pub property_id: Option<Option<DbId>>,
    pub is_active: Option<bool>,
    pub sort_order: Option<i32>,
}

/// Shape checks on the scalar fields. Property existence is checked by the
/// caller, which owns the database handle.
pub fn check_room_fields(input: &RoomFields, mode: WriteMode, errors: &mut FieldErrors) {
    match mode {
        WriteMode::Create => {
            fields::check_required(errors, "name", input.name.as_deref());
            fields::check_required(errors, "description", input.description.as_deref());
        }
        WriteMode::Update => {
            // Present fields may not be blanked.
            if input.name.is_some() {
                fields::check_required(errors, "name", input.name.as_deref());
            }
            if input.description.is_some() {
                fields::check_required(errors, "description", input.description.as_deref());
            }
        }
    }

    fields::check_max_chars(errors, "name", input.name.as_deref(), ROOM_NAME_MAX_CHARS);

    if input.sort_order.is_some_and(|v| v < 0) {
        errors.add("sort_order", fields::at_least("sort_order", 0));
    }
}

/// Cardinality rule for the submitted image set.
///
/// `present` is whether the request mentioned `images` at all.
pub fn check_image_count(count: usize, present: bool, mode: WriteMode, errors: &mut FieldErrors) {
    if mode == WriteMode::Create && (!present || count == 0) {
        errors.add("images", fields::required("images"));
    }
    if count > MAX_ROOM_IMAGES {
        errors.add("images", TOO_MANY_IMAGES);
    }
}

/// Check one room image at position `index` of the submitted set.
pub fn check_room_image(
    index: usize,
    file_name: Option<&str>,
    bytes: &[u8],
    errors: &mut FieldErrors,
) -> Option<ImageKind> {
    match check_image(file_name, bytes, ROOM_IMAGE_MAX_KIB) {
        Ok(kind) => Some(kind),
        Err(UploadRejection::TooLarge { .. }) => {
            errors.add(format!("images.{index}"), IMAGE_TOO_LARGE);
            None
        }
        Err(rejection) => {
            errors.add(
                format!("images.{index}"),
                rejection.message(&format!("images.{index}")),
            );
            None
        }
    }
}
