//! Image upload rules shared by room photos, property logos, and the hero image.
//!
//! A file is accepted only when both its client-supplied extension and its
//! sniffed content agree that it is a JPEG, PNG, or WebP image.

use image::ImageFormat;

// ---------------------------------------------------------------------------
// Limits
// ---------------------------------------------------------------------------

/// Per-file limit for room photographs (10 MiB).
pub const ROOM_IMAGE_MAX_KIB: usize = 10_240;

/// Limit for a property logo (2 MiB).
pub const PROPERTY_LOGO_MAX_KIB: usize = 2_048;

/// Limit for the homepage hero image (4 MiB).
pub const HERO_IMAGE_MAX_KIB: usize = 4_096;

/// Client file extensions accepted for any image upload.
pub const ALLOWED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp"];

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Image encodings the platform stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Jpeg,
    Png,
    Webp,
}

impl ImageKind {
    /// Extension used for the stored blob.
    pub fn extension(self) -> &'static str {
        match self {
            ImageKind::Jpeg => "jpg",
            ImageKind::Png => "png",
            ImageKind::Webp => "webp",
        }
    }
}

/// Why an upload was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadRejection {
    /// Extension or content is not one of the accepted image types.
    WrongType,
    /// File exceeds the limit in KiB.
    TooLarge { max_kib: usize },
}

impl UploadRejection {
    /// Form-validation style message for `attribute` (e.g. `logo`, `images.1`).
    pub fn message(self, attribute: &str) -> String {
        match self {
            UploadRejection::WrongType => format!(
                "The {attribute} must be a file of type: {}.",
                ALLOWED_EXTENSIONS.join(", ")
            ),
            UploadRejection::TooLarge { max_kib } => {
                format!("The {attribute} must not be greater than {max_kib} kilobytes.")
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Checks
// ---------------------------------------------------------------------------

/// Lower-cased extension of a client file name, if it has one.
pub fn extension_of(file_name: &str) -> Option<String> {
    let (_, ext) = file_name.rsplit_once('.')?;
    if ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// Identify the encoding from magic bytes.
pub fn sniff(bytes: &[u8]) -> Option<ImageKind> {
    match image::guess_format(bytes).ok()? {
        ImageFormat::Jpeg => Some(ImageKind::Jpeg),
        ImageFormat::Png => Some(ImageKind::Png),
        ImageFormat::WebP => Some(ImageKind::Webp),
        _ => None,
    }
}

/// Check one uploaded image against the type rules and a size limit.
///
/// Size is checked first so an oversized file of the wrong type reports the
/// size problem, matching how clients are told to shrink before retrying.
pub fn check_image(
    file_name: Option<&str>,
    bytes: &[u8],
    max_kib: usize,
) -> Result<ImageKind, UploadRejection> {
    if bytes.len() > max_kib * 1024 {
        return Err(UploadRejection::TooLarge { max_kib });
    }

    let ext_ok = file_name
        .and_then(extension_of)
        .is_some_and(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()));
    if !ext_ok {
        return Err(UploadRejection::WrongType);
    }

    sniff(bytes).ok_or(UploadRejection::WrongType)
}
