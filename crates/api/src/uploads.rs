//! Single-image fields (property logo, hero image) and best-effort blob removal.

use staydesk_core::blob::{is_absolute_url, BlobStore};
use staydesk_core::fields::{self, FieldErrors};
use staydesk_core::upload::{check_image, ImageKind};

use crate::error::AppResult;
use crate::form::{FilePart, FormData};

/// An image that passed the type and size rules, borrowed from the form.
pub struct AcceptedImage<'f> {
    pub kind: ImageKind,
    pub bytes: &'f [u8],
}

impl AcceptedImage<'_> {
    /// Write the image under `dir`, returning its blob path.
    pub async fn store(&self, blobs: &dyn BlobStore, dir: &str) -> AppResult<String> {
        Ok(blobs.put(dir, self.kind.extension(), self.bytes).await?)
    }
}

/// Validate the file under `key`, if one was sent. A non-file value under
/// `key` is rejected.
pub fn accept_image<'f>(
    form: &'f FormData,
    key: &str,
    max_kib: usize,
    errors: &mut FieldErrors,
) -> Option<AcceptedImage<'f>> {
    let file = match form.file_parts(key)?.first()? {
        FilePart::File(file) => file,
        FilePart::NotAFile => {
            errors.add(key, fields::not_image(key));
            return None;
        }
    };
    match check_image(file.file_name.as_deref(), &file.bytes, max_kib) {
        Ok(kind) => Some(AcceptedImage {
            kind,
            bytes: &file.bytes,
        }),
        Err(rejection) => {
            errors.add(key, rejection.message(key));
            None
        }
    }
}

/// Delete a stored blob, logging instead of failing.
///
/// External URLs left by older data are skipped.
pub async fn discard_blob(blobs: &dyn BlobStore, path: &str) {
    if is_absolute_url(path) {
        return;
    }
    match blobs.delete(path).await {
        Ok(true) => tracing::debug!(path, "Deleted blob"),
        Ok(false) => tracing::debug!(path, "Blob already absent"),
        Err(e) => tracing::warn!(path, error = %e, "Failed to delete blob"),
    }
}
