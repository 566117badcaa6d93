//! Blob storage for uploaded images.
//!
//! Blobs are addressed by a relative path such as `rooms/<uuid>.png`. The
//! relational store only ever records these paths; public URLs are derived
//! on read through [`BlobStore::url_for`] (see [`resolve_url`]).

mod local;

pub use local::LocalBlobStore;

use async_trait::async_trait;

/// Errors raised by a [`BlobStore`].
#[derive(Debug, thiserror::Error)]
pub enum BlobError {
    #[error("storage IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid blob path '{0}'")]
    InvalidPath(String),
}

/// Path-addressed blob storage with public URL generation.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store `data` under `dir` with a fresh unique name ending in `.{ext}`.
    ///
    /// Returns the relative path of the stored blob. Paths are never reused.
    async fn put(&self, dir: &str, ext: &str, data: &[u8]) -> Result<String, BlobError>;

    /// Delete a blob.
    ///
    /// Returns `true` if the blob was deleted, `false` if it did not exist.
    async fn delete(&self, path: &str) -> Result<bool, BlobError>;

    /// Public URL for a stored path.
    fn url_for(&self, path: &str) -> String;
}

/// Whether a stored path is already an absolute URL.
pub fn is_absolute_url(path: &str) -> bool {
    let lower = path.get(..8).unwrap_or(path).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Public URL for a stored path; absolute URLs pass through unchanged.
pub fn resolve_url(store: &dyn BlobStore, path: &str) -> String {
    if is_absolute_url(path) {
        path.to_string()
    } else {
        store.url_for(path)
    }
}

/// Reject paths that could escape the storage root.
pub(crate) fn check_relative_path(path: &str) -> Result<(), BlobError> {
    let escapes = path.is_empty()
        || path.starts_with('/')
        || path.starts_with('\\')
        || path.contains('\0')
        || path.split(['/', '\\']).any(|seg| seg == "..");
    if escapes {
        return Err(BlobError::InvalidPath(path.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_absolute_urls() {
        assert!(is_absolute_url("http://cdn.example.com/a.png"));
        assert!(is_absolute_url("HTTPS://cdn.example.com/a.png"));
        assert!(!is_absolute_url("rooms/a.png"));
        assert!(!is_absolute_url("ftp://host/a.png"));
        assert!(!is_absolute_url("http"));
    }

    #[test]
    fn relative_path_checks() {
        assert!(check_relative_path("rooms/a.png").is_ok());
        assert!(check_relative_path("home/section1/a.webp").is_ok());
        assert!(check_relative_path("").is_err());
        assert!(check_relative_path("/etc/passwd").is_err());
        assert!(check_relative_path("rooms/../../secret").is_err());
        assert!(check_relative_path("..\\secret").is_err());
    }
}
