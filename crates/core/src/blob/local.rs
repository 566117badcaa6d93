use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

use super::{check_relative_path, BlobError, BlobStore};

/// Filesystem-backed blob store serving files from a public base URL.
///
/// A blob at `rooms/abc.png` lives at `{root}/rooms/abc.png` and is served
/// as `{public_url}/rooms/abc.png`.
pub struct LocalBlobStore {
    root: PathBuf,
    public_url: String,
}

impl LocalBlobStore {
    /// Create the store, creating `root` if it does not exist.
    pub async fn new(root: impl Into<PathBuf>, public_url: &str) -> Result<Self, BlobError> {
        let root = root.into();
        fs::create_dir_all(&root).await?;
        Ok(Self {
            root,
            public_url: public_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn full_path(&self, path: &str) -> Result<PathBuf, BlobError> {
        check_relative_path(path)?;
        Ok(self.root.join(path))
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn put(&self, dir: &str, ext: &str, data: &[u8]) -> Result<String, BlobError> {
        let dir = dir.trim_matches('/');
        let name = format!("{}.{ext}", uuid::Uuid::new_v4());
        let path = if dir.is_empty() {
            name
        } else {
            format!("{dir}/{name}")
        };
        let full = self.full_path(&path)?;

        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).await?;
        }
        if let Err(e) = fs::write(&full, data).await {
            let _ = fs::remove_file(&full).await;
            return Err(e.into());
        }

        tracing::debug!(path = %path, bytes = data.len(), "Stored blob");
        Ok(path)
    }

    async fn delete(&self, path: &str) -> Result<bool, BlobError> {
        let full = self.full_path(path)?;
        match fs::remove_file(&full).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.public_url, path.trim_start_matches('/'))
    }
}
