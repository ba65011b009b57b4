//! services/api/src/adapters/blob.rs
//!
//! Filesystem implementation of the `BlobStore` port. Uploaded source files
//! live flat under one uploads root and are served back by path under
//! `/uploads`.

use async_trait::async_trait;
use court_summarizer_core::ports::{BlobStore, CoreError, CoreResult};
use std::path::PathBuf;
use tokio::fs;
use tracing::debug;

/// The public URL prefix stored files are served from.
pub const PUBLIC_PREFIX: &str = "/uploads";

/// A blob store backed by a local directory.
pub struct FsBlobStore {
    root: PathBuf,
}

impl FsBlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Creates the uploads directory if it does not exist yet. Called once at
    /// startup so later writes can assume the root is present.
    pub async fn ensure_root(&self) -> std::io::Result<()> {
        fs::create_dir_all(&self.root).await
    }

    /// Resolves a storage name inside the root, rejecting anything that could
    /// escape it. Names are generated sanitized, so a separator here means a
    /// caller bypassed the ingestion path.
    fn disk_path(&self, name: &str) -> CoreResult<PathBuf> {
        if name.is_empty() || name == ".." || name.contains('/') || name.contains('\\') {
            return Err(CoreError::Storage(format!(
                "refusing unsafe storage name '{name}'"
            )));
        }
        Ok(self.root.join(name))
    }
}

/// The final component of a stored `/uploads/<name>` path.
fn file_name_of(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

#[async_trait]
impl BlobStore for FsBlobStore {
    async fn write(&self, name: &str, data: &[u8]) -> CoreResult<String> {
        let path = self.disk_path(name)?;
        fs::write(&path, data)
            .await
            .map_err(|e| CoreError::Storage(format!("write {}: {e}", path.display())))?;
        debug!(name, size = data.len(), "blob store: wrote upload");
        Ok(format!("{PUBLIC_PREFIX}/{name}"))
    }

    async fn delete(&self, blob_path: &str) -> CoreResult<()> {
        let path = self.disk_path(file_name_of(blob_path))?;
        match fs::remove_file(&path).await {
            Ok(()) => {
                debug!(blob_path, "blob store: removed upload");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(CoreError::NotFound(
                format!("no stored file at {blob_path}"),
            )),
            Err(e) => Err(CoreError::Storage(format!(
                "remove {}: {e}",
                path.display()
            ))),
        }
    }
}

impl std::fmt::Debug for FsBlobStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FsBlobStore")
            .field("root", &self.root)
            .finish()
    }
}
