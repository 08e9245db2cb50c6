//! Local filesystem storage backend.

use crate::error::{StorageError, StorageResult};
use crate::traits::BlobStore;
use async_trait::async_trait;
use bytes::Bytes;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Local filesystem blob store rooted at a directory.
pub struct FilesystemBackend {
    root: PathBuf,
}

impl FilesystemBackend {
    /// Create a new filesystem backend, creating the root if necessary.
    pub async fn new(root: impl AsRef<Path>) -> StorageResult<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root).await?;
        Ok(Self { root })
    }

    /// Resolve a storage path below the root, rejecting traversal.
    ///
    /// Returns an error if the path would escape the storage root: absolute
    /// paths, `..` segments, and non-normal components are all refused.
    fn resolve(&self, path: &str) -> StorageResult<PathBuf> {
        if path.is_empty() {
            return Err(StorageError::InvalidPath("empty path".to_string()));
        }
        if path.starts_with('/') || path.starts_with('\\') {
            return Err(StorageError::InvalidPath(format!(
                "absolute path not allowed: {path}"
            )));
        }
        for component in Path::new(path).components() {
            match component {
                std::path::Component::Normal(_) => {}
                _ => {
                    return Err(StorageError::InvalidPath(format!(
                        "contains unsafe path component: {path}"
                    )));
                }
            }
        }
        Ok(self.root.join(path))
    }

    /// Remove directories left empty after a blob removal, up to the root.
    ///
    /// Cached artifacts live in nested per-item directories; without this
    /// the tree fills with empty husks. Failure here is not an error: a
    /// sibling may have appeared concurrently.
    async fn prune_empty_parents(&self, full: &Path) {
        let mut dir = full.parent();
        while let Some(parent) = dir {
            if parent == self.root {
                break;
            }
            if fs::remove_dir(parent).await.is_err() {
                break;
            }
            dir = parent.parent();
        }
    }
}

#[async_trait]
impl BlobStore for FilesystemBackend {
    async fn remove(&self, path: &str) -> StorageResult<()> {
        let full = self.resolve(path)?;
        match fs::remove_file(&full).await {
            Ok(()) => {
                tracing::debug!(path = %path, "removed blob");
                self.prune_empty_parents(&full).await;
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(path.to_string()))
            }
            Err(e) => Err(StorageError::Io(e)),
        }
    }

    async fn put(&self, path: &str, data: Bytes) -> StorageResult<()> {
        let full = self.resolve(path)?;
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).await?;
        }
        let mut file = fs::File::create(&full).await?;
        file.write_all(&data).await?;
        file.flush().await?;
        Ok(())
    }

    async fn exists(&self, path: &str) -> StorageResult<bool> {
        let full = self.resolve(path)?;
        Ok(fs::try_exists(&full).await?)
    }
}
