//! Virtual multi-root blob store.
//!
//! Cache metadata addresses artifacts by a file-base prefix naming one of
//! several storage roots, followed by a root-relative path. `VirtualStore`
//! routes each operation to the backend registered for the named root.

use crate::error::{StorageError, StorageResult};
use crate::traits::BlobStore;
use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use std::sync::Arc;

/// A blob store dispatching over named storage roots.
#[derive(Default)]
pub struct VirtualStore {
    roots: HashMap<String, Arc<dyn BlobStore>>,
}

impl VirtualStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a backend under a root name.
    pub fn insert_root(&mut self, name: impl Into<String>, store: Arc<dyn BlobStore>) {
        self.roots.insert(name.into(), store);
    }

    /// Names of the configured roots.
    pub fn root_names(&self) -> impl Iterator<Item = &str> {
        self.roots.keys().map(String::as_str)
    }

    /// Split a `root/rest` path and look up the backend for `root`.
    fn route<'a>(&self, path: &'a str) -> StorageResult<(&Arc<dyn BlobStore>, &'a str)> {
        let (root, rest) = path
            .split_once('/')
            .ok_or_else(|| StorageError::InvalidPath(format!("path has no root prefix: {path}")))?;
        if rest.is_empty() {
            return Err(StorageError::InvalidPath(format!(
                "path names a root but no blob: {path}"
            )));
        }
        let store = self
            .roots
            .get(root)
            .ok_or_else(|| StorageError::UnknownRoot(root.to_string()))?;
        Ok((store, rest))
    }
}

#[async_trait]
impl BlobStore for VirtualStore {
    async fn remove(&self, path: &str) -> StorageResult<()> {
        let (store, rest) = self.route(path)?;
        store.remove(rest).await
    }

    async fn put(&self, path: &str, data: Bytes) -> StorageResult<()> {
        let (store, rest) = self.route(path)?;
        store.put(rest, data).await
    }

    async fn exists(&self, path: &str) -> StorageResult<bool> {
        let (store, rest) = self.route(path)?;
        store.exists(rest).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::filesystem::FilesystemBackend;
    use tempfile::tempdir;

    async fn store_with_root(name: &str) -> (tempfile::TempDir, VirtualStore) {
        let temp = tempdir().unwrap();
        let backend = FilesystemBackend::new(temp.path()).await.unwrap();
        let mut store = VirtualStore::new();
        store.insert_root(name, Arc::new(backend));
        (temp, store)
    }

    #[tokio::test]
    async fn routes_to_named_root() {
        let (temp, store) = store_with_root("media").await;

        store
            .put("media/art/sig1/thumb.jpg", Bytes::from_static(b"x"))
            .await
            .unwrap();
        assert!(temp.path().join("art/sig1/thumb.jpg").exists());

        store.remove("media/art/sig1/thumb.jpg").await.unwrap();
        assert!(!store.exists("media/art/sig1/thumb.jpg").await.unwrap());
    }

    #[tokio::test]
    async fn unknown_root_is_rejected() {
        let (_temp, store) = store_with_root("media").await;

        assert!(matches!(
            store.remove("elsewhere/x.jpg").await,
            Err(StorageError::UnknownRoot(_))
        ));
    }

    #[tokio::test]
    async fn rootless_path_is_rejected() {
        let (_temp, store) = store_with_root("media").await;

        assert!(matches!(
            store.remove("naked-file").await,
            Err(StorageError::InvalidPath(_))
        ));
        assert!(matches!(
            store.remove("media/").await,
            Err(StorageError::InvalidPath(_))
        ));
    }
}
