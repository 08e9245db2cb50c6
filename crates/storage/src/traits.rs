//! Storage trait definitions.

use crate::error::StorageResult;
use async_trait::async_trait;
use bytes::Bytes;

/// Path-addressed blob storage.
///
/// The deletion engine only ever removes blobs; `put` and `exists` are for
/// the components that populate caches and for tests.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Remove the blob at `path`. Returns `NotFound` if it does not exist.
    async fn remove(&self, path: &str) -> StorageResult<()>;

    /// Write a blob at `path`, creating parent directories as needed.
    async fn put(&self, path: &str, data: Bytes) -> StorageResult<()>;

    /// Whether a blob exists at `path`.
    async fn exists(&self, path: &str) -> StorageResult<bool>;
}
