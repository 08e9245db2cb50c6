//! In-memory blob store.

use async_trait::async_trait;
use bytes::Bytes;
use reaper_storage::{BlobStore, StorageError, StorageResult};
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// In-memory blob store tracking paths only, with removal failure
/// injection for blob/metadata precedence tests.
#[derive(Default)]
pub struct MemoryBlobStore {
    paths: Mutex<BTreeSet<String>>,
    fail_removes: AtomicBool,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent remove fail with an I/O error.
    pub fn set_fail_removes(&self, fail: bool) {
        self.fail_removes.store(fail, Ordering::SeqCst);
    }

    pub fn blob_count(&self) -> usize {
        self.paths.lock().unwrap().len()
    }

    pub fn paths(&self) -> Vec<String> {
        self.paths.lock().unwrap().iter().cloned().collect()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn remove(&self, path: &str) -> StorageResult<()> {
        if self.fail_removes.load(Ordering::SeqCst) {
            return Err(StorageError::Io(std::io::Error::other(
                "injected removal failure",
            )));
        }
        if !self.paths.lock().unwrap().remove(path) {
            return Err(StorageError::NotFound(path.to_string()));
        }
        Ok(())
    }

    async fn put(&self, path: &str, _data: Bytes) -> StorageResult<()> {
        self.paths.lock().unwrap().insert(path.to_string());
        Ok(())
    }

    async fn exists(&self, path: &str) -> StorageResult<bool> {
        Ok(self.paths.lock().unwrap().contains(path))
    }
}
