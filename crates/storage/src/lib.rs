//! Blob storage abstraction and backends for reaper.
//!
//! This crate provides:
//! - A path-addressed `BlobStore` trait
//! - A local filesystem backend with traversal protection
//! - A virtual store routing over named storage roots, matching the
//!   file-base prefixes carried in cache metadata

pub mod backends;
pub mod error;
pub mod traits;
pub mod vfs;

pub use backends::filesystem::FilesystemBackend;
pub use error::{StorageError, StorageResult};
pub use traits::BlobStore;
pub use vfs::VirtualStore;

use reaper_core::config::StorageConfig;
use std::sync::Arc;

/// Create a virtual blob store from configuration, one filesystem backend
/// per named root.
pub async fn from_config(config: &StorageConfig) -> StorageResult<Arc<VirtualStore>> {
    config
        .validate()
        .map_err(|e| StorageError::Config(e.to_string()))?;

    let mut store = VirtualStore::new();
    for (name, path) in &config.roots {
        let backend = FilesystemBackend::new(path).await?;
        store.insert_root(name.clone(), Arc::new(backend));
    }
    Ok(Arc::new(store))
}
