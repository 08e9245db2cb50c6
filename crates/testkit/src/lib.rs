//! In-memory collaborator implementations for reaper tests.
//!
//! Provides [`MemoryRecordStore`], [`MemoryActionCatalog`] and
//! [`MemoryBlobStore`]: deterministic stand-ins for the database-of-record
//! service, the action-parameter service and the blob store, with seeding
//! helpers, failure injection and call counting.

pub mod actions;
pub mod blobs;
pub mod records;

pub use actions::MemoryActionCatalog;
pub use blobs::MemoryBlobStore;
pub use records::{external_cache_record, local_cache_record, MemoryRecordStore};
