//! Core domain types and shared logic for the reaper media deletion service.
//!
//! This crate defines the canonical data model used across all other crates:
//! - Item identities and cache keys
//! - Action parameter canonicalization
//! - Pagination primitives for remote listings
//! - Configuration types

pub mod config;
pub mod error;
pub mod identity;
pub mod page;
pub mod params;

pub use config::{AppConfig, ServerConfig, StorageConfig, UpstreamConfig};
pub use error::{Error, Result};
pub use identity::{ActionSignature, CacheKey, DeletionTally, ItemIdentity};
pub use page::PageRequest;
pub use params::canonicalize;

/// Reserved action name for an item's primary representation cache.
pub const PRIMARY_ACTION: &str = "item";

/// Page size used when listing child items during tree deletion.
pub const ITEM_PAGE_SIZE: u32 = 100;

/// Page size used when listing cache records of an item.
pub const CACHE_PAGE_SIZE: u32 = 100;
