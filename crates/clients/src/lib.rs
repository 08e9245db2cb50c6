//! Clients for the reaper collaborator services.
//!
//! The deletion engine talks to two remote collaborators, exposed here as
//! capability traits with HTTP/JSON adapters:
//! - [`RecordStore`] — the authoritative metadata database (item and cache
//!   lookup, paginated listings, record deletion)
//! - [`ActionCatalog`] — the action-parameter service (ordered parameter
//!   schemas per media type and action)

pub mod actions;
pub mod error;
pub mod http;
pub mod models;
pub mod records;

pub use actions::{ActionCatalog, HttpActionCatalog};
pub use error::{ClientError, ClientResult};
pub use models::{CachePage, CacheRecord, ItemPage, ItemRecord, StorageDescriptor};
pub use records::{HttpRecordStore, RecordStore};
