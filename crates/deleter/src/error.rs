//! Deletion engine error types.

use reaper_clients::ClientError;
use reaper_core::{CacheKey, ItemIdentity};
use reaper_storage::StorageError;
use thiserror::Error;

/// Errors from the deletion engine.
///
/// A cache record that is already absent is not an error: eviction reports
/// it as `Ok(false)` so repeated evictions are no-ops.
#[derive(Debug, Error)]
pub enum DeleteError {
    /// The subject item itself is absent. Not swallowed: acting on caches
    /// of a nonexistent item is a caller mistake, not idempotence.
    #[error("item {0} not found")]
    ItemNotFound(ItemIdentity),

    /// A collaborator service call failed. Propagated immediately; retry
    /// policy is the caller's concern.
    #[error("{context}: {source}")]
    Upstream {
        context: String,
        #[source]
        source: ClientError,
    },

    /// Blob removal failed. Fatal: the metadata record is kept so the
    /// blob is not leaked behind a dangling reference.
    #[error("cannot remove blob {path}: {source}")]
    BlobDelete {
        path: String,
        #[source]
        source: StorageError,
    },

    /// A cache record claims local storage but carries no storage
    /// descriptor to resolve the physical path.
    #[error("malformed cache record {0}: local path without storage descriptor")]
    MalformedRecord(CacheKey),
}

impl DeleteError {
    pub(crate) fn upstream(context: impl Into<String>, source: ClientError) -> Self {
        Self::Upstream {
            context: context.into(),
            source,
        }
    }
}

/// Result type for deletion operations.
pub type DeleteResult<T> = std::result::Result<T, DeleteError>;
