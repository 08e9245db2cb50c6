//! Wire models of the database-of-record service.

use reaper_core::ItemIdentity;
use serde::{Deserialize, Serialize};

/// Item metadata as returned by the record store.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ItemRecord {
    pub collection: String,
    pub signature: String,
    /// Media type of the item, e.g. "image" or "video". Selects the
    /// parameter schema together with the action name.
    pub media_type: String,
}

/// Where a cached artifact lives: a named storage root and its file-base
/// prefix. Present only for locally stored artifacts.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StorageDescriptor {
    pub name: String,
    /// Prefix composed with the record's relative path to form the
    /// physical blob path.
    pub filebase: String,
}

/// A cache record: one derived artifact of an item.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CacheRecord {
    pub action: String,
    /// Canonical parameter string of the record.
    pub params: String,
    /// Storage-relative path, or an absolute URL when the artifact is
    /// externally owned.
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage: Option<StorageDescriptor>,
}

/// One page of a child-item listing.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ItemPage {
    pub items: Vec<ItemIdentity>,
    /// Next page number; absent on the terminal page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page: Option<u32>,
}

/// One page of a cache-record listing.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CachePage {
    pub caches: Vec<CacheRecord>,
    /// Next page number; absent on the terminal page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page: Option<u32>,
}
