//! Item and cache identities.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::AddAssign;

/// Identity of a logical media item: collection name plus content signature.
///
/// Immutable once created; the deletion engine only ever reads it.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemIdentity {
    pub collection: String,
    pub signature: String,
}

impl ItemIdentity {
    pub fn new(collection: impl Into<String>, signature: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            signature: signature.into(),
        }
    }
}

impl fmt::Display for ItemIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.collection, self.signature)
    }
}

impl fmt::Debug for ItemIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ItemIdentity({self})")
    }
}

/// Key of the per-process parameter schema cache: one entry per
/// (media type, action) pair.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActionSignature {
    pub media_type: String,
    pub action: String,
}

impl ActionSignature {
    pub fn new(media_type: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            media_type: media_type.into(),
            action: action.into(),
        }
    }
}

impl fmt::Display for ActionSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.media_type, self.action)
    }
}

impl fmt::Debug for ActionSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ActionSignature({self})")
    }
}

/// Canonical key of one cached artifact.
///
/// `params` must already be canonical (see [`crate::params::canonicalize`]);
/// two records with the same key refer to the same artifact.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CacheKey {
    pub identity: ItemIdentity,
    pub action: String,
    pub params: String,
}

impl CacheKey {
    pub fn new(identity: ItemIdentity, action: impl Into<String>, params: impl Into<String>) -> Self {
        Self {
            identity,
            action: action.into(),
            params: params.into(),
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.identity, self.action, self.params)
    }
}

impl fmt::Debug for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CacheKey({self})")
    }
}

/// Running totals of a tree deletion. Summed across recursive calls.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletionTally {
    /// Item metadata records removed, including the root.
    pub items_deleted: i64,
    /// Cache records removed, including primary representations.
    pub caches_deleted: i64,
}

impl AddAssign for DeletionTally {
    fn add_assign(&mut self, other: Self) {
        self.items_deleted += other.items_deleted;
        self.caches_deleted += other.caches_deleted;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_display() {
        let id = ItemIdentity::new("art", "sig1");
        assert_eq!(id.to_string(), "art/sig1");
    }

    #[test]
    fn action_signature_display() {
        let sig = ActionSignature::new("image", "resize");
        assert_eq!(sig.to_string(), "image::resize");
    }

    #[test]
    fn cache_key_display() {
        let key = CacheKey::new(ItemIdentity::new("art", "sig1"), "thumb", "w=100");
        assert_eq!(key.to_string(), "art/sig1/thumb/w=100");
    }

    #[test]
    fn tally_accumulates() {
        let mut total = DeletionTally::default();
        total += DeletionTally {
            items_deleted: 2,
            caches_deleted: 3,
        };
        total += DeletionTally {
            items_deleted: 1,
            caches_deleted: 0,
        };
        assert_eq!(total.items_deleted, 3);
        assert_eq!(total.caches_deleted, 3);
    }
}
