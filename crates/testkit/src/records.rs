//! In-memory database-of-record service.

use async_trait::async_trait;
use reaper_clients::{
    CachePage, CacheRecord, ClientError, ClientResult, ItemPage, ItemRecord, RecordStore,
    StorageDescriptor,
};
use reaper_core::{CacheKey, ItemIdentity, PageRequest};
use std::collections::BTreeMap;
use std::sync::Mutex;

/// Build a cache record stored under the given root name, with the
/// conventional `{root}` filebase and a root-relative path.
pub fn local_cache_record(action: &str, params: &str, root: &str, path: &str) -> CacheRecord {
    CacheRecord {
        action: action.to_string(),
        params: params.to_string(),
        path: path.to_string(),
        storage: Some(StorageDescriptor {
            name: root.to_string(),
            filebase: root.to_string(),
        }),
    }
}

/// Build a cache record whose artifact is externally owned.
pub fn external_cache_record(action: &str, params: &str, url: &str) -> CacheRecord {
    CacheRecord {
        action: action.to_string(),
        params: params.to_string(),
        path: url.to_string(),
        storage: None,
    }
}

#[derive(Default)]
struct Inner {
    items: BTreeMap<ItemIdentity, ItemRecord>,
    children: BTreeMap<ItemIdentity, Vec<ItemIdentity>>,
    caches: BTreeMap<ItemIdentity, Vec<CacheRecord>>,
}

/// In-memory record store with deterministic listing order.
///
/// Items without a seeded child listing report `NotFound` for child
/// listings, matching a database that has no child rows at all for the
/// item.
#[derive(Default)]
pub struct MemoryRecordStore {
    inner: Mutex<Inner>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_item(&self, identity: &ItemIdentity, media_type: &str) {
        let mut inner = self.inner.lock().unwrap();
        inner.items.insert(
            identity.clone(),
            ItemRecord {
                collection: identity.collection.clone(),
                signature: identity.signature.clone(),
                media_type: media_type.to_string(),
            },
        );
    }

    pub fn insert_child(&self, parent: &ItemIdentity, child: &ItemIdentity) {
        let mut inner = self.inner.lock().unwrap();
        inner
            .children
            .entry(parent.clone())
            .or_default()
            .push(child.clone());
    }

    pub fn insert_cache(&self, identity: &ItemIdentity, record: CacheRecord) {
        let mut inner = self.inner.lock().unwrap();
        inner.caches.entry(identity.clone()).or_default().push(record);
    }

    pub fn has_item(&self, identity: &ItemIdentity) -> bool {
        self.inner.lock().unwrap().items.contains_key(identity)
    }

    pub fn item_count(&self) -> usize {
        self.inner.lock().unwrap().items.len()
    }

    pub fn cache_count(&self) -> usize {
        self.inner
            .lock()
            .unwrap()
            .caches
            .values()
            .map(Vec::len)
            .sum()
    }

    pub fn caches_of(&self, identity: &ItemIdentity) -> Vec<CacheRecord> {
        self.inner
            .lock()
            .unwrap()
            .caches
            .get(identity)
            .cloned()
            .unwrap_or_default()
    }
}

fn paginate<T: Clone>(entries: &[T], page: &PageRequest) -> (Vec<T>, Option<u32>) {
    let size = page.page_size as usize;
    let start = (page.page as usize).saturating_mul(size);
    let end = (start + size).min(entries.len());
    if start >= entries.len() {
        return (Vec::new(), None);
    }
    let next = if end < entries.len() {
        Some(page.page + 1)
    } else {
        None
    };
    (entries[start..end].to_vec(), next)
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn get_item(&self, identity: &ItemIdentity) -> ClientResult<ItemRecord> {
        self.inner
            .lock()
            .unwrap()
            .items
            .get(identity)
            .cloned()
            .ok_or_else(|| ClientError::NotFound(format!("item {identity}")))
    }

    async fn get_child_items(
        &self,
        identity: &ItemIdentity,
        page: &PageRequest,
    ) -> ClientResult<ItemPage> {
        let inner = self.inner.lock().unwrap();
        let children = inner
            .children
            .get(identity)
            .ok_or_else(|| ClientError::NotFound(format!("children of {identity}")))?;
        let (items, next_page) = paginate(children, page);
        Ok(ItemPage { items, next_page })
    }

    async fn get_caches(
        &self,
        identity: &ItemIdentity,
        page: &PageRequest,
    ) -> ClientResult<CachePage> {
        let inner = self.inner.lock().unwrap();
        let caches = inner.caches.get(identity).map(Vec::as_slice).unwrap_or(&[]);
        let (caches, next_page) = paginate(caches, page);
        Ok(CachePage { caches, next_page })
    }

    async fn get_cache(&self, key: &CacheKey) -> ClientResult<CacheRecord> {
        self.inner
            .lock()
            .unwrap()
            .caches
            .get(&key.identity)
            .and_then(|records| {
                records
                    .iter()
                    .find(|r| r.action == key.action && r.params == key.params)
            })
            .cloned()
            .ok_or_else(|| ClientError::NotFound(format!("cache {key}")))
    }

    async fn delete_cache(&self, key: &CacheKey) -> ClientResult<()> {
        let mut inner = self.inner.lock().unwrap();
        let records = inner
            .caches
            .get_mut(&key.identity)
            .ok_or_else(|| ClientError::NotFound(format!("cache {key}")))?;
        let before = records.len();
        records.retain(|r| !(r.action == key.action && r.params == key.params));
        if records.len() == before {
            return Err(ClientError::NotFound(format!("cache {key}")));
        }
        Ok(())
    }

    async fn delete_item(&self, identity: &ItemIdentity) -> ClientResult<()> {
        let mut inner = self.inner.lock().unwrap();
        if inner.items.remove(identity).is_none() {
            return Err(ClientError::NotFound(format!("item {identity}")));
        }
        inner.children.remove(identity);
        for children in inner.children.values_mut() {
            children.retain(|c| c != identity);
        }
        Ok(())
    }

    async fn ping(&self) -> ClientResult<()> {
        Ok(())
    }
}
