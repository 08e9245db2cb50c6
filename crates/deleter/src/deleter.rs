//! The cascading deletion engine.
//!
//! Removes a media item, all of its descendant items, and every associated
//! cache record and blob, walking the item tree through paginated remote
//! listings. Each eviction is locally ordered (blob before metadata) so
//! metadata never points at a blob that is already gone; the reverse — a
//! blob briefly outliving its record — is acceptable and reclaimable by an
//! offline sweep.

use crate::error::{DeleteError, DeleteResult};
use futures::future::BoxFuture;
use reaper_clients::{ActionCatalog, CacheRecord, RecordStore};
use reaper_core::{
    canonicalize, ActionSignature, CacheKey, DeletionTally, ItemIdentity, PageRequest,
    CACHE_PAGE_SIZE, ITEM_PAGE_SIZE, PRIMARY_ACTION,
};
use reaper_storage::BlobStore;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Whether a cache record path is an absolute URL, i.e. the artifact is
/// owned elsewhere and must not be removed from local storage.
fn is_external_url(path: &str) -> bool {
    match path.split_once("://") {
        Some((scheme, _)) => {
            !scheme.is_empty()
                && scheme.chars().next().is_some_and(|c| c.is_ascii_lowercase())
                && scheme
                    .chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || "+.-".contains(c))
        }
        None => false,
    }
}

/// Compose the physical blob path from a storage file-base and the
/// record's relative path, stripping a leading slash from the relative
/// part before concatenation.
fn physical_path(filebase: &str, relative: &str) -> String {
    format!(
        "{}/{}",
        filebase.trim_end_matches('/'),
        relative.trim_start_matches('/')
    )
}

/// The deletion engine.
///
/// Holds the two collaborator clients, the blob store, and the per-process
/// parameter schema cache. Cheap to share behind an `Arc`; the schema
/// cache is reader-writer guarded so concurrent deletions are safe.
pub struct Deleter {
    records: Arc<dyn RecordStore>,
    actions: Arc<dyn ActionCatalog>,
    blobs: Arc<dyn BlobStore>,
    /// Memoized parameter schemas, one entry per (media type, action).
    /// Schemas are assumed immutable for the process lifetime; entries are
    /// never invalidated and failures are never cached.
    schemas: RwLock<HashMap<ActionSignature, Arc<Vec<String>>>>,
}

impl Deleter {
    pub fn new(
        records: Arc<dyn RecordStore>,
        actions: Arc<dyn ActionCatalog>,
        blobs: Arc<dyn BlobStore>,
    ) -> Self {
        Self {
            records,
            actions,
            blobs,
            schemas: RwLock::new(HashMap::new()),
        }
    }

    /// Resolve the ordered parameter schema for `(media_type, action)`,
    /// fetching it from the action catalog at most once per process.
    pub async fn resolve_schema(
        &self,
        media_type: &str,
        action: &str,
    ) -> DeleteResult<Arc<Vec<String>>> {
        let signature = ActionSignature::new(media_type, action);
        if let Some(schema) = self.schemas.read().await.get(&signature) {
            return Ok(schema.clone());
        }

        let params = self
            .actions
            .get_params(media_type, action)
            .await
            .map_err(|e| DeleteError::upstream(format!("cannot get params for {signature}"), e))?;
        tracing::debug!(signature = %signature, params = ?params, "resolved parameter schema");

        let schema = Arc::new(params);
        self.schemas
            .write()
            .await
            .insert(signature, schema.clone());
        Ok(schema)
    }

    /// Evict one cached artifact: remove its blob (when locally stored)
    /// and then its metadata record.
    ///
    /// Returns `Ok(false)` when the record was already absent, making the
    /// operation idempotent. Blob removal failure aborts the eviction with
    /// the metadata record intact.
    pub async fn evict_cache(
        &self,
        identity: &ItemIdentity,
        action: &str,
        raw_params: &str,
    ) -> DeleteResult<bool> {
        let item = match self.records.get_item(identity).await {
            Ok(item) => item,
            Err(e) if e.is_not_found() => {
                return Err(DeleteError::ItemNotFound(identity.clone()));
            }
            Err(e) => {
                return Err(DeleteError::upstream(format!("cannot get item {identity}"), e));
            }
        };

        let schema = self.resolve_schema(&item.media_type, action).await?;
        let params = canonicalize(raw_params, &schema);
        let key = CacheKey::new(identity.clone(), action, params);

        let record = match self.records.get_cache(&key).await {
            Ok(record) => record,
            Err(e) if e.is_not_found() => {
                tracing::debug!(cache = %key, "cache record already absent");
                return Ok(false);
            }
            Err(e) => {
                return Err(DeleteError::upstream(format!("cannot get cache {key}"), e));
            }
        };

        self.remove_blob(&key, &record).await?;

        match self.records.delete_cache(&key).await {
            Ok(()) => {}
            // Lost a race with another eviction; the record is gone either way.
            Err(e) if e.is_not_found() => {}
            Err(e) => {
                return Err(DeleteError::upstream(format!("cannot delete cache {key}"), e));
            }
        }
        tracing::debug!(cache = %key, "cache deleted");
        Ok(true)
    }

    /// Remove the record's blob, unless the artifact is externally owned.
    ///
    /// A blob the store reports as already absent counts as removed: a
    /// crash between blob and metadata deletion must leave a record that a
    /// retry can still evict.
    async fn remove_blob(&self, key: &CacheKey, record: &CacheRecord) -> DeleteResult<()> {
        if is_external_url(&record.path) {
            tracing::debug!(cache = %key, url = %record.path, "externally owned artifact, skipping blob removal");
            return Ok(());
        }

        let storage = record
            .storage
            .as_ref()
            .ok_or_else(|| DeleteError::MalformedRecord(key.clone()))?;
        let path = physical_path(&storage.filebase, &record.path);
        tracing::debug!(cache = %key, path = %path, "removing blob");

        match self.blobs.remove(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.is_not_found() => {
                tracing::debug!(path = %path, "blob already absent");
                Ok(())
            }
            Err(e) => {
                tracing::error!(cache = %key, path = %path, error = %e, "blob removal failed");
                Err(DeleteError::BlobDelete { path, source: e })
            }
        }
    }

    /// Collect an item's cache records across all pages.
    ///
    /// The listing is consumed fully before any eviction mutates it;
    /// advancing page numbers over a listing that shrinks underneath would
    /// skip records. Absence of a next-page number terminates iteration.
    async fn list_all_caches(&self, identity: &ItemIdentity) -> DeleteResult<Vec<CacheRecord>> {
        let mut records = Vec::new();
        let mut page = PageRequest::first(CACHE_PAGE_SIZE);
        loop {
            let batch = self
                .records
                .get_caches(identity, &page)
                .await
                .map_err(|e| {
                    DeleteError::upstream(format!("cannot list caches of {identity}"), e)
                })?;
            records.extend(batch.caches);
            match batch.next_page {
                Some(next) => page = page.with_page(next),
                None => break,
            }
        }
        Ok(records)
    }

    /// Collect an item's child identities across all pages. A not-found
    /// listing means the item simply has no children.
    async fn list_all_children(&self, identity: &ItemIdentity) -> DeleteResult<Vec<ItemIdentity>> {
        let mut children = Vec::new();
        let mut page = PageRequest::first(ITEM_PAGE_SIZE);
        loop {
            let batch = match self.records.get_child_items(identity, &page).await {
                Ok(batch) => batch,
                Err(e) if e.is_not_found() => break,
                Err(e) => {
                    return Err(DeleteError::upstream(
                        format!("cannot list children of {identity}"),
                        e,
                    ));
                }
            };
            children.extend(batch.items);
            match batch.next_page {
                Some(next) => page = page.with_page(next),
                None => break,
            }
        }
        Ok(children)
    }

    /// Evict every cache record of one item. With `include_primary` false
    /// the item's primary representation cache (the reserved `"item"`
    /// action) is kept.
    ///
    /// Returns the number of records actually evicted, not visited.
    pub async fn sweep_caches(
        &self,
        identity: &ItemIdentity,
        include_primary: bool,
    ) -> DeleteResult<i64> {
        let mut deleted = 0i64;
        for record in self.list_all_caches(identity).await? {
            if !include_primary && record.action == PRIMARY_ACTION {
                continue;
            }
            if self
                .evict_cache(identity, &record.action, &record.params)
                .await?
            {
                deleted += 1;
            }
        }
        Ok(deleted)
    }

    /// Delete an item, all of its descendant items, and all associated
    /// caches, depth first.
    ///
    /// Children and their caches are always fully removed before the
    /// parent's own caches and record, so a crash mid-deletion leaves a
    /// deletable remainder rather than orphaned subtrees. Tree depth in
    /// this domain is small, so direct (boxed) recursion is fine.
    pub fn delete_item_tree<'a>(
        &'a self,
        identity: &'a ItemIdentity,
    ) -> BoxFuture<'a, DeleteResult<DeletionTally>> {
        Box::pin(async move {
            let mut tally = DeletionTally::default();

            for child in self.list_all_children(identity).await? {
                tally += self.delete_item_tree(&child).await?;
            }

            tally.caches_deleted += self.sweep_caches(identity, true).await?;

            match self.records.delete_item(identity).await {
                Ok(()) => tally.items_deleted += 1,
                Err(e) if e.is_not_found() => {
                    return Err(DeleteError::ItemNotFound(identity.clone()));
                }
                Err(e) => {
                    return Err(DeleteError::upstream(
                        format!("cannot delete item {identity}"),
                        e,
                    ));
                }
            }

            tracing::info!(
                item = %identity,
                items = tally.items_deleted,
                caches = tally.caches_deleted,
                "item subtree deleted"
            );
            Ok(tally)
        })
    }
}
