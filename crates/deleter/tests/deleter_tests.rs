//! Integration tests for the cascading deletion engine, running against
//! in-memory collaborators.

use bytes::Bytes;
use reaper_core::{ItemIdentity, PRIMARY_ACTION};
use reaper_deleter::{DeleteError, Deleter};
use reaper_storage::BlobStore;
use reaper_testkit::{
    external_cache_record, local_cache_record, MemoryActionCatalog, MemoryBlobStore,
    MemoryRecordStore,
};
use std::sync::Arc;

struct Env {
    records: Arc<MemoryRecordStore>,
    actions: Arc<MemoryActionCatalog>,
    blobs: Arc<MemoryBlobStore>,
    deleter: Deleter,
}

fn env() -> Env {
    let records = Arc::new(MemoryRecordStore::new());
    let actions = Arc::new(MemoryActionCatalog::new());
    let blobs = Arc::new(MemoryBlobStore::new());
    let deleter = Deleter::new(records.clone(), actions.clone(), blobs.clone());
    Env {
        records,
        actions,
        blobs,
        deleter,
    }
}

impl Env {
    /// Seed an image item with a locally stored cache record and its blob.
    /// `params` must already be canonical for the registered schema.
    async fn seed_local_cache(&self, identity: &ItemIdentity, action: &str, params: &str) -> String {
        let rel = format!(
            "{}/{}/{}_{}.bin",
            identity.collection, identity.signature, action, params
        );
        self.records
            .insert_cache(identity, local_cache_record(action, params, "media", &rel));
        let blob_path = format!("media/{rel}");
        self.blobs
            .put(&blob_path, Bytes::from_static(b"artifact"))
            .await
            .unwrap();
        blob_path
    }
}

#[tokio::test]
async fn evicting_absent_cache_is_a_noop() {
    let env = env();
    let id = ItemIdentity::new("art", "sig1");
    env.records.insert_item(&id, "image");
    env.actions.register("image", "thumb", &["w"]);

    let found = env.deleter.evict_cache(&id, "thumb", "w=100").await.unwrap();
    assert!(!found);
    // Still a no-op the second time.
    let found = env.deleter.evict_cache(&id, "thumb", "w=100").await.unwrap();
    assert!(!found);
}

#[tokio::test]
async fn evicting_twice_equals_once() {
    let env = env();
    let id = ItemIdentity::new("art", "sig1");
    env.records.insert_item(&id, "image");
    env.actions.register("image", "thumb", &["w"]);
    let blob_path = env.seed_local_cache(&id, "thumb", "w=100").await;

    assert!(env.deleter.evict_cache(&id, "thumb", "w=100").await.unwrap());
    assert!(!env.blobs.exists(&blob_path).await.unwrap());
    assert_eq!(env.records.cache_count(), 0);

    assert!(!env.deleter.evict_cache(&id, "thumb", "w=100").await.unwrap());
    assert_eq!(env.records.cache_count(), 0);
}

#[tokio::test]
async fn evicting_cache_of_missing_item_fails() {
    let env = env();
    let id = ItemIdentity::new("art", "ghost");

    let err = env
        .deleter
        .evict_cache(&id, "thumb", "w=100")
        .await
        .unwrap_err();
    assert!(matches!(err, DeleteError::ItemNotFound(ref missing) if *missing == id));
}

#[tokio::test]
async fn raw_params_are_canonicalized_before_lookup() {
    let env = env();
    let id = ItemIdentity::new("art", "sig1");
    env.records.insert_item(&id, "image");
    env.actions.register("image", "thumb", &["w", "h"]);
    env.seed_local_cache(&id, "thumb", "w=100/h=50").await;

    // Reordered, with a schema-irrelevant extra key.
    let found = env
        .deleter
        .evict_cache(&id, "thumb", "debug=1/h=50/w=100")
        .await
        .unwrap();
    assert!(found);
    assert_eq!(env.records.cache_count(), 0);
}

#[tokio::test]
async fn schema_is_fetched_once_per_signature() {
    let env = env();
    let id = ItemIdentity::new("art", "sig1");
    env.records.insert_item(&id, "image");
    env.actions.register("image", "thumb", &["w"]);

    env.deleter.evict_cache(&id, "thumb", "w=1").await.unwrap();
    env.deleter.evict_cache(&id, "thumb", "w=2").await.unwrap();
    env.deleter.evict_cache(&id, "thumb", "w=3").await.unwrap();
    assert_eq!(env.actions.lookups(), 1);
}

#[tokio::test]
async fn schema_failure_is_not_cached() {
    let env = env();
    let id = ItemIdentity::new("art", "sig1");
    env.records.insert_item(&id, "image");
    env.actions.register("image", "thumb", &["w"]);

    env.actions.set_unavailable(true);
    let err = env
        .deleter
        .evict_cache(&id, "thumb", "w=100")
        .await
        .unwrap_err();
    assert!(matches!(err, DeleteError::Upstream { .. }));
    assert_eq!(env.actions.lookups(), 1);

    env.actions.set_unavailable(false);
    env.deleter.evict_cache(&id, "thumb", "w=100").await.unwrap();
    assert_eq!(env.actions.lookups(), 2);
}

#[tokio::test]
async fn external_url_record_skips_blob_removal() {
    let env = env();
    let id = ItemIdentity::new("art", "sig1");
    env.records.insert_item(&id, "image");
    env.actions.register("image", "thumb", &["w"]);
    env.records.insert_cache(
        &id,
        external_cache_record("thumb", "w=100", "http://cdn.example/x.jpg"),
    );
    env.blobs
        .put("media/unrelated.bin", Bytes::from_static(b"x"))
        .await
        .unwrap();

    let found = env.deleter.evict_cache(&id, "thumb", "w=100").await.unwrap();
    assert!(found);
    // Only the metadata record went away; the blob store was never touched.
    assert_eq!(env.records.cache_count(), 0);
    assert_eq!(env.blobs.blob_count(), 1);
}

#[tokio::test]
async fn blob_failure_keeps_the_metadata_record() {
    let env = env();
    let id = ItemIdentity::new("art", "sig1");
    env.records.insert_item(&id, "image");
    env.actions.register("image", "thumb", &["w"]);
    let blob_path = env.seed_local_cache(&id, "thumb", "w=100").await;

    env.blobs.set_fail_removes(true);
    let err = env
        .deleter
        .evict_cache(&id, "thumb", "w=100")
        .await
        .unwrap_err();
    assert!(matches!(err, DeleteError::BlobDelete { .. }));
    assert_eq!(env.records.cache_count(), 1);
    assert!(env.blobs.exists(&blob_path).await.unwrap());

    // Once the store recovers, the retry succeeds.
    env.blobs.set_fail_removes(false);
    assert!(env.deleter.evict_cache(&id, "thumb", "w=100").await.unwrap());
    assert_eq!(env.records.cache_count(), 0);
}

#[tokio::test]
async fn already_absent_blob_does_not_block_eviction() {
    let env = env();
    let id = ItemIdentity::new("art", "sig1");
    env.records.insert_item(&id, "image");
    env.actions.register("image", "thumb", &["w"]);
    // Record only; the blob was lost in an earlier partial eviction.
    env.records.insert_cache(
        &id,
        local_cache_record("thumb", "w=100", "media", "art/sig1/thumb.bin"),
    );

    let found = env.deleter.evict_cache(&id, "thumb", "w=100").await.unwrap();
    assert!(found);
    assert_eq!(env.records.cache_count(), 0);
}

#[tokio::test]
async fn local_record_without_storage_descriptor_is_rejected() {
    let env = env();
    let id = ItemIdentity::new("art", "sig1");
    env.records.insert_item(&id, "image");
    env.actions.register("image", "thumb", &["w"]);
    let mut record = local_cache_record("thumb", "w=100", "media", "art/sig1/thumb.bin");
    record.storage = None;
    env.records.insert_cache(&id, record);

    let err = env
        .deleter
        .evict_cache(&id, "thumb", "w=100")
        .await
        .unwrap_err();
    assert!(matches!(err, DeleteError::MalformedRecord(_)));
    assert_eq!(env.records.cache_count(), 1);
}

#[tokio::test]
async fn sweep_can_exclude_the_primary_cache() {
    let env = env();
    let id = ItemIdentity::new("art", "sig1");
    env.records.insert_item(&id, "image");
    env.actions.register("image", "thumb", &["w"]);
    env.actions.register("image", PRIMARY_ACTION, &[]);
    env.seed_local_cache(&id, PRIMARY_ACTION, "").await;
    env.seed_local_cache(&id, "thumb", "w=100").await;

    let swept = env.deleter.sweep_caches(&id, false).await.unwrap();
    assert_eq!(swept, 1);
    let remaining = env.records.caches_of(&id);
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].action, PRIMARY_ACTION);

    let swept = env.deleter.sweep_caches(&id, true).await.unwrap();
    assert_eq!(swept, 1);
    assert_eq!(env.records.cache_count(), 0);
}

#[tokio::test]
async fn sweep_pages_through_large_listings() {
    let env = env();
    let id = ItemIdentity::new("art", "sig1");
    env.records.insert_item(&id, "image");
    env.actions.register("image", "thumb", &["w"]);
    // Spans three pages at the fixed page size of 100.
    for i in 0..250 {
        env.seed_local_cache(&id, "thumb", &format!("w={i}")).await;
    }

    let swept = env.deleter.sweep_caches(&id, true).await.unwrap();
    assert_eq!(swept, 250);
    assert_eq!(env.records.cache_count(), 0);
    assert_eq!(env.blobs.blob_count(), 0);
}

#[tokio::test]
async fn tree_deletion_scenario() {
    // collection "art": sig1 has children sig2, sig3 and one thumb cache;
    // each child has one primary cache.
    let env = env();
    let root = ItemIdentity::new("art", "sig1");
    let child_a = ItemIdentity::new("art", "sig2");
    let child_b = ItemIdentity::new("art", "sig3");

    env.actions.register("image", "thumb", &["w"]);
    env.actions.register("image", PRIMARY_ACTION, &[]);

    env.records.insert_item(&root, "image");
    env.records.insert_item(&child_a, "image");
    env.records.insert_item(&child_b, "image");
    env.records.insert_child(&root, &child_a);
    env.records.insert_child(&root, &child_b);

    env.seed_local_cache(&root, "thumb", "w=100").await;
    env.seed_local_cache(&child_a, PRIMARY_ACTION, "").await;
    env.seed_local_cache(&child_b, PRIMARY_ACTION, "").await;

    let tally = env.deleter.delete_item_tree(&root).await.unwrap();
    assert_eq!(tally.items_deleted, 3);
    assert_eq!(tally.caches_deleted, 3);

    assert_eq!(env.records.item_count(), 0);
    assert_eq!(env.records.cache_count(), 0);
    assert_eq!(env.blobs.blob_count(), 0);
}

#[tokio::test]
async fn leaf_item_without_child_listing_deletes_cleanly() {
    let env = env();
    let id = ItemIdentity::new("art", "leaf");
    env.records.insert_item(&id, "image");

    let tally = env.deleter.delete_item_tree(&id).await.unwrap();
    assert_eq!(tally.items_deleted, 1);
    assert_eq!(tally.caches_deleted, 0);
    assert!(!env.records.has_item(&id));
}

#[tokio::test]
async fn deleting_a_missing_tree_reports_item_not_found() {
    let env = env();
    let id = ItemIdentity::new("art", "ghost");

    let err = env.deleter.delete_item_tree(&id).await.unwrap_err();
    assert!(matches!(err, DeleteError::ItemNotFound(ref missing) if *missing == id));
}

#[tokio::test]
async fn tree_deletion_pages_through_children() {
    let env = env();
    let root = ItemIdentity::new("art", "root");
    env.records.insert_item(&root, "image");
    // Spans two pages at the fixed page size of 100.
    for i in 0..150 {
        let child = ItemIdentity::new("art", format!("child{i}"));
        env.records.insert_item(&child, "image");
        env.records.insert_child(&root, &child);
    }

    let tally = env.deleter.delete_item_tree(&root).await.unwrap();
    assert_eq!(tally.items_deleted, 151);
    assert_eq!(env.records.item_count(), 0);
}

#[tokio::test]
async fn children_are_gone_before_the_parent_is_touched() {
    // A blob failure below the root must abort the traversal with the
    // parent record and the failing child's record both intact.
    let env = env();
    let root = ItemIdentity::new("art", "sig1");
    let child = ItemIdentity::new("art", "sig2");

    env.actions.register("image", PRIMARY_ACTION, &[]);
    env.records.insert_item(&root, "image");
    env.records.insert_item(&child, "image");
    env.records.insert_child(&root, &child);
    env.seed_local_cache(&child, PRIMARY_ACTION, "").await;

    env.blobs.set_fail_removes(true);
    let err = env.deleter.delete_item_tree(&root).await.unwrap_err();
    assert!(matches!(err, DeleteError::BlobDelete { .. }));

    assert!(env.records.has_item(&root));
    assert!(env.records.has_item(&child));
    assert_eq!(env.records.cache_count(), 1);

    // After the store recovers, the same call finishes the job.
    env.blobs.set_fail_removes(false);
    let tally = env.deleter.delete_item_tree(&root).await.unwrap();
    assert_eq!(tally.items_deleted, 2);
    assert_eq!(tally.caches_deleted, 1);
    assert_eq!(env.records.item_count(), 0);
}
