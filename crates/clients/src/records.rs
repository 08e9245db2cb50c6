//! Database-of-record service client.

use crate::error::ClientResult;
use crate::http::HttpTransport;
use crate::models::{CachePage, CacheRecord, ItemPage, ItemRecord};
use async_trait::async_trait;
use reaper_core::{CacheKey, ItemIdentity, PageRequest};
use std::time::Duration;

/// Capability contract of the authoritative metadata database.
///
/// All listings are paginated with an explicit page-size/page-number
/// request; a response without a next-page number is the terminal page.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Fetch item metadata. `NotFound` when the item is absent.
    async fn get_item(&self, identity: &ItemIdentity) -> ClientResult<ItemRecord>;

    /// List one page of an item's child items. `NotFound` when the item
    /// has no child listing at all.
    async fn get_child_items(
        &self,
        identity: &ItemIdentity,
        page: &PageRequest,
    ) -> ClientResult<ItemPage>;

    /// List one page of an item's cache records.
    async fn get_caches(
        &self,
        identity: &ItemIdentity,
        page: &PageRequest,
    ) -> ClientResult<CachePage>;

    /// Fetch one cache record by canonical key. `NotFound` when absent.
    async fn get_cache(&self, key: &CacheKey) -> ClientResult<CacheRecord>;

    /// Delete one cache record by canonical key.
    async fn delete_cache(&self, key: &CacheKey) -> ClientResult<()>;

    /// Delete an item's metadata record.
    async fn delete_item(&self, identity: &ItemIdentity) -> ClientResult<()>;

    /// Liveness probe.
    async fn ping(&self) -> ClientResult<()>;
}

/// HTTP/JSON adapter for the record store.
#[derive(Clone)]
pub struct HttpRecordStore {
    transport: HttpTransport,
}

impl HttpRecordStore {
    pub fn new(
        base_url: &str,
        token: Option<String>,
        request_timeout: Duration,
    ) -> ClientResult<Self> {
        Ok(Self {
            transport: HttpTransport::new(base_url, token, request_timeout)?,
        })
    }

    fn item_url(identity: &ItemIdentity) -> String {
        format!("/v1/items/{}/{}", identity.collection, identity.signature)
    }

    fn cache_url(key: &CacheKey) -> String {
        format!("{}/caches/{}", Self::item_url(&key.identity), key.action)
    }
}

#[async_trait]
impl RecordStore for HttpRecordStore {
    async fn get_item(&self, identity: &ItemIdentity) -> ClientResult<ItemRecord> {
        let url = self.transport.url(&Self::item_url(identity))?;
        self.transport
            .send_json(self.transport.get(url), &format!("item {identity}"))
            .await
    }

    async fn get_child_items(
        &self,
        identity: &ItemIdentity,
        page: &PageRequest,
    ) -> ClientResult<ItemPage> {
        let url = self
            .transport
            .url(&format!("{}/children", Self::item_url(identity)))?;
        let req = self
            .transport
            .get(url)
            .query(&[("page", page.page), ("page_size", page.page_size)]);
        self.transport
            .send_json(req, &format!("children of {identity}"))
            .await
    }

    async fn get_caches(
        &self,
        identity: &ItemIdentity,
        page: &PageRequest,
    ) -> ClientResult<CachePage> {
        let url = self
            .transport
            .url(&format!("{}/caches", Self::item_url(identity)))?;
        let req = self
            .transport
            .get(url)
            .query(&[("page", page.page), ("page_size", page.page_size)]);
        self.transport
            .send_json(req, &format!("caches of {identity}"))
            .await
    }

    async fn get_cache(&self, key: &CacheKey) -> ClientResult<CacheRecord> {
        let url = self.transport.url(&Self::cache_url(key))?;
        let req = self.transport.get(url).query(&[("params", &key.params)]);
        self.transport
            .send_json(req, &format!("cache {key}"))
            .await
    }

    async fn delete_cache(&self, key: &CacheKey) -> ClientResult<()> {
        let url = self.transport.url(&Self::cache_url(key))?;
        let req = self.transport.delete(url).query(&[("params", &key.params)]);
        self.transport
            .send_empty(req, &format!("cache {key}"))
            .await
    }

    async fn delete_item(&self, identity: &ItemIdentity) -> ClientResult<()> {
        let url = self.transport.url(&Self::item_url(identity))?;
        self.transport
            .send_empty(self.transport.delete(url), &format!("item {identity}"))
            .await
    }

    async fn ping(&self) -> ClientResult<()> {
        let url = self.transport.url("/v1/health")?;
        self.transport
            .send_empty(self.transport.get(url), "record store health")
            .await
    }
}
