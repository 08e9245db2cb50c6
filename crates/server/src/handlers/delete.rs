//! Deletion endpoints.

use crate::error::ApiResult;
use crate::state::AppState;
use axum::extract::{Path, Query, State};
use axum::Json;
use reaper_core::ItemIdentity;
use serde::{Deserialize, Serialize};

/// Query parameters of a single-cache eviction.
#[derive(Debug, Deserialize)]
pub struct CacheQuery {
    /// Raw action parameter string; canonicalized before lookup.
    #[serde(default)]
    pub params: String,
}

/// Response of the cache eviction and cache sweep endpoints.
#[derive(Debug, Serialize)]
pub struct SweepResponse {
    pub status: &'static str,
    pub message: String,
    /// Number of cache records actually removed.
    pub deleted: i64,
}

/// Response of a tree deletion.
#[derive(Debug, Serialize)]
pub struct DeleteTreeResponse {
    pub status: &'static str,
    pub message: String,
    pub items_deleted: i64,
    pub caches_deleted: i64,
}

/// DELETE /v1/items/{collection}/{signature}/caches/{action}?params=...
///
/// Evicts one cached artifact. Evicting an already-absent cache succeeds
/// with `deleted = 0`.
pub async fn delete_cache_entry(
    State(state): State<AppState>,
    Path((collection, signature, action)): Path<(String, String, String)>,
    Query(query): Query<CacheQuery>,
) -> ApiResult<Json<SweepResponse>> {
    let identity = ItemIdentity::new(collection, signature);
    let found = state
        .deleter
        .evict_cache(&identity, &action, &query.params)
        .await?;

    let message = if found {
        format!("cache {identity}/{action}/{} deleted", query.params)
    } else {
        format!("cache {identity}/{action}/{} was already absent", query.params)
    };
    Ok(Json(SweepResponse {
        status: "ok",
        message,
        deleted: found as i64,
    }))
}

/// DELETE /v1/items/{collection}/{signature}/caches
///
/// Purges the item's derivative caches, keeping the primary
/// representation.
pub async fn sweep_item_caches(
    State(state): State<AppState>,
    Path((collection, signature)): Path<(String, String)>,
) -> ApiResult<Json<SweepResponse>> {
    let identity = ItemIdentity::new(collection, signature);
    let deleted = state.deleter.sweep_caches(&identity, false).await?;

    Ok(Json(SweepResponse {
        status: "ok",
        message: format!("{deleted} caches of item {identity} deleted"),
        deleted,
    }))
}

/// DELETE /v1/items/{collection}/{signature}
///
/// Deletes the item, all descendant items, and every associated cache.
pub async fn delete_item_tree(
    State(state): State<AppState>,
    Path((collection, signature)): Path<(String, String)>,
) -> ApiResult<Json<DeleteTreeResponse>> {
    let identity = ItemIdentity::new(collection, signature);
    let tally = state.deleter.delete_item_tree(&identity).await?;

    tracing::info!(
        item = %identity,
        items_deleted = tally.items_deleted,
        caches_deleted = tally.caches_deleted,
        "item tree deleted"
    );
    Ok(Json(DeleteTreeResponse {
        status: "ok",
        message: format!(
            "item {identity} deleted ({} items, {} caches)",
            tally.items_deleted, tally.caches_deleted
        ),
        items_deleted: tally.items_deleted,
        caches_deleted: tally.caches_deleted,
    }))
}
