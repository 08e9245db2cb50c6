//! Common test utilities for the HTTP surface.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use reaper_core::AppConfig;
use reaper_deleter::Deleter;
use reaper_server::{create_router, AppState};
use reaper_testkit::{MemoryActionCatalog, MemoryBlobStore, MemoryRecordStore};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

/// A router wired to in-memory collaborators, with handles for seeding
/// and asserting.
pub struct TestServer {
    pub router: axum::Router,
    pub records: Arc<MemoryRecordStore>,
    pub actions: Arc<MemoryActionCatalog>,
    pub blobs: Arc<MemoryBlobStore>,
}

impl TestServer {
    pub fn new() -> Self {
        let records = Arc::new(MemoryRecordStore::new());
        let actions = Arc::new(MemoryActionCatalog::new());
        let blobs = Arc::new(MemoryBlobStore::new());
        let deleter = Arc::new(Deleter::new(
            records.clone(),
            actions.clone(),
            blobs.clone(),
        ));
        let state = AppState::new(AppConfig::for_testing("/tmp/reaper-test"), deleter);
        Self {
            router: create_router(state),
            records,
            actions,
            blobs,
        }
    }
}

/// Send a request and decode the JSON response body.
pub async fn json_request(
    router: &axum::Router,
    method: &str,
    uri: &str,
) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    let response = router.clone().oneshot(request).await.unwrap();

    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = if body_bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
    };

    (status, json)
}
