//! In-memory action-parameter service.

use async_trait::async_trait;
use reaper_clients::{ActionCatalog, ClientError, ClientResult};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

/// In-memory action catalog with call counting and failure injection.
#[derive(Default)]
pub struct MemoryActionCatalog {
    schemas: Mutex<HashMap<(String, String), Vec<String>>>,
    lookups: AtomicUsize,
    unavailable: AtomicBool,
}

impl MemoryActionCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the ordered parameter schema for `(media_type, action)`.
    pub fn register(&self, media_type: &str, action: &str, params: &[&str]) {
        self.schemas.lock().unwrap().insert(
            (media_type.to_string(), action.to_string()),
            params.iter().map(|p| p.to_string()).collect(),
        );
    }

    /// How many remote lookups the catalog has served.
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    /// Make every subsequent lookup fail as unavailable.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }
}

#[async_trait]
impl ActionCatalog for MemoryActionCatalog {
    async fn get_params(&self, media_type: &str, action: &str) -> ClientResult<Vec<String>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(ClientError::Status {
                status: 503,
                body: "action catalog unavailable".to_string(),
            });
        }
        self.schemas
            .lock()
            .unwrap()
            .get(&(media_type.to_string(), action.to_string()))
            .cloned()
            .ok_or_else(|| ClientError::NotFound(format!("params for {media_type}::{action}")))
    }

    async fn ping(&self) -> ClientResult<()> {
        Ok(())
    }
}
