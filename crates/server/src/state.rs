//! Application state shared across handlers.

use reaper_core::AppConfig;
use reaper_deleter::Deleter;
use std::sync::Arc;

/// Shared server state.
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub deleter: Arc<Deleter>,
}

impl AppState {
    pub fn new(config: AppConfig, deleter: Arc<Deleter>) -> Self {
        Self { config, deleter }
    }
}
