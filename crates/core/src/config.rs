//! Configuration types shared across crates.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

/// Top-level application configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    pub upstream: UpstreamConfig,
    pub storage: StorageConfig,
}

impl AppConfig {
    /// Validate the configuration as a whole.
    pub fn validate(&self) -> crate::Result<()> {
        self.upstream.validate()?;
        self.storage.validate()
    }

    /// Create a test configuration pointing at throwaway endpoints.
    ///
    /// **For testing only.**
    pub fn for_testing(root: impl Into<PathBuf>) -> Self {
        Self {
            server: ServerConfig::default(),
            upstream: UpstreamConfig {
                records_url: "http://127.0.0.1:9".to_string(),
                actions_url: "http://127.0.0.1:9".to_string(),
                bearer_token: None,
                request_timeout_secs: default_request_timeout_secs(),
            },
            storage: StorageConfig {
                roots: HashMap::from([("media".to_string(), root.into())]),
            },
        }
    }
}

/// HTTP server configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:8776").
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

/// Endpoints of the two upstream collaborators: the database-of-record
/// service and the action-parameter service.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// Base URL of the database-of-record service.
    pub records_url: String,
    /// Base URL of the action-parameter service.
    pub actions_url: String,
    /// Optional bearer token sent to both collaborators.
    #[serde(default)]
    pub bearer_token: Option<String>,
    /// Per-request timeout in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl UpstreamConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    fn validate(&self) -> crate::Result<()> {
        if self.records_url.is_empty() {
            return Err(crate::Error::Config("upstream.records_url is empty".to_string()));
        }
        if self.actions_url.is_empty() {
            return Err(crate::Error::Config("upstream.actions_url is empty".to_string()));
        }
        Ok(())
    }
}

/// Blob storage configuration: named storage roots.
///
/// Cache metadata addresses blobs as `{root}/{relative path}`; every root
/// name referenced by metadata must be configured here.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Map of root name to local directory.
    pub roots: HashMap<String, PathBuf>,
}

impl StorageConfig {
    pub fn validate(&self) -> crate::Result<()> {
        if self.roots.is_empty() {
            return Err(crate::Error::Config(
                "storage.roots must name at least one root".to_string(),
            ));
        }
        for name in self.roots.keys() {
            if name.is_empty() || name.contains('/') {
                return Err(crate::Error::Config(format!(
                    "invalid storage root name: {name:?}"
                )));
            }
        }
        Ok(())
    }
}

fn default_bind() -> String {
    "127.0.0.1:8776".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}
