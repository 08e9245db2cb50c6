//! Action-parameter service client.

use crate::error::ClientResult;
use crate::http::HttpTransport;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

/// Capability contract of the action-parameter service: maps a media type
/// and action name to the ordered list of parameter names relevant to that
/// action.
#[async_trait]
pub trait ActionCatalog: Send + Sync {
    /// Ordered parameter names for `(media_type, action)`.
    async fn get_params(&self, media_type: &str, action: &str) -> ClientResult<Vec<String>>;

    /// Liveness probe.
    async fn ping(&self) -> ClientResult<()>;
}

#[derive(Debug, Deserialize)]
struct ParamsResponse {
    values: Vec<String>,
}

/// HTTP/JSON adapter for the action catalog.
#[derive(Clone)]
pub struct HttpActionCatalog {
    transport: HttpTransport,
}

impl HttpActionCatalog {
    pub fn new(
        base_url: &str,
        token: Option<String>,
        request_timeout: Duration,
    ) -> ClientResult<Self> {
        Ok(Self {
            transport: HttpTransport::new(base_url, token, request_timeout)?,
        })
    }
}

#[async_trait]
impl ActionCatalog for HttpActionCatalog {
    async fn get_params(&self, media_type: &str, action: &str) -> ClientResult<Vec<String>> {
        let url = self
            .transport
            .url(&format!("/v1/actions/{media_type}/{action}/params"))?;
        let response: ParamsResponse = self
            .transport
            .send_json(
                self.transport.get(url),
                &format!("params for {media_type}::{action}"),
            )
            .await?;
        Ok(response.values)
    }

    async fn ping(&self) -> ClientResult<()> {
        let url = self.transport.url("/v1/health")?;
        self.transport
            .send_empty(self.transport.get(url), "action catalog health")
            .await
    }
}
