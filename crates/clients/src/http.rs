//! Shared reqwest plumbing for the collaborator clients.

use crate::error::{ClientError, ClientResult};
use reqwest::Url;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Thin wrapper over a reqwest client with a base URL and optional bearer
/// token, shared by both collaborator clients.
#[derive(Clone, Debug)]
pub struct HttpTransport {
    http: reqwest::Client,
    base_url: Url,
    token: Option<String>,
}

impl HttpTransport {
    pub fn new(
        base_url: &str,
        token: Option<String>,
        request_timeout: Duration,
    ) -> ClientResult<Self> {
        let base_url =
            Url::parse(base_url).map_err(|e| ClientError::Url(format!("{base_url}: {e}")))?;
        let http = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()?;
        Ok(Self {
            http,
            base_url,
            token,
        })
    }

    pub fn url(&self, path: &str) -> ClientResult<Url> {
        self.base_url
            .join(path)
            .map_err(|e| ClientError::Url(format!("{path}: {e}")))
    }

    pub fn get(&self, url: Url) -> reqwest::RequestBuilder {
        self.authorize(self.http.get(url))
    }

    pub fn delete(&self, url: Url) -> reqwest::RequestBuilder {
        self.authorize(self.http.delete(url))
    }

    fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    /// Send a request and decode a JSON body. A 404 maps to
    /// `ClientError::NotFound`; other non-success statuses carry the
    /// response body verbatim.
    pub async fn send_json<T: DeserializeOwned>(
        &self,
        req: reqwest::RequestBuilder,
        subject: &str,
    ) -> ClientResult<T> {
        let body = self.send(req, subject).await?;
        serde_json::from_str(&body)
            .map_err(|e| ClientError::Decode(format!("{subject}: {e}")))
    }

    /// Send a request and discard the body, with the same status mapping.
    pub async fn send_empty(
        &self,
        req: reqwest::RequestBuilder,
        subject: &str,
    ) -> ClientResult<()> {
        self.send(req, subject).await.map(|_| ())
    }

    async fn send(&self, req: reqwest::RequestBuilder, subject: &str) -> ClientResult<String> {
        let response = req.send().await?;
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ClientError::NotFound(subject.to_string()));
        }
        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(body)
    }
}
