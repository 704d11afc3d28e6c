//! HTTP transport to the ledger REST interface.
//!
//! # Responsibilities
//! - Perform GET and mutating calls against the configured endpoint
//! - Surface the ledger's embedded error envelope before callers see a body
//! - Bound every call by the configured request timeout

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Method;
use std::time::Duration;

use crate::ledger::types::{ClientError, ClientResult, ErrorEnvelope};

/// Raw access to the ledger REST interface.
///
/// Implementations return the response body only when it carries no error
/// envelope. Paths are relative to the ledger endpoint.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, path: &str) -> ClientResult<Vec<u8>>;

    async fn mutate(&self, method: Method, path: &str, body: Vec<u8>) -> ClientResult<Vec<u8>>;
}

/// Check a response body for the `{"error": "..."}` envelope.
///
/// The REST layer reports failures inside 200 responses, so this runs
/// regardless of status code.
pub fn check_envelope(body: Vec<u8>) -> ClientResult<Vec<u8>> {
    let envelope: ErrorEnvelope = serde_json::from_slice(&body)?;
    match envelope.error {
        Some(error) if !error.is_empty() => Err(ClientError::Remote(error)),
        _ => Ok(body),
    }
}

/// `reqwest`-backed transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpTransport {
    pub fn new(endpoint: &str, timeout: Duration) -> ClientResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.endpoint, path)
    }

    async fn read_body(res: reqwest::Response) -> ClientResult<Vec<u8>> {
        let status = res.status();
        let body = res.bytes().await?.to_vec();
        if !status.is_success() {
            tracing::debug!(status = %status, "Ledger returned non-success status");
        }
        check_envelope(body)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, path: &str) -> ClientResult<Vec<u8>> {
        let url = self.url(path);
        tracing::debug!(url = %url, "get");

        let res = self.client.get(&url).send().await?;
        Self::read_body(res).await
    }

    async fn mutate(&self, method: Method, path: &str, body: Vec<u8>) -> ClientResult<Vec<u8>> {
        let url = self.url(path);
        tracing::debug!(url = %url, method = %method, "mutate");

        let res = self
            .client
            .request(method, &url)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(body)
            .send()
            .await?;
        Self::read_body(res).await
    }
}
