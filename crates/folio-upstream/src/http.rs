//! HTTP client for the upstream generation endpoint.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{info, warn};

use crate::{GenerateContentRequest, Generate, KeyPlacement, UpstreamError};

/// Sends `generateContent` requests to a single configured endpoint.
///
/// One POST per call; no retries.
pub struct UpstreamClient {
    client: reqwest::Client,
    url: String,
    api_key: String,
    key_placement: KeyPlacement,
}

impl UpstreamClient {
    /// Create a client for `url` authenticating with `api_key`.
    ///
    /// `timeout` bounds each whole request, connect through body.
    pub fn new(
        url: String,
        api_key: String,
        key_placement: KeyPlacement,
        timeout: Duration,
    ) -> Result<Self, UpstreamError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url,
            api_key,
            key_placement,
        })
    }
}

impl fmt::Debug for UpstreamClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpstreamClient")
            .field("url", &self.url)
            .field("api_key", &"<redacted>")
            .field("key_placement", &self.key_placement)
            .finish()
    }
}

#[async_trait]
impl Generate for UpstreamClient {
    async fn generate(&self, body: &GenerateContentRequest) -> Result<Value, UpstreamError> {
        let (header, value) = self.key_placement.header(&self.api_key);

        info!(url = %self.url, auth = self.key_placement.as_str(), "calling upstream");
        let resp = self
            .client
            .post(&self.url)
            .header(header, value)
            .json(body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "upstream returned an error");
            return Err(UpstreamError::Server {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = resp.bytes().await?;
        let data: Value = serde_json::from_slice(&bytes)?;
        info!(status = status.as_u16(), bytes = bytes.len(), "upstream responded");
        Ok(data)
    }
}
