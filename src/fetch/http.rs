//! HTTP Fetcher
//!
//! Fetches page bodies with reqwest.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::fetch::Fetcher;

/// Fetches the body of a URL with an HTTP GET.
///
/// The body is returned whatever the response status; non-success statuses
/// are logged. Transport failures become [`CacheError::Fetch`].
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Creates a fetcher whose requests time out after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CacheError::InvalidRequest(format!("cannot build HTTP client: {}", e)))?;
        Ok(Self::with_client(client))
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.fetch_timeout())
    }

    /// Uses an already configured client.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| CacheError::fetch(url, e))?;

        let status = response.status();
        if !status.is_success() {
            warn!(url, %status, "Fetched page with non-success status");
        }

        let body = response.text().await.map_err(|e| CacheError::fetch(url, e))?;
        debug!(url, bytes = body.len(), "Fetched page");
        Ok(body)
    }
}
