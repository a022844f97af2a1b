//! Fetch Cache Module
//!
//! Caches externally fetched content under its request identity (a URL)
//! for a fixed TTL, counting every access.

mod http;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::backend::{read_counter, Backend, SharedBackend};
use crate::cache::decode;
use crate::config::Config;
use crate::error::{CacheError, Result};

pub use http::HttpFetcher;

// == Fetcher ==
/// Retrieves content for a request identity on a cache miss.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, request_id: &str) -> Result<String>;
}

/// Any `Fn(String) -> impl Future<Output = Result<String>>` is a fetcher.
#[async_trait]
impl<F, Fut> Fetcher for F
where
    F: Fn(String) -> Fut + Send + Sync,
    Fut: Future<Output = Result<String>> + Send + 'static,
{
    async fn fetch(&self, request_id: &str) -> Result<String> {
        self(request_id.to_string()).await
    }
}

/// Key of the access counter for `request_id`.
pub fn access_key(request_id: &str) -> String {
    format!("count:{}", request_id)
}

// == Fetch Cached ==
/// Returns the content for `request_id`, from the backend if cached or from
/// `fetcher` otherwise.
///
/// The access counter `count:{request_id}` is incremented on every call,
/// hit or miss. Fetched content is stored with `ttl` and left to the
/// backend to expire. Fetch failures are returned and nothing is cached.
/// Concurrent misses on the same key each call `fetcher`.
pub async fn fetch_cached(
    backend: &dyn Backend,
    request_id: &str,
    fetcher: &dyn Fetcher,
    ttl: Duration,
) -> Result<String> {
    let accesses = backend.incr(&access_key(request_id)).await?;

    if let Some(cached) = backend.get(request_id).await? {
        debug!(request_id, accesses, "Fetch cache hit");
        return Ok(decode::utf8(&cached)?);
    }

    debug!(request_id, accesses, "Fetch cache miss");
    let content = fetcher.fetch(request_id).await?;
    backend
        .set_ex(request_id, content.clone().into_bytes(), ttl)
        .await?;

    Ok(content)
}

// == Page Cache ==
/// Expiring fetch cache bound to a backend, a fetcher and a TTL.
#[derive(Clone)]
pub struct PageCache {
    backend: SharedBackend,
    fetcher: Arc<dyn Fetcher>,
    ttl: Duration,
}

impl PageCache {
    /// Creates a page cache keeping fetched pages for `ttl`.
    ///
    /// A zero TTL is rejected up front: the backend would refuse to store
    /// every fetched page.
    pub fn new(backend: SharedBackend, fetcher: Arc<dyn Fetcher>, ttl: Duration) -> Result<Self> {
        if ttl.is_zero() {
            return Err(CacheError::InvalidRequest(
                "page TTL must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            backend,
            fetcher,
            ttl,
        })
    }

    /// Creates a page cache fetching over HTTP with the configured TTL and timeout.
    pub fn from_config(backend: SharedBackend, config: &Config) -> Result<Self> {
        let fetcher = HttpFetcher::from_config(config)?;
        Self::new(backend, Arc::new(fetcher), config.page_ttl())
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns the page at `url`, fetching it on a cache miss.
    pub async fn get_page(&self, url: &str) -> Result<String> {
        fetch_cached(self.backend.as_ref(), url, self.fetcher.as_ref(), self.ttl).await
    }

    /// Returns how many times `url` has been requested.
    pub async fn access_count(&self, url: &str) -> Result<u64> {
        read_counter(self.backend.as_ref(), &access_key(url)).await
    }
}

impl std::fmt::Debug for PageCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageCache")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}
