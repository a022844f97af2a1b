//! In-memory Backend
//!
//! Shares a [`Keyspace`] behind a tokio `RwLock` and exposes it through the
//! [`Backend`] trait.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::backend::{Backend, Keyspace, KeyspaceStats, SharedBackend};
use crate::config::Config;
use crate::error::Result;
use crate::tasks::spawn_expiry_task;

/// Process-local backend with Redis semantics.
///
/// Every command takes the write lock, which makes each command (and each
/// [`rpush_atomic`](Backend::rpush_atomic) batch) atomic with respect to the
/// others.
#[derive(Debug, Clone)]
pub struct MemoryBackend {
    keyspace: Arc<RwLock<Keyspace>>,
}

impl MemoryBackend {
    /// Creates a new backend with the given capacity and value size limit.
    pub fn new(max_entries: usize, max_value_size: usize) -> Self {
        Self {
            keyspace: Arc::new(RwLock::new(Keyspace::new(max_entries, max_value_size))),
        }
    }

    /// Creates a new backend from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.max_entries, config.max_value_size)
    }

    /// Wraps this backend in the shared handle components are built from.
    pub fn shared(self) -> SharedBackend {
        Arc::new(self)
    }

    /// Returns the underlying keyspace.
    pub fn keyspace(&self) -> Arc<RwLock<Keyspace>> {
        self.keyspace.clone()
    }

    /// Returns current keyspace statistics.
    pub async fn stats(&self) -> KeyspaceStats {
        self.keyspace.read().await.stats()
    }

    /// Creates a backend from configuration and starts its expiry sweep
    /// every `cleanup_interval` seconds.
    ///
    /// The sweep ends once every clone of the backend is dropped.
    pub fn with_expiry_sweep(config: &Config) -> Result<(Self, JoinHandle<()>)> {
        let backend = Self::from_config(config);
        let sweep = backend.spawn_expiry_task(config.cleanup_interval())?;
        Ok((backend, sweep))
    }

    /// Starts the periodic sweep that removes expired keys.
    ///
    /// Expired keys are already invisible to reads; the sweep reclaims the
    /// memory of keys nobody reads again.
    pub fn spawn_expiry_task(&self, interval: Duration) -> Result<JoinHandle<()>> {
        spawn_expiry_task(&self.keyspace, interval)
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

#[async_trait]
impl Backend for MemoryBackend {
    async fn set(&self, key: &str, value: Vec<u8>) -> Result<()> {
        self.keyspace.write().await.set(key, value, None)
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        // Write lock: reads may remove expired keys and update stats
        self.keyspace.write().await.get(key)
    }

    async fn incr(&self, key: &str) -> Result<i64> {
        self.keyspace.write().await.incr(key)
    }

    async fn rpush(&self, key: &str, item: Vec<u8>) -> Result<usize> {
        self.keyspace.write().await.rpush(key, item)
    }

    async fn rpush_atomic(&self, pushes: Vec<(String, Vec<u8>)>) -> Result<()> {
        self.keyspace.write().await.rpush_all(pushes)
    }

    async fn lrange(&self, key: &str, start: i64, stop: i64) -> Result<Vec<Vec<u8>>> {
        self.keyspace.write().await.lrange(key, start, stop)
    }

    async fn set_ex(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<()> {
        self.keyspace.write().await.set(key, value, Some(ttl))
    }

    async fn flushdb(&self) -> Result<()> {
        let removed = self.keyspace.write().await.flush();
        debug!("FLUSHDB removed {} keys", removed);
        Ok(())
    }
}
