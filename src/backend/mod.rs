//! Storage Backend Module
//!
//! The key-value store the cache facade, instrumentation wrappers and fetch
//! cache are layered on, with an in-memory implementation and one backed by
//! a Redis server.

mod entry;
mod keyspace;
mod memory;
mod redis_backend;
mod stats;

#[cfg(test)]
mod property_tests;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::cache::decode;
use crate::error::{DecodeError, Result};

// Re-export public types
pub use entry::{Entry, Slot};
pub use keyspace::Keyspace;
pub use memory::MemoryBackend;
pub use redis_backend::RedisBackend;
pub use stats::KeyspaceStats;

/// Backend handle shared by every component of one process.
pub type SharedBackend = Arc<dyn Backend>;

// == Backend Trait ==
/// Key-value store with the Redis command surface the cache needs.
///
/// Every operation may fail with [`CacheError::Backend`](crate::error::CacheError::Backend)
/// when the store is unreachable or rejects the command; callers propagate it.
#[async_trait]
pub trait Backend: Send + Sync {
    /// `SET key value`
    async fn set(&self, key: &str, value: Vec<u8>) -> Result<()>;

    /// `GET key`; `None` if the key is absent or expired.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// `INCR key`; absent keys start at zero.
    async fn incr(&self, key: &str) -> Result<i64>;

    /// `RPUSH key item`; returns the list length after the push.
    async fn rpush(&self, key: &str, item: Vec<u8>) -> Result<usize>;

    /// `MULTI; RPUSH ...; EXEC`: the pushes land in order with no other
    /// command interleaved. The in-memory backend also validates every push
    /// first, so a rejected batch changes nothing.
    async fn rpush_atomic(&self, pushes: Vec<(String, Vec<u8>)>) -> Result<()>;

    /// `LRANGE key start stop`, inclusive; `-1` denotes the last item.
    async fn lrange(&self, key: &str, start: i64, stop: i64) -> Result<Vec<Vec<u8>>>;

    /// `SETEX key ttl value`
    async fn set_ex(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<()>;

    /// `FLUSHDB`: removes every key in the namespace.
    async fn flushdb(&self) -> Result<()>;
}

/// Reads a counter written by [`Backend::incr`]; an absent key reads as zero.
pub async fn read_counter(backend: &dyn Backend, key: &str) -> Result<u64> {
    match backend.get(key).await? {
        Some(raw) => Ok(decode::utf8(&raw)?.parse::<u64>().map_err(DecodeError::from)?),
        None => Ok(0),
    }
}
