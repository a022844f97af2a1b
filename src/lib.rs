//! Instrumented Cache - a cache facade with call instrumentation
//!
//! Stores scalar values under random keys in a Redis-like backend, counts
//! and records calls to wrapped operations, replays recorded history, and
//! caches fetched pages with a TTL.

pub mod backend;
pub mod cache;
pub mod config;
pub mod error;
pub mod fetch;
pub mod instrument;
pub mod tasks;

pub use backend::{Backend, MemoryBackend, RedisBackend, SharedBackend};
pub use cache::{Cache, Key, Value};
pub use config::Config;
pub use error::{CacheError, DecodeError, Result};
pub use fetch::{fetch_cached, Fetcher, HttpFetcher, PageCache};
pub use instrument::{call_count, replay, CallHistory, CountCalls, MethodId, Operation};
pub use tasks::spawn_expiry_task;
