//! Cache Module
//!
//! Stores scalar values under random keys and reads them back with
//! type-aware decoding.

pub mod decode;
mod value;


use std::fmt;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::backend::SharedBackend;
use crate::error::{DecodeError, Result};
use crate::instrument::{CallHistory, CountCalls, MethodId, Operation};

// Re-export public types
pub use decode::Decoder;
pub use value::{Key, Value};

/// Method Identity under which [`Cache::instrumented_store`] is counted and recorded.
pub const STORE_METHOD: &str = "Cache.store";

/// `Cache::store` wrapped by the call history recorder and the call counter.
pub type InstrumentedStore = CallHistory<CountCalls<StoreOperation>>;

// == Cache ==
/// Cache facade over a shared backend.
///
/// Cloning is cheap; clones share the backend handle.
#[derive(Clone)]
pub struct Cache {
    backend: SharedBackend,
}

impl Cache {
    // == Constructor ==
    /// Creates a cache over `backend`, flushing the backend first.
    ///
    /// The flush removes every key in the backend namespace, not only keys
    /// written by earlier caches. Do not construct a cache while other
    /// operations on the same backend are in flight.
    pub async fn new(backend: SharedBackend) -> Result<Self> {
        warn!("Flushing backend namespace for new cache");
        backend.flushdb().await?;
        Ok(Self { backend })
    }

    /// Returns the shared backend handle.
    pub fn backend(&self) -> &SharedBackend {
        &self.backend
    }

    // == Store ==
    /// Stores `value` under a freshly generated key and returns the key.
    pub async fn store(&self, value: impl Into<Value>) -> Result<Key> {
        let value = value.into();
        let key = Key::generate();

        self.backend.set(&key, value.encode()).await?;
        debug!(key = %key, kind = value.kind(), "Stored value");

        Ok(key)
    }

    // == Get ==
    /// Returns the raw bytes stored under `key`, or `None` if nothing is stored.
    pub async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.backend.get(key).await
    }

    /// Returns the value under `key` decoded by `decode`.
    ///
    /// Absent keys yield `Ok(None)`; a decoder failure is returned as
    /// [`CacheError::Decode`](crate::error::CacheError::Decode).
    pub async fn get_with<T, F>(&self, key: &str, decode: F) -> Result<Option<T>>
    where
        F: FnOnce(&[u8]) -> std::result::Result<T, DecodeError>,
    {
        match self.backend.get(key).await? {
            Some(raw) => Ok(Some(decode(&raw)?)),
            None => Ok(None),
        }
    }

    /// Returns the value under `key` as UTF-8 text.
    pub async fn get_str(&self, key: &str) -> Result<Option<String>> {
        self.get_with(key, decode::utf8).await
    }

    /// Returns the value under `key` parsed as a base-10 integer.
    pub async fn get_int(&self, key: &str) -> Result<Option<i64>> {
        self.get_with(key, decode::integer).await
    }

    /// Returns the value under `key` parsed as a float.
    pub async fn get_float(&self, key: &str) -> Result<Option<f64>> {
        self.get_with(key, decode::float).await
    }

    // == Operations ==
    /// Exposes [`Cache::store`] as an [`Operation`] for wrapping.
    pub fn store_operation(&self) -> StoreOperation {
        StoreOperation {
            cache: self.clone(),
        }
    }

    /// `store`, counted and recorded under [`STORE_METHOD`].
    pub fn instrumented_store(&self) -> InstrumentedStore {
        let method = MethodId::new(STORE_METHOD);
        let counted = CountCalls::new(
            self.store_operation(),
            method.clone(),
            self.backend.clone(),
        );
        CallHistory::new(counted, method, self.backend.clone())
    }
}

impl fmt::Debug for Cache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cache").finish_non_exhaustive()
    }
}

// == Store Operation ==
/// [`Cache::store`] as an [`Operation`] taking a [`Value`] and returning its [`Key`].
#[derive(Debug, Clone)]
pub struct StoreOperation {
    cache: Cache,
}

#[async_trait]
impl Operation<Value> for StoreOperation {
    type Output = Key;

    async fn invoke(&self, input: Value) -> Result<Key> {
        self.cache.store(input).await
    }
}
