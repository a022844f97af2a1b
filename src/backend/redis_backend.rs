//! Redis Backend
//!
//! Sends the [`Backend`] commands to a Redis server over a multiplexed
//! connection that reconnects on its own.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{Client, RedisError};
use tracing::{debug, info};

use crate::backend::{Backend, SharedBackend};
use crate::config::Config;
use crate::error::{CacheError, Result};

/// Backend on a Redis server.
///
/// Clones share one connection. [`rpush_atomic`](Backend::rpush_atomic)
/// runs as a `MULTI`/`EXEC` transaction, so no other client's command lands
/// between its pushes.
#[derive(Clone)]
pub struct RedisBackend {
    connection: ConnectionManager,
}

impl RedisBackend {
    /// Connects to the server at `url`, e.g. `redis://127.0.0.1:6379/0`.
    pub async fn connect(url: &str) -> Result<Self> {
        let client = Client::open(url).map_err(backend_error)?;
        let connection = client
            .get_connection_manager()
            .await
            .map_err(backend_error)?;

        info!("Connected to Redis");
        Ok(Self { connection })
    }

    /// Connects to the configured `redis_url`.
    pub async fn from_config(config: &Config) -> Result<Self> {
        Self::connect(&config.redis_url).await
    }

    /// Wraps this backend in the shared handle components are built from.
    pub fn shared(self) -> SharedBackend {
        Arc::new(self)
    }

    fn connection(&self) -> ConnectionManager {
        self.connection.clone()
    }
}

impl fmt::Debug for RedisBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisBackend").finish_non_exhaustive()
    }
}

#[async_trait]
impl Backend for RedisBackend {
    async fn set(&self, key: &str, value: Vec<u8>) -> Result<()> {
        redis::cmd("SET")
            .arg(key)
            .arg(value)
            .query_async(&mut self.connection())
            .await
            .map_err(backend_error)
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        redis::cmd("GET")
            .arg(key)
            .query_async(&mut self.connection())
            .await
            .map_err(backend_error)
    }

    async fn incr(&self, key: &str) -> Result<i64> {
        redis::cmd("INCR")
            .arg(key)
            .query_async(&mut self.connection())
            .await
            .map_err(backend_error)
    }

    async fn rpush(&self, key: &str, item: Vec<u8>) -> Result<usize> {
        redis::cmd("RPUSH")
            .arg(key)
            .arg(item)
            .query_async(&mut self.connection())
            .await
            .map_err(backend_error)
    }

    async fn rpush_atomic(&self, pushes: Vec<(String, Vec<u8>)>) -> Result<()> {
        if pushes.is_empty() {
            return Ok(());
        }

        let mut pipe = redis::pipe();
        pipe.atomic();
        for (key, item) in &pushes {
            pipe.cmd("RPUSH").arg(key).arg(item.as_slice()).ignore();
        }

        pipe.query_async(&mut self.connection())
            .await
            .map_err(backend_error)
    }

    async fn lrange(&self, key: &str, start: i64, stop: i64) -> Result<Vec<Vec<u8>>> {
        redis::cmd("LRANGE")
            .arg(key)
            .arg(start)
            .arg(stop)
            .query_async(&mut self.connection())
            .await
            .map_err(backend_error)
    }

    async fn set_ex(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<()> {
        let (command, amount) = expiry_command(ttl)?;

        redis::cmd(command)
            .arg(key)
            .arg(amount)
            .arg(value)
            .query_async(&mut self.connection())
            .await
            .map_err(backend_error)
    }

    async fn flushdb(&self) -> Result<()> {
        let () = redis::cmd("FLUSHDB")
            .query_async(&mut self.connection())
            .await
            .map_err(backend_error)?;
        debug!("FLUSHDB on Redis");
        Ok(())
    }
}

/// `SETEX` with seconds for whole-second TTLs, `PSETEX` with milliseconds
/// otherwise.
fn expiry_command(ttl: Duration) -> Result<(&'static str, u64)> {
    let millis = u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX);
    if millis == 0 {
        return Err(CacheError::InvalidRequest(
            "invalid expire time in 'setex' command".to_string(),
        ));
    }

    if ttl.subsec_millis() == 0 {
        Ok(("SETEX", ttl.as_secs()))
    } else {
        Ok(("PSETEX", millis))
    }
}

fn backend_error(err: RedisError) -> CacheError {
    CacheError::Backend(err.to_string())
}
