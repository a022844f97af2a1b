//! Configuration Module
//!
//! Handles loading cache configuration from environment variables.

use std::env;
use std::time::Duration;

/// Cache configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of keys the in-memory backend can hold
    pub max_entries: usize,
    /// Maximum size in bytes of a single stored value or list item
    pub max_value_size: usize,
    /// TTL in seconds for pages held by the fetch cache
    pub page_ttl: u64,
    /// Timeout in seconds for a single HTTP fetch
    pub fetch_timeout: u64,
    /// Interval in seconds between expiry sweeps of the in-memory backend
    pub cleanup_interval: u64,
    /// Connection URL of the Redis server used by `RedisBackend`
    pub redis_url: String,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `MAX_ENTRIES` - Maximum keys in the in-memory backend (default: 100000)
    /// - `MAX_VALUE_SIZE` - Maximum value size in bytes (default: 16 MiB)
    /// - `PAGE_TTL` - Fetch cache TTL in seconds (default: 10)
    /// - `FETCH_TIMEOUT` - HTTP fetch timeout in seconds (default: 30)
    /// - `CLEANUP_INTERVAL` - Expiry sweep frequency in seconds (default: 1)
    /// - `REDIS_URL` - Redis server URL (default: redis://127.0.0.1:6379)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_entries: env_or("MAX_ENTRIES", defaults.max_entries),
            max_value_size: env_or("MAX_VALUE_SIZE", defaults.max_value_size),
            page_ttl: env_or("PAGE_TTL", defaults.page_ttl),
            fetch_timeout: env_or("FETCH_TIMEOUT", defaults.fetch_timeout),
            cleanup_interval: env_or("CLEANUP_INTERVAL", defaults.cleanup_interval),
            redis_url: env_or("REDIS_URL", defaults.redis_url),
        }
    }

    /// Page TTL as a `Duration`.
    pub fn page_ttl(&self) -> Duration {
        Duration::from_secs(self.page_ttl)
    }

    /// Fetch timeout as a `Duration`.
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout)
    }

    /// Cleanup interval as a `Duration`.
    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_entries: 100_000,
            max_value_size: 16 * 1024 * 1024,
            page_ttl: 10,
            fetch_timeout: 30,
            cleanup_interval: 1,
            redis_url: "redis://127.0.0.1:6379".to_string(),
        }
    }
}

fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
