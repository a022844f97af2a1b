//! Expiry Sweep Task
//!
//! Reclaims keys whose TTL elapsed but that nobody reads again. Reads
//! already hide expired keys, so the sweep only bounds memory.

use std::sync::{Arc, Weak};
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::backend::Keyspace;
use crate::error::{CacheError, Result};

/// Spawns a task that sweeps `keyspace` for expired keys every `interval`.
///
/// The task only holds a weak handle: it ends on its own once every owner
/// of the keyspace is gone, or earlier if the returned handle is aborted.
///
/// ```ignore
/// let backend = MemoryBackend::default();
/// let sweep = spawn_expiry_task(&backend.keyspace(), Duration::from_secs(1))?;
/// ```
pub fn spawn_expiry_task(
    keyspace: &Arc<RwLock<Keyspace>>,
    interval: Duration,
) -> Result<JoinHandle<()>> {
    if interval.is_zero() {
        return Err(CacheError::InvalidRequest(
            "expiry sweep interval must be greater than zero".to_string(),
        ));
    }

    let keyspace = Arc::downgrade(keyspace);
    Ok(tokio::spawn(sweep(keyspace, interval)))
}

async fn sweep(keyspace: Weak<RwLock<Keyspace>>, interval: Duration) {
    let mut ticker = tokio::time::interval(interval);
    // A sweep that overran its slot is not worth catching up on
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker.tick().await;
    debug!(?interval, "Expiry sweep started");

    loop {
        ticker.tick().await;

        let Some(keyspace) = keyspace.upgrade() else {
            debug!("Keyspace dropped, stopping expiry sweep");
            return;
        };

        let (removed, remaining) = {
            let mut guard = keyspace.write().await;
            (guard.cleanup_expired(), guard.len())
        };

        if removed > 0 {
            info!(removed, remaining, "Swept expired keys");
        }
    }
}
