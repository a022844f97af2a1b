//! Keyspace Statistics Module
//!
//! Tracks keyspace hits, misses and expired-key removals.

use serde::Serialize;

// == Keyspace Stats ==
/// Tracks keyspace metrics, in the manner of Redis `INFO stats`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct KeyspaceStats {
    /// Number of reads that found a live key
    pub hits: u64,
    /// Number of reads that found no key (absent or expired)
    pub misses: u64,
    /// Number of keys removed because their TTL elapsed
    pub expired_keys: u64,
    /// Current number of keys in the keyspace
    pub total_keys: usize,
}

impl KeyspaceStats {
    /// Creates a new KeyspaceStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_expired(&mut self, count: usize) {
        self.expired_keys += count as u64;
    }

    pub fn set_total_keys(&mut self, count: usize) {
        self.total_keys = count;
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_new() {
        let stats = KeyspaceStats::new();
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.misses, 0);
        assert_eq!(stats.expired_keys, 0);
        assert_eq!(stats.total_keys, 0);
    }

    #[test]
    fn test_record_hits_and_misses() {
        let mut stats = KeyspaceStats::new();
        stats.record_hit();
        stats.record_hit();
        stats.record_miss();

        assert_eq!(stats.hits, 2);
        assert_eq!(stats.misses, 1);
    }

    #[test]
    fn test_record_expired() {
        let mut stats = KeyspaceStats::new();
        stats.record_expired(1);
        stats.record_expired(3);
        assert_eq!(stats.expired_keys, 4);
    }

    #[test]
    fn test_serializes_to_json() {
        let mut stats = KeyspaceStats::new();
        stats.record_hit();
        stats.set_total_keys(2);

        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["hits"], 1);
        assert_eq!(json["total_keys"], 2);
    }
}
