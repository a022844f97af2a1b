//! Keyspace Module
//!
//! Synchronous Redis-like keyspace: byte strings, lists, counters and TTL
//! expiration. Wrapped by [`MemoryBackend`](super::MemoryBackend) for shared
//! async access.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use crate::backend::{Entry, KeyspaceStats, Slot};
use crate::error::{CacheError, Result};

const WRONG_TYPE: &str = "WRONGTYPE Operation against a key holding the wrong kind of value";
const NOT_AN_INTEGER: &str = "ERR value is not an integer or out of range";

// == Keyspace ==
/// Key-value storage with lazy and active TTL expiration.
///
/// Full keyspaces reject new keys instead of evicting old ones, so counters
/// and history lists are never dropped behind a caller's back.
#[derive(Debug)]
pub struct Keyspace {
    /// Key-value storage
    entries: HashMap<String, Entry>,
    /// Hit/miss/expiry statistics
    stats: KeyspaceStats,
    /// Maximum number of keys allowed
    max_entries: usize,
    /// Maximum size of a single value or list item
    max_value_size: usize,
}

impl Keyspace {
    // == Constructor ==
    /// Creates a new Keyspace with the given capacity and value size limit.
    pub fn new(max_entries: usize, max_value_size: usize) -> Self {
        Self {
            entries: HashMap::new(),
            stats: KeyspaceStats::new(),
            max_entries,
            max_value_size,
        }
    }

    // == Set ==
    /// Stores a byte string, replacing any previous value and TTL.
    ///
    /// # Arguments
    /// * `key` - The key to store
    /// * `value` - The bytes to store
    /// * `ttl` - Optional time-to-live; `None` keeps the key until flushed
    pub fn set(&mut self, key: &str, value: Vec<u8>, ttl: Option<Duration>) -> Result<()> {
        self.check_value_size(value.len())?;

        if self.live_entry(key).is_none() {
            self.ensure_capacity(1)?;
        }

        let entry = match ttl {
            Some(ttl) => Entry::with_ttl(Slot::Bytes(value), ttl)?,
            None => Entry::new(Slot::Bytes(value)),
        };
        self.entries.insert(key.to_string(), entry);
        self.stats.set_total_keys(self.entries.len());

        Ok(())
    }

    // == Get ==
    /// Retrieves a byte string by key.
    ///
    /// Absent and expired keys yield `Ok(None)`; expired entries are removed.
    pub fn get(&mut self, key: &str) -> Result<Option<Vec<u8>>> {
        let value = match self.live_entry(key) {
            Some(entry) => match &entry.value {
                Slot::Bytes(bytes) => Some(bytes.clone()),
                Slot::List(_) => return Err(wrong_type()),
            },
            None => None,
        };

        if value.is_some() {
            self.stats.record_hit();
        } else {
            self.stats.record_miss();
        }
        self.stats.set_total_keys(self.entries.len());

        Ok(value)
    }

    // == Incr ==
    /// Increments the integer stored at `key`, creating it at zero first.
    ///
    /// The TTL of an existing key is preserved.
    pub fn incr(&mut self, key: &str) -> Result<i64> {
        let current = match self.live_entry(key) {
            Some(entry) => Some(counter_value(&entry.value)?),
            None => None,
        };

        if current.is_none() {
            self.ensure_capacity(1)?;
        }

        let next = current
            .unwrap_or(0)
            .checked_add(1)
            .ok_or_else(|| CacheError::Backend("ERR increment would overflow".to_string()))?;

        let entry = self
            .entries
            .entry(key.to_string())
            .or_insert_with(|| Entry::new(Slot::Bytes(Vec::new())));
        entry.value = Slot::Bytes(next.to_string().into_bytes());
        self.stats.set_total_keys(self.entries.len());

        Ok(next)
    }

    // == RPush ==
    /// Appends an item to the list at `key`, creating the list if needed.
    ///
    /// Returns the length of the list after the push.
    pub fn rpush(&mut self, key: &str, item: Vec<u8>) -> Result<usize> {
        self.check_value_size(item.len())?;

        match self.list_kind(key) {
            Some(true) => {}
            Some(false) => return Err(wrong_type()),
            None => self.ensure_capacity(1)?,
        }

        let len = self.push_unchecked(key, item)?;
        self.stats.set_total_keys(self.entries.len());
        Ok(len)
    }

    // == RPush All ==
    /// Appends every item to its list as one unit.
    ///
    /// All pushes are validated before any is applied, so either every list
    /// grows or none does.
    pub fn rpush_all(&mut self, pushes: Vec<(String, Vec<u8>)>) -> Result<()> {
        let new_keys = {
            let mut new_keys = HashSet::new();
            for (key, item) in &pushes {
                self.check_value_size(item.len())?;
                match self.list_kind(key) {
                    Some(true) => {}
                    Some(false) => return Err(wrong_type()),
                    None => {
                        new_keys.insert(key.as_str());
                    }
                }
            }
            new_keys.len()
        };

        if new_keys > 0 {
            self.ensure_capacity(new_keys)?;
        }

        for (key, item) in pushes {
            self.push_unchecked(&key, item)?;
        }
        self.stats.set_total_keys(self.entries.len());

        Ok(())
    }

    // == LRange ==
    /// Returns the list items between `start` and `stop`, both inclusive.
    ///
    /// Negative indices count from the end of the list (`-1` is the last
    /// item). Out-of-range bounds are clamped; a missing key is an empty list.
    pub fn lrange(&mut self, key: &str, start: i64, stop: i64) -> Result<Vec<Vec<u8>>> {
        let items = match self.live_entry(key) {
            Some(entry) => match &entry.value {
                Slot::List(items) => items,
                Slot::Bytes(_) => return Err(wrong_type()),
            },
            None => return Ok(Vec::new()),
        };

        Ok(match range_bounds(items.len(), start, stop) {
            Some((from, to)) => items[from..=to].to_vec(),
            None => Vec::new(),
        })
    }

    // == Flush ==
    /// Removes every key. Returns the number of keys removed.
    pub fn flush(&mut self) -> usize {
        let count = self.entries.len();
        self.entries.clear();
        self.stats.set_total_keys(0);
        count
    }

    // == Stats ==
    /// Returns current keyspace statistics.
    pub fn stats(&self) -> KeyspaceStats {
        let mut stats = self.stats.clone();
        stats.set_total_keys(self.entries.len());
        stats
    }

    // == Cleanup Expired ==
    /// Removes all expired entries from the keyspace.
    ///
    /// Returns the number of entries removed.
    pub fn cleanup_expired(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired());
        let count = before - self.entries.len();

        self.stats.record_expired(count);
        self.stats.set_total_keys(self.entries.len());
        count
    }

    // == Length ==
    /// Returns the current number of keys, including not-yet-swept expired ones.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    /// Returns true if the keyspace holds no keys.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Looks up a key, removing it first if its TTL has elapsed.
    fn live_entry(&mut self, key: &str) -> Option<&mut Entry> {
        if self.entries.get(key).is_some_and(Entry::is_expired) {
            self.entries.remove(key);
            self.stats.record_expired(1);
        }
        self.entries.get_mut(key)
    }

    /// `Some(true)` for a list, `Some(false)` for a byte string, `None` if absent.
    fn list_kind(&mut self, key: &str) -> Option<bool> {
        self.live_entry(key).map(|entry| entry.value.is_list())
    }

    fn push_unchecked(&mut self, key: &str, item: Vec<u8>) -> Result<usize> {
        let entry = self
            .entries
            .entry(key.to_string())
            .or_insert_with(|| Entry::new(Slot::List(Vec::new())));

        let items = entry.value.list_mut().ok_or_else(wrong_type)?;
        items.push(item);
        Ok(items.len())
    }

    fn check_value_size(&self, len: usize) -> Result<()> {
        if len > self.max_value_size {
            return Err(CacheError::InvalidRequest(format!(
                "Value exceeds maximum size of {} bytes",
                self.max_value_size
            )));
        }
        Ok(())
    }

    /// Expired keys that nobody has read or swept yet are reclaimed before a
    /// write is refused.
    fn ensure_capacity(&mut self, new_keys: usize) -> Result<()> {
        if self.entries.len() + new_keys > self.max_entries {
            self.cleanup_expired();
        }
        if self.entries.len() + new_keys > self.max_entries {
            return Err(CacheError::Backend(format!(
                "OOM keyspace is full ({} keys) and eviction is disabled",
                self.max_entries
            )));
        }
        Ok(())
    }
}

fn wrong_type() -> CacheError {
    CacheError::Backend(WRONG_TYPE.to_string())
}

fn counter_value(slot: &Slot) -> Result<i64> {
    match slot {
        Slot::Bytes(bytes) => std::str::from_utf8(bytes)
            .ok()
            .and_then(|text| text.parse().ok())
            .ok_or_else(|| CacheError::Backend(NOT_AN_INTEGER.to_string())),
        Slot::List(_) => Err(wrong_type()),
    }
}

/// Resolves Redis-style inclusive list bounds against a list of `len` items.
fn range_bounds(len: usize, start: i64, stop: i64) -> Option<(usize, usize)> {
    let len = len as i64;
    let start = if start < 0 { (len + start).max(0) } else { start };
    let stop = if stop < 0 { len + stop } else { stop.min(len - 1) };

    if start >= len || start > stop {
        return None;
    }
    Some((start as usize, stop as usize))
}
