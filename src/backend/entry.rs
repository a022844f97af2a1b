//! Keyspace Entry Module
//!
//! Defines the structure for individual keyspace entries with TTL support.

use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::error::{CacheError, Result};

// == Slot ==
/// The value held under a key: a plain byte string or a list of byte strings.
#[derive(Debug, Clone, PartialEq)]
pub enum Slot {
    Bytes(Vec<u8>),
    List(Vec<Vec<u8>>),
}

impl Slot {
    /// Mutable access to the list items, if this slot holds a list.
    pub fn list_mut(&mut self) -> Option<&mut Vec<Vec<u8>>> {
        match self {
            Slot::List(items) => Some(items),
            Slot::Bytes(_) => None,
        }
    }

    /// Returns true if this slot holds a list.
    pub fn is_list(&self) -> bool {
        matches!(self, Slot::List(_))
    }
}

// == Entry ==
/// Represents a single keyspace entry with value and metadata.
#[derive(Debug, Clone)]
pub struct Entry {
    /// The stored value
    pub value: Slot,
    /// Expiration timestamp, None = no expiration
    pub expires_at: Option<DateTime<Utc>>,
}

impl Entry {
    // == Constructors ==
    /// Creates an entry that never expires.
    pub fn new(value: Slot) -> Self {
        Self {
            value,
            expires_at: None,
        }
    }

    /// Creates an entry that expires once `ttl` has elapsed.
    ///
    /// A zero TTL is rejected, as Redis does for `SETEX`.
    pub fn with_ttl(value: Slot, ttl: Duration) -> Result<Self> {
        if ttl.is_zero() {
            return Err(CacheError::InvalidRequest(
                "invalid expire time in 'setex' command".to_string(),
            ));
        }

        let expires_at = chrono::Duration::from_std(ttl)
            .ok()
            .and_then(|delta| Utc::now().checked_add_signed(delta))
            .ok_or_else(|| {
                CacheError::InvalidRequest(format!("TTL of {:?} is out of range", ttl))
            })?;

        Ok(Self {
            value,
            expires_at: Some(expires_at),
        })
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// An entry is expired once the current time is greater than or equal to
    /// the expiration time.
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires) => Utc::now() >= expires,
            None => false,
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    fn bytes(value: &str) -> Slot {
        Slot::Bytes(value.as_bytes().to_vec())
    }

    #[test]
    fn test_entry_creation_no_ttl() {
        let entry = Entry::new(bytes("test_value"));

        assert_eq!(entry.value, bytes("test_value"));
        assert!(entry.expires_at.is_none());
        assert!(!entry.is_expired());
    }

    #[test]
    fn test_entry_creation_with_ttl() {
        let entry = Entry::with_ttl(bytes("test_value"), Duration::from_secs(60)).unwrap();

        assert!(entry.expires_at.is_some());
        assert!(entry.expires_at.unwrap() > Utc::now());
        assert!(!entry.is_expired());
    }

    #[test]
    fn test_entry_zero_ttl_rejected() {
        let result = Entry::with_ttl(bytes("test_value"), Duration::ZERO);
        assert!(matches!(result, Err(CacheError::InvalidRequest(_))));
    }

    #[test]
    fn test_entry_expiration() {
        let entry = Entry::with_ttl(bytes("test_value"), Duration::from_millis(200)).unwrap();

        assert!(!entry.is_expired());

        sleep(Duration::from_millis(300));

        assert!(entry.is_expired());
    }

    #[test]
    fn test_entry_ttl_out_of_range() {
        let result = Entry::with_ttl(bytes("test_value"), Duration::MAX);
        assert!(matches!(result, Err(CacheError::InvalidRequest(_))));
    }

    #[test]
    fn test_expiration_boundary_condition() {
        let now = Utc::now();
        let entry = Entry {
            value: bytes("test"),
            expires_at: Some(now),
        };

        assert!(entry.is_expired(), "Entry should be expired at boundary");
    }

    #[test]
    fn test_slot_list_access() {
        let mut list = Slot::List(vec![b"a".to_vec()]);
        assert!(list.is_list());
        list.list_mut().unwrap().push(b"b".to_vec());
        assert_eq!(list, Slot::List(vec![b"a".to_vec(), b"b".to_vec()]));

        let mut plain = bytes("x");
        assert!(!plain.is_list());
        assert!(plain.list_mut().is_none());
    }
}
