//! Property-Based Tests for Backend Module
//!
//! Uses proptest to check the keyspace against a simple model.

use proptest::prelude::*;
use std::collections::HashMap;
use std::thread::sleep;
use std::time::Duration;

use crate::backend::Keyspace;

// == Test Configuration ==
const TEST_MAX_ENTRIES: usize = 100;
const TEST_MAX_VALUE_SIZE: usize = 1024;

// == Strategies ==
/// Generates keys from a small alphabet so operations collide
fn key_strategy() -> impl Strategy<Value = String> {
    "[a-e]{1,2}".prop_map(|s| s)
}

fn value_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..64)
}

/// A sequence of keyspace operations for testing
#[derive(Debug, Clone)]
enum KeyspaceOp {
    Set { key: String, value: Vec<u8> },
    Get { key: String },
    Incr { key: String },
}

fn keyspace_op_strategy() -> impl Strategy<Value = KeyspaceOp> {
    prop_oneof![
        (key_strategy(), value_strategy()).prop_map(|(key, value)| KeyspaceOp::Set { key, value }),
        key_strategy().prop_map(|key| KeyspaceOp::Get { key }),
        key_strategy().prop_map(|key| KeyspaceOp::Incr { key }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Hits and misses reflect exactly the reads that found or missed a key.
    #[test]
    fn prop_statistics_accuracy(ops in prop::collection::vec(keyspace_op_strategy(), 1..50)) {
        let mut keyspace = Keyspace::new(TEST_MAX_ENTRIES, TEST_MAX_VALUE_SIZE);
        let mut expected_hits: u64 = 0;
        let mut expected_misses: u64 = 0;

        for op in ops {
            match op {
                KeyspaceOp::Set { key, value } => {
                    keyspace.set(&key, value, None).unwrap();
                }
                KeyspaceOp::Get { key } => {
                    match keyspace.get(&key) {
                        Ok(Some(_)) => expected_hits += 1,
                        Ok(None) => expected_misses += 1,
                        Err(_) => {}
                    }
                }
                KeyspaceOp::Incr { key } => {
                    let _ = keyspace.incr(&key);
                }
            }
        }

        let stats = keyspace.stats();
        prop_assert_eq!(stats.hits, expected_hits, "Hits mismatch");
        prop_assert_eq!(stats.misses, expected_misses, "Misses mismatch");
        prop_assert_eq!(stats.total_keys, keyspace.len(), "Total keys mismatch");
    }

    // Storing bytes and reading them back returns the exact bytes.
    #[test]
    fn prop_roundtrip_storage(key in key_strategy(), value in value_strategy()) {
        let mut keyspace = Keyspace::new(TEST_MAX_ENTRIES, TEST_MAX_VALUE_SIZE);

        keyspace.set(&key, value.clone(), None).unwrap();

        prop_assert_eq!(keyspace.get(&key).unwrap(), Some(value), "Round-trip value mismatch");
    }

    // N increments of a fresh key read back as N.
    #[test]
    fn prop_incr_counts_exactly(key in key_strategy(), n in 1usize..200) {
        let mut keyspace = Keyspace::new(TEST_MAX_ENTRIES, TEST_MAX_VALUE_SIZE);

        let mut last = 0;
        for _ in 0..n {
            last = keyspace.incr(&key).unwrap();
        }

        prop_assert_eq!(last, n as i64);
        prop_assert_eq!(keyspace.get(&key).unwrap(), Some(n.to_string().into_bytes()));
    }

    // Lists keep arrival order and LRANGE agrees with slicing the model.
    #[test]
    fn prop_lrange_matches_model(
        items in prop::collection::vec(value_strategy(), 0..20),
        start in -25i64..25,
        stop in -25i64..25
    ) {
        let mut keyspace = Keyspace::new(TEST_MAX_ENTRIES, TEST_MAX_VALUE_SIZE);
        for item in &items {
            keyspace.rpush("list", item.clone()).unwrap();
        }

        let len = items.len() as i64;
        let from = if start < 0 { (len + start).max(0) } else { start };
        let to = if stop < 0 { len + stop } else { stop.min(len - 1) };
        let expected: Vec<Vec<u8>> = if from >= len || from > to {
            Vec::new()
        } else {
            items[from as usize..=to as usize].to_vec()
        };

        prop_assert_eq!(keyspace.lrange("list", start, stop).unwrap(), expected);
        prop_assert_eq!(keyspace.lrange("list", 0, -1).unwrap(), items);
    }

    // Paired atomic pushes always leave both lists the same length.
    #[test]
    fn prop_rpush_all_keeps_lists_paired(
        pairs in prop::collection::vec((value_strategy(), value_strategy()), 1..30)
    ) {
        let mut keyspace = Keyspace::new(TEST_MAX_ENTRIES, TEST_MAX_VALUE_SIZE);

        for (input, output) in &pairs {
            keyspace.rpush_all(vec![
                ("m:inputs".to_string(), input.clone()),
                ("m:outputs".to_string(), output.clone()),
            ]).unwrap();
        }

        let inputs = keyspace.lrange("m:inputs", 0, -1).unwrap();
        let outputs = keyspace.lrange("m:outputs", 0, -1).unwrap();
        prop_assert_eq!(inputs.len(), pairs.len());
        prop_assert_eq!(outputs.len(), pairs.len());
        for (i, (input, output)) in pairs.iter().enumerate() {
            prop_assert_eq!(&inputs[i], input);
            prop_assert_eq!(&outputs[i], output);
        }
    }

    // The keyspace never holds more than its capacity, and existing keys stay writable.
    #[test]
    fn prop_capacity_enforcement(
        entries in prop::collection::vec(("[a-z]{1,8}", value_strategy()), 1..200)
    ) {
        let max_entries = 20;
        let mut keyspace = Keyspace::new(max_entries, TEST_MAX_VALUE_SIZE);
        let mut model: HashMap<String, Vec<u8>> = HashMap::new();

        for (key, value) in entries {
            let accepted = keyspace.set(&key, value.clone(), None).is_ok();
            let expected = model.contains_key(&key) || model.len() < max_entries;
            prop_assert_eq!(accepted, expected, "Unexpected acceptance for key {}", key);
            if accepted {
                model.insert(key, value);
            }
            prop_assert!(keyspace.len() <= max_entries);
        }

        for (key, value) in model {
            prop_assert_eq!(keyspace.get(&key).unwrap(), Some(value));
        }
    }
}

// Separate proptest block with fewer cases for time-sensitive TTL tests
proptest! {
    #![proptest_config(ProptestConfig::with_cases(5))]

    // Entries stored with a TTL read back until it elapses and as absent afterwards.
    #[test]
    fn prop_ttl_expiration_behavior(key in key_strategy(), value in value_strategy()) {
        let mut keyspace = Keyspace::new(TEST_MAX_ENTRIES, TEST_MAX_VALUE_SIZE);

        keyspace.set(&key, value.clone(), Some(Duration::from_millis(200))).unwrap();

        prop_assert_eq!(keyspace.get(&key).unwrap(), Some(value), "Value should exist before expiry");

        sleep(Duration::from_millis(300));

        prop_assert_eq!(keyspace.get(&key).unwrap(), None, "Value should be absent after expiry");
    }
}
