//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check the store's core guarantees over arbitrary
//! operation sequences.

use proptest::prelude::*;
use std::collections::HashSet;

use crate::cache::CacheStore;
use crate::config::{CacheConfig, EvictionStrategy};

// == Test Configuration ==
const TEST_MAX_ENTRIES: usize = 100;

// == Strategies ==
/// Generates cache keys
fn valid_key_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_]{1,64}".prop_map(|s| s)
}

/// Generates cache values
fn valid_value_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ]{1,256}".prop_map(|s| s)
}

fn eviction_strategy() -> impl Strategy<Value = EvictionStrategy> {
    prop_oneof![
        Just(EvictionStrategy::Lru),
        Just(EvictionStrategy::Lfu),
        Just(EvictionStrategy::Fifo),
    ]
}

/// Generates a sequence of cache operations for testing
#[derive(Debug, Clone)]
enum CacheOp {
    Set { key: String, value: String },
    Get { key: String },
    Has { key: String },
    Delete { key: String },
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        (valid_key_strategy(), valid_value_strategy())
            .prop_map(|(key, value)| CacheOp::Set { key, value }),
        valid_key_strategy().prop_map(|key| CacheOp::Get { key }),
        valid_key_strategy().prop_map(|key| CacheOp::Has { key }),
        valid_key_strategy().prop_map(|key| CacheOp::Delete { key }),
    ]
}

fn new_store(max_size: usize, strategy: EvictionStrategy) -> CacheStore<String> {
    CacheStore::new(
        CacheConfig::default()
            .with_max_size(max_size)
            .with_strategy(strategy),
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // *For any* set of keys that were never stored, GET returns nothing and
    // HAS is false.
    #[test]
    fn prop_miss_before_set(
        stored in prop::collection::vec(valid_key_strategy(), 0..20),
        lookups in prop::collection::vec(valid_key_strategy(), 1..20)
    ) {
        let mut store = new_store(TEST_MAX_ENTRIES, EvictionStrategy::Lru);
        let stored_set: HashSet<String> = stored.iter().cloned().collect();

        for key in &stored {
            store.set(key, format!("value_{}", key));
        }

        for lookup in lookups.iter().filter(|p| !stored_set.contains(*p)) {
            prop_assert!(store.get(lookup).is_none(), "Unset key '{}' returned a value", lookup);
            prop_assert!(!store.has(lookup), "Unset key '{}' reported present", lookup);
        }
    }

    // *For any* key-value pair, storing and then retrieving it (before
    // expiration) returns the exact same value.
    #[test]
    fn prop_roundtrip_storage(
        key in valid_key_strategy(),
        value in valid_value_strategy(),
        strategy in eviction_strategy()
    ) {
        let mut store = new_store(TEST_MAX_ENTRIES, strategy);

        store.set(&key, value.clone());

        let retrieved = store.get(&key);
        prop_assert_eq!(retrieved, Some(value), "Round-trip value mismatch");
    }

    // *For any* key that exists, after a DELETE a subsequent GET finds nothing.
    #[test]
    fn prop_delete_removes_entry(key in valid_key_strategy(), value in valid_value_strategy()) {
        let mut store = new_store(TEST_MAX_ENTRIES, EvictionStrategy::Lru);

        store.set(&key, value);
        prop_assert!(store.has(&key), "Key should exist before delete");

        prop_assert!(store.delete(&key), "Delete should report an existing entry");

        prop_assert!(store.get(&key).is_none(), "Key should not exist after delete");
        prop_assert!(!store.delete(&key), "Second delete should report nothing");
    }

    // *For any* key, storing V1 and then V2 under the same key returns V2 and
    // keeps a single entry.
    #[test]
    fn prop_overwrite_semantics(
        key in valid_key_strategy(),
        value1 in valid_value_strategy(),
        value2 in valid_value_strategy()
    ) {
        let mut store = new_store(TEST_MAX_ENTRIES, EvictionStrategy::Lru);

        store.set(&key, value1);
        store.set(&key, value2.clone());

        prop_assert_eq!(store.get(&key), Some(value2), "Overwrite should return new value");
        prop_assert_eq!(store.len(), 1, "Should have exactly one entry after overwrite");
    }

    // *For any* sequence of operations and any strategy, the number of
    // entries never exceeds max_size.
    #[test]
    fn prop_capacity_enforcement(
        ops in prop::collection::vec(cache_op_strategy(), 1..200),
        max_size in 1usize..20,
        strategy in eviction_strategy()
    ) {
        let mut store = new_store(max_size, strategy);

        for op in ops {
            match op {
                CacheOp::Set { key, value } => store.set(&key, value),
                CacheOp::Get { key } => {
                    let _ = store.get(&key);
                }
                CacheOp::Has { key } => {
                    let _ = store.has(&key);
                }
                CacheOp::Delete { key } => {
                    let _ = store.delete(&key);
                }
            }
            prop_assert!(
                store.stats().size <= max_size,
                "Cache size {} exceeds max_size {}",
                store.stats().size,
                max_size
            );
        }
    }

    // *For any* fill beyond capacity with FIFO, the survivors are exactly the
    // most recently inserted keys regardless of reads in between.
    #[test]
    fn prop_fifo_keeps_newest(
        keys in prop::collection::vec(valid_key_strategy(), 2..30),
        max_size in 1usize..10
    ) {
        let unique_keys: Vec<String> = {
            let mut seen = HashSet::new();
            keys.into_iter().filter(|k| seen.insert(k.clone())).collect()
        };
        let mut store = new_store(max_size, EvictionStrategy::Fifo);

        for key in &unique_keys {
            store.set(key, key.clone());
            let _ = store.get(&unique_keys[0]);
        }

        let survivors = unique_keys.len().min(max_size);
        let (evicted, kept) = unique_keys.split_at(unique_keys.len() - survivors);
        for key in kept {
            prop_assert!(store.has(key), "Recent key '{}' should survive", key);
        }
        for key in evicted {
            prop_assert!(!store.has(key), "Old key '{}' should be evicted", key);
        }
    }

    // *For any* sequence of reads, stats().total_hits equals the number of
    // successful reads of the keys still live.
    #[test]
    fn prop_hit_accounting(
        keys in prop::collection::vec(valid_key_strategy(), 1..10),
        reads in prop::collection::vec(0usize..10, 0..40)
    ) {
        let mut store = new_store(TEST_MAX_ENTRIES, EvictionStrategy::Lru);
        let unique_keys: Vec<String> = keys
            .into_iter()
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();

        for key in &unique_keys {
            store.set(key, key.clone());
        }

        let mut expected_hits = 0u64;
        for index in reads {
            if let Some(key) = unique_keys.get(index) {
                prop_assert!(store.get(key).is_some());
                expected_hits += 1;
            }
        }

        let stats = store.stats();
        prop_assert_eq!(stats.total_hits, expected_hits);
        prop_assert_eq!(stats.total_misses, unique_keys.len() as u64);
        prop_assert!(stats.hit_rate >= 0.0 && stats.hit_rate < 1.0);
    }
}
