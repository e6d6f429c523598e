//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check the engine's invariants over random operation
//! sequences.

use proptest::prelude::*;
use std::collections::HashSet;

use crate::cache::CacheEngine;
use crate::config::CacheConfig;

// == Test Configuration ==
const TEST_CAPACITY: usize = 100;

// == Strategies ==
/// Generates cache keys from a small alphabet so sequences revisit keys
fn key_strategy() -> impl Strategy<Value = String> {
    "[a-h]{1,2}".prop_map(|s| s)
}

fn value_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ]{1,32}".prop_map(|s| s)
}

/// Generates a sequence of cache operations for testing
#[derive(Debug, Clone)]
enum CacheOp {
    Put { key: String, value: String },
    Get { key: String },
    Remove { key: String },
    Clear,
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        4 => (key_strategy(), value_strategy())
            .prop_map(|(key, value)| CacheOp::Put { key, value }),
        4 => key_strategy().prop_map(|key| CacheOp::Get { key }),
        2 => key_strategy().prop_map(|key| CacheOp::Remove { key }),
        1 => Just(CacheOp::Clear),
    ]
}

fn engine(capacity: usize) -> CacheEngine<String, String> {
    CacheEngine::new(CacheConfig::new(capacity)).unwrap()
}

fn apply(engine: &CacheEngine<String, String>, op: CacheOp) -> Option<bool> {
    match op {
        CacheOp::Put { key, value } => {
            engine.put(key, value).unwrap();
            None
        }
        CacheOp::Get { key } => Some(engine.get(&key).is_some()),
        CacheOp::Remove { key } => {
            engine.remove(&key).unwrap();
            None
        }
        CacheOp::Clear => {
            engine.clear();
            None
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // For any operation sequence, hits and misses match what get() returned.
    #[test]
    fn prop_statistics_accuracy(ops in prop::collection::vec(cache_op_strategy(), 1..60)) {
        let engine = engine(TEST_CAPACITY);
        let mut expected_hits: u64 = 0;
        let mut expected_misses: u64 = 0;

        for op in ops {
            match apply(&engine, op) {
                Some(true) => expected_hits += 1,
                Some(false) => expected_misses += 1,
                None => {}
            }
        }

        let stats = engine.stats();
        prop_assert_eq!(stats.hits, expected_hits, "Hits mismatch");
        prop_assert_eq!(stats.misses, expected_misses, "Misses mismatch");
        prop_assert_eq!(stats.total_entries, engine.len(), "Total entries mismatch");
    }

    // For any sequence of operations, size never exceeds capacity and the
    // expiry index tracks exactly the stored keys.
    #[test]
    fn prop_capacity_and_index_consistency(
        capacity in 1usize..8,
        ops in prop::collection::vec(cache_op_strategy(), 1..120)
    ) {
        let engine = engine(capacity);

        for op in ops {
            apply(&engine, op);
            prop_assert!(
                engine.len() <= capacity,
                "Cache size {} exceeds capacity {}",
                engine.len(),
                capacity
            );
            prop_assert!(engine.index_matches_store(), "Expiry index out of sync");
        }
    }

    // Storing then reading before any eviction returns the stored value.
    #[test]
    fn prop_overwrite_semantics(
        key in key_strategy(),
        value1 in value_strategy(),
        value2 in value_strategy()
    ) {
        let engine = engine(TEST_CAPACITY);

        engine.put(key.clone(), value1).unwrap();
        engine.put(key.clone(), value2.clone()).unwrap();

        prop_assert_eq!(engine.get(&key), Some(value2), "Overwrite should return new value");
        prop_assert_eq!(engine.len(), 1, "Should have exactly one entry after overwrite");
    }
}

// Property tests for LRU eviction behavior
proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Filling to capacity and adding one more key evicts the first-inserted key.
    #[test]
    fn prop_lru_eviction_order(
        initial_keys in prop::collection::hash_set("[a-z]{1,8}", 2..10),
        new_key in "[A-Z]{1,8}",
    ) {
        let unique_keys: Vec<String> = initial_keys.into_iter().collect();
        let capacity = unique_keys.len();
        let engine = engine(capacity);

        for key in &unique_keys {
            engine.put(key.clone(), format!("value_{}", key)).unwrap();
        }
        prop_assert_eq!(engine.len(), capacity, "Cache should be at capacity");

        engine.put(new_key.clone(), "new".to_string()).unwrap();

        let remaining: HashSet<String> = engine.get_all().into_iter().map(|(k, _)| k).collect();
        prop_assert_eq!(engine.len(), capacity, "Cache should remain at capacity after eviction");
        prop_assert!(!remaining.contains(&unique_keys[0]), "Oldest key should have been evicted");
        prop_assert!(remaining.contains(&new_key), "New key should exist after insertion");
        for key in unique_keys.iter().skip(1) {
            prop_assert!(remaining.contains(key), "Key '{}' should still exist", key);
        }
    }

    // A read promotes the key so the next eviction takes the one after it.
    #[test]
    fn prop_lru_access_tracking(
        keys in prop::collection::hash_set("[a-z]{1,8}", 3..8),
        new_key in "[A-Z]{1,8}",
    ) {
        let unique_keys: Vec<String> = keys.into_iter().collect();
        let engine = engine(unique_keys.len());

        for key in &unique_keys {
            engine.put(key.clone(), format!("value_{}", key)).unwrap();
        }

        let accessed_key = unique_keys[0].clone();
        prop_assert!(engine.get(&accessed_key).is_some());

        engine.put(new_key.clone(), "new".to_string()).unwrap();

        prop_assert!(engine.contains_key(&accessed_key), "Accessed key should not be evicted");
        prop_assert!(!engine.contains_key(&unique_keys[1]), "Second-oldest key should be evicted");
        prop_assert!(engine.contains_key(&new_key), "New key should exist");
    }

    // entries_by_frequency(n) returns min(n, len) entries, most recent first.
    #[test]
    fn prop_entries_by_frequency_bounds(
        ops in prop::collection::vec(cache_op_strategy(), 1..60),
        n in 0usize..20
    ) {
        let engine = engine(TEST_CAPACITY);
        for op in ops {
            apply(&engine, op);
        }

        let top = engine.entries_by_frequency(n);
        prop_assert_eq!(top.len(), n.min(engine.len()));

        let unique: HashSet<&String> = top.iter().map(|(k, _)| k).collect();
        prop_assert_eq!(unique.len(), top.len(), "Entries must not repeat");
    }
}
