//! Property-Based Tests for Cache Module

use proptest::prelude::*;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use crate::cache::{TtlCache, TtlStore};

// == Test Configuration ==
const TEST_DEFAULT_TTL: Duration = Duration::from_secs(300);

// == Strategies ==
/// Generates cache keys
fn key_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_]{1,16}".prop_map(|s| s)
}

/// Generates cache values
fn value_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ]{1,64}".prop_map(|s| s)
}

/// A sequence of cache operations for testing
#[derive(Debug, Clone)]
enum CacheOp {
    Set { key: String, value: String },
    SetExpired { key: String, value: String },
    Read { key: String },
    Peek { key: String },
    Delete { key: String },
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        (key_strategy(), value_strategy()).prop_map(|(key, value)| CacheOp::Set { key, value }),
        (key_strategy(), value_strategy())
            .prop_map(|(key, value)| CacheOp::SetExpired { key, value }),
        key_strategy().prop_map(|key| CacheOp::Read { key }),
        key_strategy().prop_map(|key| CacheOp::Peek { key }),
        key_strategy().prop_map(|key| CacheOp::Delete { key }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // For any sequence of operations the store agrees with a model where
    // zero-TTL writes are stored but never visible.
    #[test]
    fn prop_store_matches_model(ops in prop::collection::vec(cache_op_strategy(), 1..60)) {
        let mut store = TtlStore::new(TEST_DEFAULT_TTL);
        // key -> Some(value) when live, None when stored but expired
        let mut model: HashMap<String, Option<String>> = HashMap::new();
        let mut expected_hits: u64 = 0;
        let mut expected_misses: u64 = 0;

        for op in ops {
            match op {
                CacheOp::Set { key, value } => {
                    store.set(key.clone(), value.clone());
                    model.insert(key, Some(value));
                }
                CacheOp::SetExpired { key, value } => {
                    store.set_with_ttl(key.clone(), value, Duration::ZERO);
                    model.insert(key, None);
                }
                CacheOp::Read { key } => {
                    let expected = model.get(&key).cloned().flatten();
                    if expected.is_some() { expected_hits += 1 } else { expected_misses += 1 }
                    prop_assert_eq!(store.get_and_touch(&key), expected);
                }
                CacheOp::Peek { key } => {
                    let expected = model.get(&key).cloned().flatten();
                    if expected.is_some() { expected_hits += 1 } else { expected_misses += 1 }
                    prop_assert_eq!(store.peek(&key), expected);
                }
                CacheOp::Delete { key } => {
                    prop_assert_eq!(store.delete(&key), model.remove(&key).is_some());
                }
            }
        }

        let stats = store.stats();
        prop_assert_eq!(stats.hits, expected_hits, "Hits mismatch");
        prop_assert_eq!(stats.misses, expected_misses, "Misses mismatch");
        prop_assert_eq!(store.len(), model.len(), "Expired entries still count until swept");

        let expired = model.values().filter(|v| v.is_none()).count();
        prop_assert_eq!(store.purge_expired(), expired);
        prop_assert_eq!(store.len(), model.len() - expired);
    }

    // Storing a pair and reading it back before expiry returns the same value.
    #[test]
    fn prop_roundtrip_storage(key in key_strategy(), value in value_strategy()) {
        let mut store = TtlStore::new(TEST_DEFAULT_TTL);

        store.set(key.clone(), value.clone());

        prop_assert_eq!(store.get_and_touch(&key), Some(value));
    }

    // After a delete, the key is gone no matter how long its TTL was.
    #[test]
    fn prop_delete_removes_entry(key in key_strategy(), value in value_strategy()) {
        let mut store = TtlStore::new(TEST_DEFAULT_TTL);

        store.set_with_ttl(key.clone(), value, Duration::from_secs(3600));
        prop_assert!(store.contains_key(&key));

        store.delete(&key);

        prop_assert_eq!(store.get_and_touch(&key), None);
        prop_assert!(store.is_empty());
    }

    // The last write wins and leaves a single entry.
    #[test]
    fn prop_overwrite_semantics(
        key in key_strategy(),
        value1 in value_strategy(),
        value2 in value_strategy()
    ) {
        let mut store = TtlStore::new(TEST_DEFAULT_TTL);

        store.set(key.clone(), value1);
        store.set(key.clone(), value2.clone());

        prop_assert_eq!(store.get_and_touch(&key), Some(value2));
        prop_assert_eq!(store.len(), 1, "Should have exactly one entry after overwrite");
    }

    // Count equals the number of distinct keys written.
    #[test]
    fn prop_count_is_distinct_keys(keys in prop::collection::vec(key_strategy(), 0..100)) {
        let mut store = TtlStore::new(TEST_DEFAULT_TTL);
        for key in &keys {
            store.set(key.clone(), 0u8);
        }

        let distinct: HashSet<&String> = keys.iter().collect();
        prop_assert_eq!(store.len(), distinct.len());
    }
}

// Concurrent writers and readers through the shared cache handle
proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    #[test]
    fn prop_concurrent_writers_lose_nothing(
        keys in prop::collection::hash_set(key_strategy(), 1..64),
        writers in 1usize..8
    ) {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let _guard = rt.enter();

        let cache = Arc::new(TtlCache::new(TEST_DEFAULT_TTL));
        let keys: Vec<String> = keys.into_iter().collect();

        std::thread::scope(|scope| {
            for chunk in keys.chunks(keys.len().div_ceil(writers)) {
                let cache = Arc::clone(&cache);
                scope.spawn(move || {
                    for key in chunk {
                        cache.set(key.as_str(), format!("value_{}", key));
                    }
                });
            }
            for _ in 0..writers {
                let cache = Arc::clone(&cache);
                let keys = &keys;
                scope.spawn(move || {
                    for key in keys {
                        // Either not written yet or fully written
                        if let Some(value) = cache.read(key) {
                            assert_eq!(value, format!("value_{}", key));
                        }
                    }
                });
            }
        });

        prop_assert_eq!(cache.count(), keys.len());
        for key in &keys {
            prop_assert_eq!(cache.peek(key), Some(format!("value_{}", key)));
        }
    }
}
