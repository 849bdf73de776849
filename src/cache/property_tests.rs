//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check the session cache contract over generated inputs.

use proptest::prelude::*;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::cache::{ManualClock, SessionCache};

// == Test Configuration ==
const TEST_MAX_ENTRIES: usize = 100;
const TEST_TTL: Duration = Duration::from_secs(1800);

// == Strategies ==
/// Generates session tokens
fn token_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_]{1,32}".prop_map(|s| s)
}

/// Generates cached payloads
fn value_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ]{1,64}".prop_map(|s| s)
}

/// Generates a sequence of cache operations for testing
#[derive(Debug, Clone)]
enum CacheOp {
    Set { token: String, value: String },
    Get { token: String },
    Delete { token: String },
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    // A small token alphabet so operations collide often
    let token = "[a-e]";
    prop_oneof![
        (token, value_strategy()).prop_map(|(token, value)| CacheOp::Set { token, value }),
        token.prop_map(|token| CacheOp::Get { token }),
        token.prop_map(|token| CacheOp::Delete { token }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_never_set_is_not_found(
        stored in prop::collection::hash_set(token_strategy(), 0..20),
        unknown in token_strategy()
    ) {
        prop_assume!(!stored.contains(&unknown));
        let cache = SessionCache::new(TEST_MAX_ENTRIES, TEST_TTL);

        for token in stored {
            cache.set(token, "user".to_string());
        }

        prop_assert!(cache.get(&unknown).is_none());
    }

    #[test]
    fn prop_set_then_get(token in token_strategy(), value in value_strategy()) {
        let cache = SessionCache::new(TEST_MAX_ENTRIES, TEST_TTL);

        cache.set(token.clone(), value.clone());

        prop_assert_eq!(cache.get(&token), Some(value));
    }

    #[test]
    fn prop_delete_removes_entry(token in token_strategy(), value in value_strategy()) {
        let cache = SessionCache::new(TEST_MAX_ENTRIES, TEST_TTL);

        cache.set(token.clone(), value);
        prop_assert!(cache.get(&token).is_some(), "Token should exist before delete");

        cache.delete(&token);
        prop_assert!(cache.get(&token).is_none(), "Token should not exist after delete");
    }

    #[test]
    fn prop_overwrite_semantics(
        token in token_strategy(),
        value1 in value_strategy(),
        value2 in value_strategy()
    ) {
        let cache = SessionCache::new(TEST_MAX_ENTRIES, TEST_TTL);

        cache.set(token.clone(), value1);
        cache.set(token.clone(), value2.clone());

        prop_assert_eq!(cache.get(&token), Some(value2));
        prop_assert_eq!(cache.len(), 1, "Should have exactly one entry after overwrite");
    }

    #[test]
    fn prop_clear_forgets_everything(tokens in prop::collection::vec(token_strategy(), 1..30)) {
        let cache = SessionCache::new(TEST_MAX_ENTRIES, TEST_TTL);
        for token in &tokens {
            cache.set(token.clone(), "user".to_string());
        }

        cache.clear();

        for token in &tokens {
            prop_assert!(cache.get(token).is_none());
        }
    }

    #[test]
    fn prop_capacity_enforcement(
        tokens in prop::collection::vec(token_strategy(), 1..200),
        max_size in 1usize..50
    ) {
        let cache = SessionCache::new(max_size, TEST_TTL);

        for token in tokens {
            cache.set(token.clone(), "user".to_string());
            prop_assert!(
                cache.len() <= max_size,
                "Cache size {} exceeds max {}",
                cache.len(),
                max_size
            );
            prop_assert!(cache.get(&token).is_some(), "Fresh token must be retrievable");
        }
    }

    #[test]
    fn prop_full_cache_evicts_exactly_one(
        tokens in prop::collection::hash_set(token_strategy(), 1..30),
        newcomer in token_strategy()
    ) {
        prop_assume!(!tokens.contains(&newcomer));
        let capacity = tokens.len();
        let cache = SessionCache::new(capacity, TEST_TTL);

        for token in &tokens {
            cache.set(token.clone(), "user".to_string());
        }
        prop_assert_eq!(cache.len(), capacity);

        cache.set(newcomer.clone(), "newcomer".to_string());

        prop_assert_eq!(cache.len(), capacity);
        prop_assert_eq!(cache.get(&newcomer), Some("newcomer".to_string()));
        let survivors = tokens.iter().filter(|t| cache.get(t).is_some()).count();
        prop_assert_eq!(survivors, capacity - 1);
    }

    #[test]
    fn prop_elapsed_ttl_hides_entries(
        tokens in prop::collection::hash_set(token_strategy(), 1..20),
        ttl_ms in 1u64..10_000,
        extra_ms in 0u64..10_000
    ) {
        let clock = Arc::new(ManualClock::new(1_000));
        let cache = SessionCache::with_clock(TEST_MAX_ENTRIES, Duration::from_millis(ttl_ms), clock.clone());

        for token in &tokens {
            cache.set(token.clone(), "user".to_string());
        }
        clock.advance(Duration::from_millis(ttl_ms + extra_ms));

        for token in &tokens {
            prop_assert!(cache.get(token).is_none(), "Token '{}' outlived its TTL", token);
        }
    }

    // Without capacity pressure or expiry the cache behaves like a plain map.
    #[test]
    fn prop_matches_map_model(ops in prop::collection::vec(cache_op_strategy(), 1..100)) {
        let cache = SessionCache::new(TEST_MAX_ENTRIES, TEST_TTL);
        let mut model: HashMap<String, String> = HashMap::new();
        let mut expected_hits: u64 = 0;
        let mut expected_misses: u64 = 0;

        for op in ops {
            match op {
                CacheOp::Set { token, value } => {
                    cache.set(token.clone(), value.clone());
                    model.insert(token, value);
                }
                CacheOp::Get { token } => {
                    let got = cache.get(&token);
                    prop_assert_eq!(&got, &model.get(&token).cloned());
                    if got.is_some() {
                        expected_hits += 1;
                    } else {
                        expected_misses += 1;
                    }
                }
                CacheOp::Delete { token } => {
                    cache.delete(&token);
                    model.remove(&token);
                }
            }
        }

        let stats = cache.stats();
        prop_assert_eq!(stats.hits, expected_hits, "Hits mismatch");
        prop_assert_eq!(stats.misses, expected_misses, "Misses mismatch");
        prop_assert_eq!(stats.total_entries, model.len(), "Total entries mismatch");
    }
}

// == Concurrent Operation Correctness ==
proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    // Every value observed or left behind must be one that some thread wrote
    // to that exact token.
    #[test]
    fn prop_concurrent_operation_correctness(
        per_thread in prop::collection::vec(
            prop::collection::vec(cache_op_strategy(), 10..60),
            2..8
        ),
        max_size in 2usize..6
    ) {
        let cache = SessionCache::new(max_size, TEST_TTL);

        let mut written: HashMap<String, HashSet<String>> = HashMap::new();
        for op in per_thread.iter().flatten() {
            if let CacheOp::Set { token, value } = op {
                written.entry(token.clone()).or_default().insert(value.clone());
            }
        }

        let observed: Vec<(String, String)> = thread::scope(|scope| {
            let handles: Vec<_> = per_thread
                .iter()
                .map(|ops| {
                    let cache = &cache;
                    scope.spawn(move || {
                        let mut seen = Vec::new();
                        for op in ops {
                            match op {
                                CacheOp::Set { token, value } => cache.set(token.clone(), value.clone()),
                                CacheOp::Get { token } => {
                                    if let Some(value) = cache.get(token) {
                                        seen.push((token.clone(), value));
                                    }
                                }
                                CacheOp::Delete { token } => {
                                    cache.delete(token);
                                }
                            }
                        }
                        seen
                    })
                })
                .collect();

            handles
                .into_iter()
                .flat_map(|h| h.join().expect("worker thread panicked"))
                .collect()
        });

        for (token, value) in &observed {
            let legal = written.get(token).map(|vals| vals.contains(value)).unwrap_or(false);
            prop_assert!(legal, "Read '{}' for '{}', which nobody wrote", value, token);
        }

        prop_assert!(cache.len() <= max_size, "Cache should not exceed max entries");
        for token in written.keys() {
            if let Some(value) = cache.get(token) {
                prop_assert!(written[token].contains(&value));
            }
        }
    }
}

// == Additional Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_cache_across_threads() {
        let cache = Arc::new(SessionCache::new(1_000, TEST_TTL));

        let handles: Vec<_> = (0..8)
            .map(|worker| {
                let cache = Arc::clone(&cache);
                thread::spawn(move || {
                    for i in 0..100 {
                        let token = format!("w{}-{}", worker, i);
                        cache.set(token.clone(), format!("user-{}", worker));
                        assert_eq!(cache.get(&token), Some(format!("user-{}", worker)));
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(cache.len(), 800);
        assert_eq!(cache.stats().hits, 800);
    }

    #[test]
    fn test_concurrent_cleanup_with_writers() {
        let clock = Arc::new(ManualClock::new(0));
        let cache = Arc::new(SessionCache::with_clock(50, Duration::from_millis(10), clock.clone()));

        thread::scope(|scope| {
            for worker in 0..4 {
                let cache = &cache;
                let clock = &clock;
                scope.spawn(move || {
                    for i in 0..200 {
                        cache.set(format!("{}-{}", worker, i % 20), i.to_string());
                        if i % 7 == 0 {
                            clock.advance(Duration::from_millis(3));
                        }
                    }
                });
            }
            scope.spawn(|| {
                for _ in 0..100 {
                    cache.cleanup();
                }
            });
        });

        assert!(cache.len() <= 50);
        clock.advance(Duration::from_millis(10));
        cache.cleanup();
        assert!(cache.is_empty());
    }
}
