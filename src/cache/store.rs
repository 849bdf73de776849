//! Session Cache Store
//!
//! Bounded, TTL-expiring map from session token to cached user record.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use tracing::debug;

use crate::cache::stats::CacheCounters;
use crate::cache::{CacheEntry, CacheStats, Clock, SystemClock};

// == Session Cache ==
/// Concurrency-safe session cache with a fixed capacity and TTL.
///
/// Lookups share a read lock; every mutation holds the write lock for its
/// whole duration. No operation can fail: absence is `None` and capacity
/// pressure is resolved by eviction.
pub struct SessionCache<V> {
    /// Token -> entry storage
    entries: RwLock<HashMap<String, CacheEntry<V>>>,
    /// Maximum number of entries allowed
    max_size: usize,
    /// Lifetime given to every entry on insert
    ttl: Duration,
    /// Time source for all expiry checks
    clock: Arc<dyn Clock>,
    /// Performance counters
    counters: CacheCounters,
}

impl<V: Clone> SessionCache<V> {
    // == Constructor ==
    /// Creates a cache backed by the system clock.
    ///
    /// # Arguments
    /// * `max_size` - Maximum number of entries; 0 is treated as 1
    /// * `ttl` - Lifetime of each entry from the moment it is set
    pub fn new(max_size: usize, ttl: Duration) -> Self {
        Self::with_clock(max_size, ttl, Arc::new(SystemClock))
    }

    /// Creates a cache that reads time from `clock`.
    pub fn with_clock(max_size: usize, ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            max_size: max_size.max(1),
            ttl,
            clock,
            counters: CacheCounters::default(),
        }
    }

    // == Get ==
    /// Returns the cached value for `token` if it is present and live.
    ///
    /// Expired entries read as absent even before a sweep removes them.
    pub fn get(&self, token: &str) -> Option<V> {
        let now = self.clock.now_ms();
        let entries = self.read();

        match entries.get(token) {
            Some(entry) if !entry.is_expired_at(now) => {
                self.counters.record_hit();
                Some(entry.value.clone())
            }
            _ => {
                self.counters.record_miss();
                None
            }
        }
    }

    // == Set ==
    /// Stores `value` under `token` with a fresh TTL.
    ///
    /// When the cache is full, every expired entry is dropped first. If it is
    /// still full and `token` is new, one arbitrary live entry is evicted.
    /// Overwriting an existing token replaces the value and resets its TTL
    /// without evicting anything, since the entry count does not grow.
    pub fn set(&self, token: impl Into<String>, value: V) {
        let token = token.into();
        let now = self.clock.now_ms();
        let mut entries = self.write();

        if entries.len() >= self.max_size {
            let removed = Self::remove_expired(&mut entries, now);
            if removed > 0 {
                self.counters.record_expired(removed);
                debug!("Capacity sweep removed {} expired sessions", removed);
            }

            if entries.len() >= self.max_size && !entries.contains_key(&token) {
                // HashMap iteration order is unspecified; any single victim will do.
                let victim = entries.keys().next().cloned();
                if let Some(victim) = victim {
                    entries.remove(&victim);
                    self.counters.record_eviction();
                    debug!("Cache full, evicted one live session");
                }
            }
        }

        let entry = CacheEntry::new(token.clone(), value, now, self.ttl);
        entries.insert(token, entry);
    }

    // == Delete ==
    /// Removes the entry for `token`. Returns whether one was present.
    pub fn delete(&self, token: &str) -> bool {
        self.write().remove(token).is_some()
    }

    // == Clear ==
    /// Removes every entry. Returns how many were dropped.
    pub fn clear(&self) -> usize {
        let mut entries = self.write();
        let count = entries.len();
        entries.clear();
        count
    }

    // == Cleanup ==
    /// Removes all expired entries regardless of capacity pressure.
    ///
    /// Returns the number of entries removed.
    pub fn cleanup(&self) -> usize {
        let now = self.clock.now_ms();
        let removed = Self::remove_expired(&mut self.write(), now);
        self.counters.record_expired(removed);
        removed
    }

    // == Accessors ==
    /// Number of physically stored entries, expired or not.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Returns true if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Maximum number of entries.
    pub fn capacity(&self) -> usize {
        self.max_size
    }

    /// Lifetime given to each entry.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        self.counters.snapshot(self.len(), self.max_size)
    }

    fn remove_expired(entries: &mut HashMap<String, CacheEntry<V>>, now: u64) -> usize {
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired_at(now));
        before - entries.len()
    }

    // A panic while holding the lock cannot leave the map half-updated, so a
    // poisoned lock is still safe to use.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, CacheEntry<V>>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, CacheEntry<V>>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<V> fmt::Debug for SessionCache<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionCache")
            .field("max_size", &self.max_size)
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}
