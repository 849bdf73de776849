//! Cache Entry Module
//!
//! Defines a single cached session with its absolute expiry.

use std::time::Duration;

use crate::cache::clock::duration_to_ms;

// == Cache Entry ==
/// A cached value keyed by the session token that authenticates it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry<V> {
    /// Session token the entry is stored under
    pub token: String,
    /// The cached record
    pub value: V,
    /// Expiration timestamp (Unix milliseconds)
    pub expires_at: u64,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates an entry that expires `ttl` after `now_ms`.
    pub fn new(token: String, value: V, now_ms: u64, ttl: Duration) -> Self {
        Self {
            token,
            value,
            expires_at: now_ms.saturating_add(duration_to_ms(ttl)),
        }
    }

    // == Is Expired ==
    /// Checks whether the entry has expired at `now_ms`.
    ///
    /// Boundary condition: the entry stops being valid at the exact
    /// millisecond of `expires_at`, so `now_ms >= expires_at` is expired.
    pub fn is_expired_at(&self, now_ms: u64) -> bool {
        now_ms >= self.expires_at
    }
}
