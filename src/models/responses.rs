//! Response DTOs for the session service API
//!
//! Defines the structure of outgoing HTTP response bodies.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::auth::CachedUser;
use crate::cache::CacheStats;

/// Response body for POST /auth/login
#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    /// Session token, also set as a cookie
    pub token: String,
    /// When the token stops being accepted
    pub expires_at: DateTime<Utc>,
    pub user: CachedUser,
}

/// Response body for GET /auth/me
#[derive(Debug, Clone, Serialize)]
pub struct MeResponse {
    pub success: bool,
    pub user: CachedUser,
}

impl MeResponse {
    pub fn new(user: CachedUser) -> Self {
        Self {
            success: true,
            user,
        }
    }
}

/// Generic confirmation body
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Response body for cache maintenance endpoints
#[derive(Debug, Clone, Serialize)]
pub struct RemovedResponse {
    /// Number of sessions dropped from the cache
    pub removed: usize,
}

/// Response body for GET /admin/cache/stats
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub expired_removed: u64,
    pub total_entries: usize,
    pub capacity: usize,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl From<CacheStats> for StatsResponse {
    fn from(stats: CacheStats) -> Self {
        Self {
            hit_rate: stats.hit_rate(),
            hits: stats.hits,
            misses: stats.misses,
            evictions: stats.evictions,
            expired_removed: stats.expired_removed,
            total_entries: stats.total_entries,
            capacity: stats.capacity,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}
