//! Auth Store Trait
//!
//! Records persisted by the authentication store and the operations the
//! session layer needs from it.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;

// == Cached User ==
/// The user record cached per session token.
///
/// Carries no credentials, only what authenticated handlers read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedUser {
    pub id: Uuid,
    pub fullname: String,
    pub email: String,
}

// == Stored Token ==
/// A session token as persisted by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredToken {
    pub token: String,
    pub user_id: Uuid,
    pub expires_at: DateTime<Utc>,
}

impl StoredToken {
    /// Tokens stop being valid at the instant they expire.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

// == Auth Store ==
/// Persistent source of truth for tokens and users.
///
/// The session cache never calls this; request handling falls back to it on
/// a cache miss and populates the cache on success.
#[async_trait]
pub trait AuthStore: Send + Sync {
    /// Creates a user with a hashed password.
    ///
    /// Emails are unique, compared case-insensitively; a taken email is a
    /// `Conflict`.
    async fn register_user(
        &self,
        fullname: &str,
        email: &str,
        password: &str,
    ) -> Result<CachedUser>;

    /// Returns the user matching `email` if `password` is correct.
    async fn verify_credentials(&self, email: &str, password: &str) -> Result<Option<CachedUser>>;

    /// Persists a fresh token for `user_id` valid for `ttl`.
    async fn issue_token(&self, user_id: Uuid, ttl: Duration) -> Result<StoredToken>;

    /// Looks up a token, expired or not.
    async fn find_token(&self, token: &str) -> Result<Option<StoredToken>>;

    /// Looks up a user by id.
    async fn find_user(&self, user_id: Uuid) -> Result<Option<CachedUser>>;

    /// Deletes a token. Returns whether it existed.
    async fn revoke_token(&self, token: &str) -> Result<bool>;
}
