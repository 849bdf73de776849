//! In-Memory Auth Store
//!
//! `AuthStore` backed by process memory. Users and tokens are lost on restart.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use crate::auth::{AuthStore, CachedUser, StoredToken};
use crate::error::{ApiError, Result};

#[derive(Debug, Clone)]
struct UserRecord {
    user: CachedUser,
    password_hash: String,
}

#[derive(Debug, Default)]
struct Tables {
    users: HashMap<Uuid, UserRecord>,
    /// Lowercased email -> user id
    emails: HashMap<String, Uuid>,
    tokens: HashMap<String, StoredToken>,
}

// == Memory Auth Store ==
#[derive(Debug)]
pub struct MemoryAuthStore {
    tables: RwLock<Tables>,
    bcrypt_cost: u32,
    /// Number of `find_token` calls served
    token_lookups: AtomicU64,
}

impl MemoryAuthStore {
    pub fn new(bcrypt_cost: u32) -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
            bcrypt_cost,
            token_lookups: AtomicU64::new(0),
        }
    }

    /// Stores a token as-is, including already expired ones.
    pub async fn insert_token(&self, token: StoredToken) {
        self.tables
            .write()
            .await
            .tokens
            .insert(token.token.clone(), token);
    }

    /// How many token lookups have reached the store.
    pub fn token_lookups(&self) -> u64 {
        self.token_lookups.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl AuthStore for MemoryAuthStore {
    async fn register_user(
        &self,
        fullname: &str,
        email: &str,
        password: &str,
    ) -> Result<CachedUser> {
        let fullname = fullname.trim();
        let email = email.trim().to_lowercase();
        if fullname.is_empty() || email.is_empty() || password.is_empty() {
            return Err(ApiError::InvalidRequest(
                "Fullname, email and password are required".to_string(),
            ));
        }

        let password_hash = hash_password(password.to_string(), self.bcrypt_cost).await?;

        let mut tables = self.tables.write().await;
        if tables.emails.contains_key(&email) {
            return Err(ApiError::Conflict(format!("Email '{}' is already registered", email)));
        }

        let user = CachedUser {
            id: Uuid::new_v4(),
            fullname: fullname.to_string(),
            email: email.clone(),
        };
        tables.emails.insert(email, user.id);
        tables.users.insert(
            user.id,
            UserRecord {
                user: user.clone(),
                password_hash,
            },
        );

        info!("Registered user {}", user.id);
        Ok(user)
    }

    async fn verify_credentials(&self, email: &str, password: &str) -> Result<Option<CachedUser>> {
        let record = {
            let tables = self.tables.read().await;
            let email = email.trim().to_lowercase();
            tables
                .emails
                .get(&email)
                .and_then(|id| tables.users.get(id))
                .cloned()
        };

        let Some(record) = record else {
            debug!("Login attempt for unknown email");
            return Ok(None);
        };

        if verify_password(password.to_string(), record.password_hash).await? {
            Ok(Some(record.user))
        } else {
            debug!("Login attempt with wrong password for user {}", record.user.id);
            Ok(None)
        }
    }

    async fn issue_token(&self, user_id: Uuid, ttl: Duration) -> Result<StoredToken> {
        let ttl = chrono::Duration::from_std(ttl)
            .map_err(|e| ApiError::Internal(format!("Invalid session TTL: {}", e)))?;

        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&user_id) {
            return Err(ApiError::NotFound(format!("User {}", user_id)));
        }

        let token = StoredToken {
            token: Uuid::new_v4().simple().to_string(),
            user_id,
            expires_at: Utc::now() + ttl,
        };
        tables.tokens.insert(token.token.clone(), token.clone());
        Ok(token)
    }

    async fn find_token(&self, token: &str) -> Result<Option<StoredToken>> {
        self.token_lookups.fetch_add(1, Ordering::Relaxed);
        Ok(self.tables.read().await.tokens.get(token).cloned())
    }

    async fn find_user(&self, user_id: Uuid) -> Result<Option<CachedUser>> {
        Ok(self
            .tables
            .read()
            .await
            .users
            .get(&user_id)
            .map(|record| record.user.clone()))
    }

    async fn revoke_token(&self, token: &str) -> Result<bool> {
        Ok(self.tables.write().await.tokens.remove(token).is_some())
    }
}

// bcrypt is CPU-bound, keep it off the async workers.
async fn hash_password(password: String, cost: u32) -> Result<String> {
    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|e| ApiError::Internal(format!("Password hashing task failed: {}", e)))?
        .map_err(|e| ApiError::Internal(format!("Password hashing failed: {}", e)))
}

async fn verify_password(password: String, hash: String) -> Result<bool> {
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|e| ApiError::Internal(format!("Password check task failed: {}", e)))?
        .map_err(|e| ApiError::Internal(format!("Password check failed: {}", e)))
}
