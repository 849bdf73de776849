//! API Handlers
//!
//! HTTP request handlers for the authentication and cache maintenance
//! endpoints.

use std::sync::Arc;
use std::time::Duration;

use axum::{extract::State, Extension, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use tracing::{debug, info};

use super::middleware::Session;
use crate::auth::{AuthStore, CachedUser};
use crate::cache::SessionCache;
use crate::config::Config;
use crate::error::{ApiError, Result};
use crate::models::{
    HealthResponse, LoginRequest, LoginResponse, MeResponse, MessageResponse, RegisterRequest,
    RemovedResponse, StatsResponse,
};

/// Application state shared across all handlers.
///
/// Holds the process-wide session cache and the auth store behind it.
#[derive(Clone)]
pub struct AppState {
    /// Shared session cache
    pub cache: Arc<SessionCache<CachedUser>>,
    /// Source of truth consulted on cache misses
    pub store: Arc<dyn AuthStore>,
    /// Name of the session cookie
    pub cookie_name: Arc<str>,
    /// Lifetime of newly issued tokens
    pub session_ttl: Duration,
}

impl AppState {
    /// Creates a new AppState around an existing cache and store.
    pub fn new(
        cache: Arc<SessionCache<CachedUser>>,
        store: Arc<dyn AuthStore>,
        cookie_name: impl Into<String>,
        session_ttl: Duration,
    ) -> Self {
        Self {
            cache,
            store,
            cookie_name: Arc::from(cookie_name.into()),
            session_ttl,
        }
    }

    /// Creates a new AppState from configuration.
    ///
    /// Builds the session cache with the configured capacity and TTL.
    pub fn from_config(config: &Config, store: Arc<dyn AuthStore>) -> Self {
        let cache = Arc::new(SessionCache::new(config.max_entries, config.session_ttl()));
        Self::new(cache, store, config.cookie_name.clone(), config.session_ttl())
    }
}

/// Handler for POST /auth/login
///
/// Verifies credentials, issues a token, and warms the cache with the user
/// so the first authenticated request is already a hit.
pub async fn login_handler(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> Result<(CookieJar, Json<LoginResponse>)> {
    if let Some(error_msg) = req.validate() {
        return Err(ApiError::InvalidRequest(error_msg));
    }

    let user = state
        .store
        .verify_credentials(&req.email, &req.password)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid email or password".to_string()))?;

    info!("User {} logged in", user.id);
    start_session(&state, jar, user).await
}

/// Handler for POST /auth/register
///
/// Creates the account and signs it in the same way login does, so the new
/// user's first authenticated request is a cache hit.
pub async fn register_handler(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<RegisterRequest>,
) -> Result<(CookieJar, Json<LoginResponse>)> {
    if let Some(error_msg) = req.validate() {
        return Err(ApiError::InvalidRequest(error_msg));
    }

    let user = state
        .store
        .register_user(&req.fullname, &req.email, &req.password)
        .await?;

    start_session(&state, jar, user).await
}

// Issues a token, caches the user under it and sets the session cookie.
async fn start_session(
    state: &AppState,
    jar: CookieJar,
    user: CachedUser,
) -> Result<(CookieJar, Json<LoginResponse>)> {
    let token = state.store.issue_token(user.id, state.session_ttl).await?;
    state.cache.set(token.token.clone(), user.clone());

    let cookie = Cookie::build((state.cookie_name.to_string(), token.token.clone()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax);

    Ok((
        jar.add(cookie),
        Json(LoginResponse {
            token: token.token,
            expires_at: token.expires_at,
            user,
        }),
    ))
}

/// Handler for GET /auth/me
pub async fn me_handler(Extension(session): Extension<Session>) -> Json<MeResponse> {
    Json(MeResponse::new(session.user))
}

/// Handler for POST /auth/logout
///
/// Revokes the token in the store and drops it from the cache, so the cached
/// credential cannot be replayed.
pub async fn logout_handler(
    State(state): State<AppState>,
    jar: CookieJar,
    Extension(session): Extension<Session>,
) -> Result<(CookieJar, Json<MessageResponse>)> {
    if !state.store.revoke_token(&session.token).await? {
        debug!("Logout for token already gone from the store");
    }
    state.cache.delete(&session.token);
    info!("User {} logged out", session.user.id);

    let expired = Cookie::build((state.cookie_name.to_string(), "")).path("/");
    Ok((jar.remove(expired), Json(MessageResponse::new("logged out"))))
}

/// Handler for GET /admin/cache/stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(state.cache.stats().into())
}

/// Handler for POST /admin/cache/cleanup
///
/// Runs the expiry sweep immediately instead of waiting for the background task.
pub async fn cleanup_handler(State(state): State<AppState>) -> Json<RemovedResponse> {
    let removed = state.cache.cleanup();
    info!("Manual cleanup removed {} expired sessions", removed);
    Json(RemovedResponse { removed })
}

/// Handler for DELETE /admin/cache
pub async fn clear_handler(State(state): State<AppState>) -> Json<RemovedResponse> {
    let removed = state.cache.clear();
    info!("Session cache cleared ({} entries)", removed);
    Json(RemovedResponse { removed })
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
