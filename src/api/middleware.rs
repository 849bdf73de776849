//! Session Middleware
//!
//! Resolves the request's session token to a user, reading through the
//! session cache to the auth store on a miss.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::{
    extract::CookieJar,
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use chrono::Utc;
use tracing::debug;

use super::handlers::AppState;
use crate::auth::CachedUser;
use crate::error::{ApiError, Result};

/// The authenticated session attached to a request's extensions.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub user: CachedUser,
}

/// Picks the session token from the cookie, falling back to a bearer header.
pub fn session_token(
    jar: &CookieJar,
    bearer: Option<&Authorization<Bearer>>,
    cookie_name: &str,
) -> Option<String> {
    jar.get(cookie_name)
        .map(|cookie| cookie.value().to_string())
        .filter(|token| !token.is_empty())
        .or_else(|| bearer.map(|auth| auth.token().to_string()))
        .filter(|token| !token.is_empty())
}

/// Rejects requests without a live session and attaches `Session` otherwise.
pub async fn require_session(
    State(state): State<AppState>,
    jar: CookieJar,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut request: Request,
    next: Next,
) -> Result<Response> {
    let token = session_token(&jar, bearer.as_ref().map(|h| &h.0), &state.cookie_name)
        .ok_or_else(|| ApiError::Unauthorized("No auth token provided".to_string()))?;

    let user = resolve_session(&state, &token).await?;
    request.extensions_mut().insert(Session { token, user });

    Ok(next.run(request).await)
}

/// Maps a token to its user: cache first, then the auth store.
///
/// A store hit for a live token populates the cache so the next request
/// skips the store entirely. The cached user lives for the full cache TTL
/// whatever the stored token has left, so a token can keep authenticating
/// for up to one cache TTL past its store `expires_at`.
pub async fn resolve_session(state: &AppState, token: &str) -> Result<CachedUser> {
    if let Some(user) = state.cache.get(token) {
        return Ok(user);
    }

    let stored = state
        .store
        .find_token(token)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid auth token".to_string()))?;

    if stored.is_expired_at(Utc::now()) {
        debug!("Rejected expired token for user {}", stored.user_id);
        return Err(ApiError::Unauthorized("Auth token expired".to_string()));
    }

    let user = state
        .store
        .find_user(stored.user_id)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Unknown user".to_string()))?;

    state.cache.set(token, user.clone());
    Ok(user)
}
