//! API Routes
//!
//! Configures the Axum router with the session service endpoints.

use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    cleanup_handler, clear_handler, health_handler, login_handler, logout_handler, me_handler,
    register_handler, stats_handler, AppState,
};
use super::middleware::require_session;

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `POST /auth/register` - Create an account and start its session
/// - `POST /auth/login` - Exchange credentials for a session token
/// - `GET /auth/me` - Current session's user (authenticated)
/// - `POST /auth/logout` - Revoke the current session (authenticated)
/// - `GET /admin/cache/stats` - Session cache statistics (authenticated)
/// - `POST /admin/cache/cleanup` - Sweep expired sessions now (authenticated)
/// - `DELETE /admin/cache` - Drop every cached session (authenticated)
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - Session: cache-first token resolution on authenticated routes
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let authenticated = Router::new()
        .route("/auth/me", get(me_handler))
        .route("/auth/logout", post(logout_handler))
        .route("/admin/cache/stats", get(stats_handler))
        .route("/admin/cache/cleanup", post(cleanup_handler))
        .route("/admin/cache", delete(clear_handler))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_session,
        ));

    Router::new()
        .route("/auth/register", post(register_handler))
        .route("/auth/login", post(login_handler))
        .route("/health", get(health_handler))
        .merge(authenticated)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
