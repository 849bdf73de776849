//! API Module
//!
//! HTTP handlers, session middleware, and routing for the session service.
//!
//! # Endpoints
//! - `POST /auth/register` - Create an account and start its session
//! - `POST /auth/login` - Exchange credentials for a session token
//! - `GET /auth/me` - Current session's user
//! - `POST /auth/logout` - Revoke the current session
//! - `GET /admin/cache/stats` - Session cache statistics
//! - `POST /admin/cache/cleanup` - Sweep expired sessions
//! - `DELETE /admin/cache` - Clear the session cache
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod middleware;
pub mod routes;

pub use handlers::*;
pub use middleware::{require_session, resolve_session, Session};
pub use routes::create_router;
