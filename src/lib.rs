//! Session Cache - bounded TTL session cache with a read-through auth service
//!
//! Maps opaque session tokens to cached user records so authenticated
//! requests skip the auth store until the session expires.

pub mod api;
pub mod auth;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use cache::SessionCache;
pub use config::Config;
pub use tasks::spawn_cleanup_task;
