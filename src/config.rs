//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of sessions the cache can hold
    pub max_entries: usize,
    /// Session lifetime in seconds, for both cached entries and issued tokens
    pub session_ttl: u64,
    /// Background cleanup task interval in seconds
    pub cleanup_interval: u64,
    /// HTTP server port
    pub server_port: u16,
    /// Name of the cookie carrying the session token
    pub cookie_name: String,
    /// bcrypt work factor for stored passwords
    pub bcrypt_cost: u32,
    /// Optional user seeded at startup
    pub admin: Option<AdminSeed>,
}

/// Credentials for the user created at startup.
#[derive(Clone)]
pub struct AdminSeed {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for AdminSeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminSeed")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `MAX_ENTRIES` - Maximum cached sessions (default: 100, must be > 0)
    /// - `SESSION_TTL` - Session lifetime in seconds (default: 1800)
    /// - `CLEANUP_INTERVAL` - Cleanup frequency in seconds (default: 600, must be > 0)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `SESSION_COOKIE` - Session cookie name (default: session_token)
    /// - `BCRYPT_COST` - Password hashing cost (default: bcrypt::DEFAULT_COST)
    /// - `ADMIN_EMAIL` / `ADMIN_PASSWORD` - Seed user, both required
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let admin = match (env::var("ADMIN_EMAIL"), env::var("ADMIN_PASSWORD")) {
            (Ok(email), Ok(password)) if !email.is_empty() && !password.is_empty() => {
                Some(AdminSeed { email, password })
            }
            _ => None,
        };

        Self {
            max_entries: positive_var("MAX_ENTRIES").unwrap_or(defaults.max_entries),
            session_ttl: parse_var("SESSION_TTL").unwrap_or(defaults.session_ttl),
            cleanup_interval: positive_var("CLEANUP_INTERVAL")
                .unwrap_or(defaults.cleanup_interval),
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
            cookie_name: env::var("SESSION_COOKIE")
                .ok()
                .filter(|v| !v.is_empty())
                .unwrap_or(defaults.cookie_name),
            bcrypt_cost: parse_var("BCRYPT_COST").unwrap_or(defaults.bcrypt_cost),
            admin,
        }
    }

    /// Session lifetime as a Duration.
    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl)
    }

    /// Cleanup period as a Duration.
    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_entries: 100,
            session_ttl: 30 * 60,
            cleanup_interval: 10 * 60,
            server_port: 3000,
            cookie_name: "session_token".to_string(),
            bcrypt_cost: bcrypt::DEFAULT_COST,
            admin: None,
        }
    }
}

fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

fn positive_var<T: FromStr + Default + PartialEq>(name: &str) -> Option<T> {
    parse_var(name).filter(|v: &T| *v != T::default())
}
