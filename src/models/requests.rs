//! Request DTOs for the session service API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;

/// Request body for POST /auth/login
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.email.trim().is_empty() {
            return Some("Email cannot be empty".to_string());
        }
        if self.password.is_empty() {
            return Some("Password cannot be empty".to_string());
        }
        None
    }
}

/// Shortest password accepted at registration
pub const MIN_PASSWORD_LEN: usize = 8;

/// Request body for POST /auth/register
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub fullname: String,
    pub email: String,
    pub password: String,
}

impl RegisterRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.fullname.trim().is_empty()
            || self.email.trim().is_empty()
            || self.password.is_empty()
        {
            return Some("Fullname, email and password are required".to_string());
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Some(format!(
                "Password must be at least {} characters long",
                MIN_PASSWORD_LEN
            ));
        }
        if !is_valid_email(self.email.trim()) {
            return Some("Invalid email address".to_string());
        }
        None
    }
}

// Shape check only: a non-empty local part and a dotted domain.
fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    let labels: Vec<&str> = domain.split('.').collect();
    !local.is_empty()
        && labels.len() >= 2
        && labels
            .iter()
            .all(|label| !label.is_empty() && !label.contains('@'))
}
