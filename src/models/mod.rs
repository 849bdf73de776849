//! Request and Response models for the session service API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP request and response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{LoginRequest, RegisterRequest};
pub use responses::{
    HealthResponse, LoginResponse, MeResponse, MessageResponse, RemovedResponse, StatsResponse,
};
