//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - Session cleanup: sweeps expired sessions at the configured interval

mod cleanup;

pub use cleanup::spawn_cleanup_task;
