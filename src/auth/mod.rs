//! Authentication Store Module
//!
//! Boundary to the persistent token/user store consulted on cache misses,
//! plus an in-memory implementation.

mod memory;
mod store;

pub use memory::MemoryAuthStore;
pub use store::{AuthStore, CachedUser, StoredToken};
