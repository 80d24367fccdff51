//! HTTP request handlers.

pub mod health;
pub mod search;

// Re-export handlers for convenience
pub use health::{health_handler, liveness_handler, readiness_handler};
pub use search::search_handler;
