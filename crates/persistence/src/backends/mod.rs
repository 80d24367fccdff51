//! Database executors.
//!
//! Each executor is gated behind a feature flag.
//!
//! | Backend | Feature | Description |
//! |---------|---------|-------------|
//! | PostgreSQL | `postgres` | Full-text search over `tsvector` columns |

#[cfg(feature = "postgres")]
pub mod postgres;
