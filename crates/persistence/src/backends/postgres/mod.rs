//! PostgreSQL executor.
//!
//! Compiled statements run through a deadpool-postgres pool. Every pooled
//! connection carries the configured `statement_timeout`. Search statements
//! return one JSON column; facet-value searches return `value`, `count` and
//! `highlighted` rows.
//!
//! # Example
//!
//! ```no_run
//! use searchbox_persistence::backends::postgres::{PostgresConfig, PostgresExecutor};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = PostgresConfig::from_connection_string("postgres://postgres@localhost/shop")?;
//! let executor = PostgresExecutor::connect(config).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Searchable tables
//!
//! A table is searchable when it carries a `tsvector` column named
//! `postgres_searchbox_v1_doc`:
//!
//! ```sql
//! ALTER TABLE products
//!     ADD COLUMN postgres_searchbox_v1_doc tsvector
//!     GENERATED ALWAYS AS (to_tsvector('english', coalesce(name, ''))) STORED;
//! CREATE INDEX ON products USING gin (postgres_searchbox_v1_doc);
//! ```

mod backend;
mod executor;

pub use backend::{PostgresConfig, PostgresExecutor, PostgresSslMode};
