//! Searchbox search layer
//!
//! This crate turns Algolia-style multi-query search requests into
//! parameterized PostgreSQL full-text statements and reshapes the result rows
//! into the response envelope InstantSearch clients expect.
//!
//! # Features
//!
//! - **Full-text search** over a `tsvector` column with `websearch_to_tsquery`
//! - **Facet filters**: nested `attr:value` groups with negation
//! - **Numeric filters**: `attr<op>value` comparisons merged into ranges
//! - **Facet counts and stats** computed in the same statement as the hits
//! - **Highlighting** through `ts_headline`
//! - **Facet-value search** for `searchable()` facets
//! - **Per-index allow-lists** and pagination ceilings, checked before any
//!   database call
//!
//! Enable the PostgreSQL executor with the `postgres` feature (on by default).
//!
//! # Architecture
//!
//! - [`types`] - Request, response and index configuration types
//! - [`search`] - The pure request compiler and result reshaper
//! - [`core`] - The [`SearchExecutor`] seam and the [`SearchEngine`]
//! - [`backends`] - Executor implementations
//! - [`error`] - Error types for all operations
//! - [`constants`] - Reserved column names and default limits
//!
//! # Quick Start
//!
//! ```
//! use searchbox_persistence::search::{CompiledRequest, compile};
//! use searchbox_persistence::types::{IndexConfigs, RawSearchRequest};
//! use serde_json::json;
//!
//! let configs = IndexConfigs::from_json(
//!     r#"{"settings": {"attributesForFaceting": ["brand"]}}"#,
//! )
//! .unwrap();
//!
//! let request: RawSearchRequest = serde_json::from_value(json!({
//!     "indexName": "products",
//!     "params": {"query": "phone", "facetFilters": [["brand:Acme"]], "facets": ["brand"]}
//! }))
//! .unwrap();
//!
//! let compiled = compile(&request, &configs).unwrap();
//! assert!(matches!(compiled, CompiledRequest::Search(_)));
//! assert!(compiled.plan().sql.starts_with("WITH all_selection AS"));
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod backends;
pub mod constants;
pub mod core;
pub mod error;
pub mod search;
pub mod types;

// Re-export commonly used types at crate root
pub use error::{BackendError, ConfigError, SearchboxError, SearchboxResult, ValidationIssue};
pub use types::{
    BatchPayload, IndexConfig, IndexConfigs, RawSearchRequest, SearchOutcome, SearchResponse,
};

// Re-export core traits
pub use core::{SearchEngine, SearchExecutor};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
