//! The request compiler and result reshaper.
//!
//! Leaves first: [`numeric`] and [`facet_tree`] parse filter grammars,
//! [`ranges`] merges numeric comparisons, [`filters`], [`facets`],
//! [`highlight`], [`pagination`], [`sort`] and [`columns`] emit fragments
//! through the escaping helpers in [`sql`], [`validation`] checks the request
//! against its index configuration, [`compiler`] assembles the statement and
//! [`reshaper`] builds the client envelope from the engine's JSON row.

pub mod columns;
pub mod compiler;
pub mod facet_tree;
pub mod facets;
pub mod filters;
pub mod highlight;
pub mod numeric;
pub mod pagination;
pub mod ranges;
pub mod reshaper;
pub mod sort;
pub mod sql;
pub mod validation;

pub use compiler::{CompiledFacetSearch, CompiledRequest, CompiledSearch, compile, decode_params};
pub use reshaper::{encode_params, reshape_facet_search, reshape_search};
pub use sql::{QueryPlan, SqlParam, quote_ident};
