//! Execution: the [`SearchExecutor`] seam and the [`SearchEngine`] that drives
//! compile, execute and reshape for single requests and batches.

mod engine;
mod executor;

pub use engine::SearchEngine;
pub use executor::SearchExecutor;
