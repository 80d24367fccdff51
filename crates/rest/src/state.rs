//! Application state for the search API.

use std::sync::Arc;

use searchbox_persistence::core::{SearchEngine, SearchExecutor};

use crate::config::ServerConfig;

/// Shared application state for the REST API.
///
/// # Type Parameters
///
/// * `E` - The executor behind the engine
///
/// # Example
///
/// ```rust,ignore
/// use searchbox_rest::{AppState, ServerConfig};
/// use searchbox_persistence::SearchEngine;
///
/// let engine = SearchEngine::new(Arc::new(executor), configs);
/// let state = AppState::new(engine, ServerConfig::default());
/// ```
pub struct AppState<E: SearchExecutor> {
    /// The search engine.
    engine: SearchEngine<E>,

    /// Server configuration.
    config: Arc<ServerConfig>,
}

// The engine is Arc-backed; E itself need not be Clone.
impl<E: SearchExecutor> Clone for AppState<E> {
    fn clone(&self) -> Self {
        Self {
            engine: self.engine.clone(),
            config: Arc::clone(&self.config),
        }
    }
}

impl<E: SearchExecutor> AppState<E> {
    /// Creates a new AppState.
    pub fn new(engine: SearchEngine<E>, config: ServerConfig) -> Self {
        Self {
            engine,
            config: Arc::new(config),
        }
    }

    /// Returns the search engine.
    pub fn engine(&self) -> &SearchEngine<E> {
        &self.engine
    }

    /// Returns the server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Returns the maximum number of searches in one HTTP request.
    pub fn max_requests_per_batch(&self) -> usize {
        self.config.max_requests_per_batch
    }
}
