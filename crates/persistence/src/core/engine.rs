//! Compile, execute, reshape.

use std::sync::Arc;
use std::time::Instant;

use futures_util::future::join_all;
use tracing::{debug, warn};

use super::executor::SearchExecutor;
use crate::error::SearchboxResult;
use crate::search::{CompiledRequest, compile, reshape_facet_search, reshape_search};
use crate::types::{IndexConfigs, RawSearchRequest, SearchOutcome};

/// Runs search requests against one executor and one set of index
/// configurations.
pub struct SearchEngine<E: SearchExecutor> {
    executor: Arc<E>,
    configs: Arc<IndexConfigs>,
}

impl<E: SearchExecutor> Clone for SearchEngine<E> {
    fn clone(&self) -> Self {
        Self {
            executor: Arc::clone(&self.executor),
            configs: Arc::clone(&self.configs),
        }
    }
}

impl<E: SearchExecutor> SearchEngine<E> {
    /// Creates an engine.
    pub fn new(executor: Arc<E>, configs: IndexConfigs) -> Self {
        Self {
            executor,
            configs: Arc::new(configs),
        }
    }

    /// The executor.
    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// The index configurations.
    pub fn configs(&self) -> &IndexConfigs {
        &self.configs
    }

    /// Runs one request.
    ///
    /// Validation and filter errors are returned before the executor is
    /// called.
    pub async fn search(&self, request: &RawSearchRequest) -> SearchboxResult<SearchOutcome> {
        let start = Instant::now();

        let compiled = compile(request, &self.configs).inspect_err(|e| {
            warn!(index = %request.index_name, error = %e, "search request rejected");
        })?;

        let outcome = match compiled {
            CompiledRequest::Search(search) => {
                let document = self.executor.fetch_json(&search.plan).await?;
                let response = reshape_search(
                    &search,
                    document,
                    self.executor.backend_name(),
                    elapsed_ms(start),
                )?;
                SearchOutcome::Hits(Box::new(response))
            }
            CompiledRequest::FacetSearch(facet) => {
                let hits = self.executor.fetch_facet_hits(&facet.plan).await?;
                SearchOutcome::FacetHits(reshape_facet_search(hits, elapsed_ms(start)))
            }
        };

        debug!(
            index = %request.index_name,
            elapsed_ms = elapsed_ms(start),
            "search request completed"
        );
        Ok(outcome)
    }

    /// Runs every request concurrently.
    ///
    /// Results are returned in submission order; one request failing does
    /// not affect the others.
    pub async fn search_batch(
        &self,
        requests: &[RawSearchRequest],
    ) -> Vec<SearchboxResult<SearchOutcome>> {
        join_all(requests.iter().map(|request| self.search(request))).await
    }
}

/// Milliseconds since `start`, rounded up.
fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_micros())
        .unwrap_or(u64::MAX)
        .div_ceil(1000)
}
