//! The database seam.
//!
//! The compiler is pure; everything that touches a database goes through
//! [`SearchExecutor`], which is injected into the
//! [`SearchEngine`](super::SearchEngine). Tests substitute an in-memory
//! double.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::BackendError;
use crate::search::QueryPlan;
use crate::types::FacetHit;

/// Executes compiled statements.
#[async_trait]
pub trait SearchExecutor: Send + Sync {
    /// Short backend name used in errors and logs.
    fn backend_name(&self) -> &'static str;

    /// Runs a search statement and returns the single JSON document it
    /// yields (`totalHits`, `hits`, optional `facets` / `facets_stats`).
    async fn fetch_json(&self, plan: &QueryPlan) -> Result<Value, BackendError>;

    /// Runs a facet-value search statement and returns its
    /// `value` / `count` / `highlighted` rows in order.
    async fn fetch_facet_hits(&self, plan: &QueryPlan) -> Result<Vec<FacetHit>, BackendError>;

    /// Checks that the database is reachable.
    async fn ping(&self) -> Result<(), BackendError>;
}

#[async_trait]
impl<E: SearchExecutor + ?Sized> SearchExecutor for Arc<E> {
    fn backend_name(&self) -> &'static str {
        (**self).backend_name()
    }

    async fn fetch_json(&self, plan: &QueryPlan) -> Result<Value, BackendError> {
        (**self).fetch_json(plan).await
    }

    async fn fetch_facet_hits(&self, plan: &QueryPlan) -> Result<Vec<FacetHit>, BackendError> {
        (**self).fetch_facet_hits(plan).await
    }

    async fn ping(&self) -> Result<(), BackendError> {
        (**self).ping().await
    }
}
