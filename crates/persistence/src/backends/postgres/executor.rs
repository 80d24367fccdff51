//! SearchExecutor implementation for PostgreSQL.

use async_trait::async_trait;
use serde_json::Value;
use tokio_postgres::types::ToSql;

use super::backend::{BACKEND_NAME, PostgresExecutor};
use crate::core::SearchExecutor;
use crate::error::BackendError;
use crate::search::{QueryPlan, SqlParam};
use crate::types::FacetHit;

fn query_failed(e: tokio_postgres::Error) -> BackendError {
    tracing::error!(error = ?e, "PostgreSQL query failed");
    BackendError::Query {
        backend_name: BACKEND_NAME.to_string(),
        message: e.to_string(),
    }
}

fn param_refs(plan: &QueryPlan) -> Vec<&(dyn ToSql + Sync)> {
    plan.params
        .iter()
        .map(|p| match p {
            SqlParam::Text(s) => s as &(dyn ToSql + Sync),
            SqlParam::Integer(i) => i as &(dyn ToSql + Sync),
        })
        .collect()
}

#[async_trait]
impl SearchExecutor for PostgresExecutor {
    fn backend_name(&self) -> &'static str {
        BACKEND_NAME
    }

    async fn fetch_json(&self, plan: &QueryPlan) -> Result<Value, BackendError> {
        let client = self.get_client().await?;
        tracing::trace!(sql = %plan.sql, params = plan.params.len(), "executing search");

        let row = client
            .query_one(&plan.sql, &param_refs(plan))
            .await
            .map_err(query_failed)?;
        row.try_get::<_, Value>(0).map_err(query_failed)
    }

    async fn fetch_facet_hits(&self, plan: &QueryPlan) -> Result<Vec<FacetHit>, BackendError> {
        let client = self.get_client().await?;
        tracing::trace!(sql = %plan.sql, params = plan.params.len(), "executing facet search");

        let rows = client
            .query(&plan.sql, &param_refs(plan))
            .await
            .map_err(query_failed)?;

        rows.iter()
            .map(|row| {
                Ok(FacetHit {
                    value: row.try_get("value").map_err(query_failed)?,
                    count: row.try_get("count").map_err(query_failed)?,
                    highlighted: row.try_get("highlighted").map_err(query_failed)?,
                })
            })
            .collect()
    }

    async fn ping(&self) -> Result<(), BackendError> {
        let client = self.get_client().await?;
        client
            .simple_query("SELECT 1")
            .await
            .map_err(query_failed)?;
        Ok(())
    }
}
