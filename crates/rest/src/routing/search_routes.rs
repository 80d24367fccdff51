//! Search route configuration.

use axum::{
    Router,
    routing::{get, post},
};
use searchbox_persistence::core::SearchExecutor;

use crate::handlers;
use crate::state::AppState;

/// Creates all routes.
///
/// - `POST /search` - Batch search
/// - `POST /1/indexes/{index}/queries` - Batch search, Algolia client path
/// - `GET /health` - Health check
/// - `GET /_liveness` - Liveness probe
/// - `GET /_readiness` - Readiness probe (pings the database)
pub fn create_routes<E>(state: AppState<E>) -> Router
where
    E: SearchExecutor + 'static,
{
    Router::new()
        .route("/search", post(handlers::search_handler::<E>))
        .route(
            "/1/indexes/{index}/queries",
            post(handlers::search_handler::<E>),
        )
        .route("/health", get(handlers::health_handler::<E>))
        .route("/_liveness", get(handlers::liveness_handler))
        .route("/_readiness", get(handlers::readiness_handler::<E>))
        .with_state(state)
}
