//! Health check endpoint handlers.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use searchbox_persistence::core::SearchExecutor;
use tracing::{debug, warn};

use crate::error::{RestError, RestResult};
use crate::state::AppState;

/// Handler for the health check endpoint.
///
/// # HTTP Request
///
/// `GET [base]/health`
pub async fn health_handler<E>(State(state): State<AppState<E>>) -> RestResult<Response>
where
    E: SearchExecutor + 'static,
{
    debug!("Processing health check request");

    let health_response = serde_json::json!({
        "status": "healthy",
        "backend": state.engine().executor().backend_name(),
        "indexConfigs": state.engine().configs().len(),
        "timestamp": chrono::Utc::now().to_rfc3339()
    });

    Ok((StatusCode::OK, Json(health_response)).into_response())
}

/// Handler for the liveness probe.
///
/// # HTTP Request
///
/// `GET [base]/_liveness`
pub async fn liveness_handler() -> impl IntoResponse {
    StatusCode::OK
}

/// Handler for the readiness probe; pings the database.
///
/// # HTTP Request
///
/// `GET [base]/_readiness`
///
/// # Response
///
/// - `200 OK` - Database reachable
/// - `503 Service Unavailable` - Database unreachable
pub async fn readiness_handler<E>(State(state): State<AppState<E>>) -> RestResult<Response>
where
    E: SearchExecutor + 'static,
{
    debug!("Processing readiness check request");

    let executor = state.engine().executor();
    if let Err(e) = executor.ping().await {
        warn!(error = %e, "Readiness check failed");
        return Err(RestError::Unavailable);
    }

    let response = serde_json::json!({
        "status": "ready",
        "backend": executor.backend_name(),
        "checks": {
            "database": "ok"
        }
    });

    Ok((StatusCode::OK, Json(response)).into_response())
}
