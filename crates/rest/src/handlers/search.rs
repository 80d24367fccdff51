//! Multi-query search handler.

use axum::{
    Json,
    body::Bytes,
    extract::State,
    response::{IntoResponse, Response},
};
use searchbox_persistence::core::SearchExecutor;
use searchbox_persistence::types::{BatchPayload, SearchOutcome};
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{RestError, RestResult};
use crate::state::AppState;

/// Response body of a successful batch.
#[derive(Debug, Serialize)]
pub struct BatchResponse {
    /// One outcome per request, in submission order.
    pub results: Vec<SearchOutcome>,
}

/// Handler for batch searches.
///
/// The body is read as raw bytes and decoded as JSON whatever the content
/// type, since Algolia clients post JSON as `application/x-www-form-urlencoded`.
///
/// All requests run concurrently. If any fails, the response is the error of
/// the first failing request in submission order.
///
/// # HTTP Request
///
/// `POST [base]/search` or `POST [base]/1/indexes/*/queries`
///
/// # Response
///
/// - `200 OK` - `{ "results": [...] }`
/// - `400 Bad Request` - Invalid payload or a rejected request
/// - `500 Internal Server Error` - Database or other failure
pub async fn search_handler<E>(State(state): State<AppState<E>>, body: Bytes) -> RestResult<Response>
where
    E: SearchExecutor + 'static,
{
    let payload: BatchPayload = serde_json::from_slice(&body).map_err(|e| {
        warn!(error = %e, "undecodable search payload");
        RestError::invalid_payload("requests")
    })?;

    let count = payload.requests.len();
    if count == 0 || count > state.max_requests_per_batch() {
        warn!(
            count,
            max = state.max_requests_per_batch(),
            "search payload has an invalid number of requests"
        );
        return Err(RestError::invalid_payload("requests"));
    }

    debug!(count, "Processing search batch");
    let results = state
        .engine()
        .search_batch(&payload.requests)
        .await
        .into_iter()
        .collect::<Result<Vec<_>, _>>()
        .inspect_err(|e| {
            if e.is_client_error() {
                debug!(error = %e, "search batch rejected");
            } else {
                warn!(error = %e, "search batch failed");
            }
        })?;

    Ok(Json(BatchResponse { results }).into_response())
}
