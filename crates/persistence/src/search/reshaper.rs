//! Turns the engine's JSON document into the client envelope.

use serde_json::{Map, Value};

use crate::error::{BackendError, SearchboxResult};
use crate::search::columns::strip_internal;
use crate::search::compiler::CompiledSearch;
use crate::types::{FacetHit, FacetSearchResponse, Hit, SearchResponse};

/// URL-encodes request params; non-string values are JSON-encoded.
pub fn encode_params(params: &Value) -> String {
    let Value::Object(map) = params else {
        return String::new();
    };
    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    for (key, value) in map {
        match value {
            Value::String(s) => serializer.append_pair(key, s),
            other => serializer.append_pair(key, &other.to_string()),
        };
    }
    serializer.finish()
}

fn unexpected(backend_name: &str, message: impl Into<String>) -> BackendError {
    BackendError::UnexpectedResult {
        backend_name: backend_name.to_string(),
        message: message.into(),
    }
}

fn optional_object(document: &mut Map<String, Value>, key: &str) -> Option<Map<String, Value>> {
    match document.remove(key) {
        Some(Value::Object(map)) => Some(map),
        _ => None,
    }
}

/// Builds the response of a regular search.
pub fn reshape_search(
    compiled: &CompiledSearch,
    document: Value,
    backend_name: &str,
    processing_time_ms: u64,
) -> SearchboxResult<SearchResponse> {
    let Value::Object(mut document) = document else {
        return Err(unexpected(backend_name, "result is not a JSON object").into());
    };

    let total_hits = document
        .get("totalHits")
        .and_then(Value::as_u64)
        .unwrap_or(0);

    let hits = match document.remove("hits") {
        Some(Value::Array(rows)) => rows
            .into_iter()
            .filter_map(|row| match row {
                Value::Object(hit) => Some(hit),
                _ => None,
            })
            .map(|mut hit: Hit| {
                if let Some(spec) = &compiled.highlight {
                    spec.reconstitute(&mut hit);
                }
                strip_internal(&mut hit);
                hit
            })
            .collect(),
        Some(Value::Null) | None => Vec::new(),
        Some(_) => return Err(unexpected(backend_name, "hits is not an array").into()),
    };

    let facets = optional_object(&mut document, "facets");
    let facets_stats = optional_object(&mut document, "facets_stats");
    let metrics = compiled.pagination.metrics(total_hits);

    Ok(SearchResponse {
        hits,
        nb_hits: metrics.nb_hits,
        nb_pages: metrics.nb_pages,
        page: metrics.page,
        hits_per_page: metrics.hits_per_page,
        offset: metrics.offset,
        length: metrics.length,
        facets,
        facets_stats,
        processing_time_ms,
        rendering_content: compiled.rendering_content.clone(),
        index: compiled.index.clone(),
        query: compiled.query.clone(),
        params: encode_params(&compiled.raw_params),
        exhaustive_facets_count: true,
        exhaustive_nb_hits: true,
    })
}

/// Builds the response of a facet-value search.
pub fn reshape_facet_search(facet_hits: Vec<FacetHit>, processing_time_ms: u64) -> FacetSearchResponse {
    FacetSearchResponse {
        facet_hits,
        exhaustive_facets_count: true,
        processing_time_ms,
    }
}
