//! Client-facing response envelopes.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single hit: a flat row of retrieved columns plus `_highlightResult`.
pub type Hit = Map<String, Value>;

/// Result of a regular search request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    /// Hits of the requested page.
    pub hits: Vec<Hit>,

    /// Number of matching rows.
    pub nb_hits: u64,

    /// Number of pages (page mode only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nb_pages: Option<u64>,

    /// Current page (page mode only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,

    /// Page size (page mode only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hits_per_page: Option<u32>,

    /// Offset (offset mode only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,

    /// Length (offset mode only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<u32>,

    /// Value counts per facet attribute.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facets: Option<Map<String, Value>>,

    /// min/max/avg/sum per numeric attribute.
    #[serde(
        rename = "facets_stats",
        skip_serializing_if = "Option::is_none"
    )]
    pub facets_stats: Option<Map<String, Value>>,

    /// Wall-clock time spent on the request.
    #[serde(rename = "processingTimeMS")]
    pub processing_time_ms: u64,

    /// Rendering hints from the index settings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rendering_content: Option<Value>,

    /// The index identifier as sent, sort suffix included.
    pub index: String,

    /// The full-text query.
    pub query: String,

    /// URL-encoded echo of the request params.
    pub params: String,

    /// Always true.
    pub exhaustive_facets_count: bool,

    /// Always true.
    pub exhaustive_nb_hits: bool,
}

/// One value returned by a facet-value search.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FacetHit {
    /// The facet value.
    pub value: String,
    /// The value with the matched span wrapped in highlight tags.
    pub highlighted: String,
    /// Number of matching rows carrying the value.
    pub count: i64,
}

/// Result of a facet-value search.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FacetSearchResponse {
    /// Matching values, most frequent first.
    pub facet_hits: Vec<FacetHit>,

    /// Always true.
    pub exhaustive_facets_count: bool,

    /// Wall-clock time spent on the request.
    #[serde(rename = "processingTimeMS")]
    pub processing_time_ms: u64,
}

/// The outcome of one request of a batch.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum SearchOutcome {
    /// A regular search.
    Hits(Box<SearchResponse>),
    /// A facet-value search.
    FacetHits(FacetSearchResponse),
}

/// Match level of a highlighted attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchLevel {
    /// The query matched inside the attribute.
    Full,
    /// No match in the attribute.
    None,
}

/// `_highlightResult[attribute]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HighlightResult {
    /// Highlighted fragment, or the raw value when nothing matched.
    pub value: String,
    /// Whether anything matched.
    pub match_level: MatchLevel,
    /// Not computed; always empty.
    pub matched_words: Vec<String>,
}
