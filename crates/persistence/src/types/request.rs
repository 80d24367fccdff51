//! Inbound request types.
//!
//! The batch payload is decoded in two steps: first the envelope
//! ([`BatchPayload`]) with `params` kept as raw JSON, then each request's
//! params into the typed [`SearchParams`]. Decoding params per request keeps a
//! bad request from failing its siblings before they are even looked at.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::settings::SortFacetValuesBy;

/// The batch envelope: `{ "requests": [...] }`.
#[derive(Debug, Clone, Deserialize)]
pub struct BatchPayload {
    /// Requests in submission order.
    pub requests: Vec<RawSearchRequest>,
}

/// One request of a batch before its params are decoded.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSearchRequest {
    /// Table name, optionally followed by `?sort=...`.
    pub index_name: String,

    /// Request params as sent by the client.
    #[serde(default)]
    pub params: Value,

    /// Facet attribute for facet-value searches.
    #[serde(default)]
    pub facet: Option<String>,

    /// `"facet"` selects facet-value search.
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

impl RawSearchRequest {
    /// Returns the request mode.
    pub fn mode(&self) -> RequestMode {
        match self.kind.as_deref() {
            Some("facet") => RequestMode::FacetSearch,
            _ => RequestMode::Search,
        }
    }
}

/// Which kind of statement a request compiles to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestMode {
    /// Hits, facets and stats.
    Search,
    /// Values of one facet matching `facetQuery`.
    FacetSearch,
}

/// A nested facet-filter expression exactly as the client sent it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawFilter {
    /// `"attribute:value"`.
    Leaf(String),
    /// A nested array.
    Group(Vec<RawFilter>),
}

/// The facets a request asks counts for, normalized from
/// `'*' | string | string[]`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FacetSelection {
    /// No counts requested.
    #[default]
    None,
    /// Every countable attribute.
    All,
    /// The named attributes, in request order.
    Attributes(Vec<String>),
}

impl<'de> Deserialize<'de> for FacetSelection {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let names = deserialize_string_or_vec(deserializer)?.unwrap_or_default();
        Ok(if names.is_empty() {
            FacetSelection::None
        } else if names.iter().any(|n| n == "*") {
            FacetSelection::All
        } else {
            FacetSelection::Attributes(names)
        })
    }
}

/// Accepts a single string or an array of strings.
fn deserialize_string_or_vec<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de;

    struct StringOrVec;

    impl<'de> de::Visitor<'de> for StringOrVec {
        type Value = Option<Vec<String>>;

        fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
            formatter.write_str("a string, an array of strings, or null")
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            Ok(Some(vec![v.to_string()]))
        }

        fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
            Ok(Some(vec![v]))
        }

        fn visit_seq<A: de::SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
            let mut vec = Vec::new();
            while let Some(s) = seq.next_element::<String>()? {
                vec.push(s);
            }
            Ok(Some(vec))
        }
    }

    deserializer.deserialize_any(StringOrVec)
}

/// Typed per-request params. Unknown keys are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    /// Full-text query; empty matches every row.
    #[serde(default)]
    pub query: String,

    /// Columns to return.
    #[serde(default)]
    pub attributes_to_retrieve: Option<Vec<String>>,

    /// Nested facet filters.
    #[serde(default)]
    pub facet_filters: Option<RawFilter>,

    /// Numeric comparison tokens.
    #[serde(default, deserialize_with = "deserialize_string_or_vec")]
    pub numeric_filters: Option<Vec<String>>,

    /// Facets to count.
    #[serde(default)]
    pub facets: FacetSelection,

    /// Overrides the settings' `maxValuesPerFacet`.
    #[serde(default)]
    pub max_values_per_facet: Option<u32>,

    /// Overrides the settings' `sortFacetValuesBy`.
    #[serde(default)]
    pub sort_facet_values_by: Option<SortFacetValuesBy>,

    /// Columns to highlight.
    #[serde(default)]
    pub attributes_to_highlight: Option<Vec<String>>,

    /// Highlight opening tag.
    #[serde(default)]
    pub highlight_pre_tag: Option<String>,

    /// Highlight closing tag.
    #[serde(default)]
    pub highlight_post_tag: Option<String>,

    /// Zero-based page number.
    #[serde(default)]
    pub page: Option<u32>,

    /// Page size.
    #[serde(default)]
    pub hits_per_page: Option<u32>,

    /// Offset (selects offset mode).
    #[serde(default)]
    pub offset: Option<u32>,

    /// Number of hits in offset mode.
    #[serde(default)]
    pub length: Option<u32>,

    /// Facet-value search result cap.
    #[serde(default)]
    pub max_facet_hits: Option<u32>,

    /// Facet-value search needle.
    #[serde(default)]
    pub facet_query: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_facets_normalization() {
        let p: SearchParams = serde_json::from_value(json!({"facets": "*"})).unwrap();
        assert_eq!(p.facets, FacetSelection::All);

        let p: SearchParams = serde_json::from_value(json!({"facets": "brand"})).unwrap();
        assert_eq!(p.facets, FacetSelection::Attributes(vec!["brand".into()]));

        let p: SearchParams =
            serde_json::from_value(json!({"facets": ["brand", "*", "color"]})).unwrap();
        assert_eq!(p.facets, FacetSelection::All);

        let p: SearchParams = serde_json::from_value(json!({"facets": []})).unwrap();
        assert_eq!(p.facets, FacetSelection::None);

        let p: SearchParams = serde_json::from_value(json!({})).unwrap();
        assert_eq!(p.facets, FacetSelection::None);
    }

    #[test]
    fn test_nested_facet_filters() {
        let p: SearchParams = serde_json::from_value(json!({
            "facetFilters": ["brand:Acme", ["color:red", "color:blue"]]
        }))
        .unwrap();
        assert_eq!(
            p.facet_filters,
            Some(RawFilter::Group(vec![
                RawFilter::Leaf("brand:Acme".into()),
                RawFilter::Group(vec![
                    RawFilter::Leaf("color:red".into()),
                    RawFilter::Leaf("color:blue".into()),
                ]),
            ]))
        );
    }

    #[test]
    fn test_numeric_filters_string_or_array() {
        let p: SearchParams =
            serde_json::from_value(json!({"numericFilters": "price>=10"})).unwrap();
        assert_eq!(p.numeric_filters, Some(vec!["price>=10".to_string()]));

        let p: SearchParams =
            serde_json::from_value(json!({"numericFilters": ["price>=10", "price<=20"]}))
                .unwrap();
        assert_eq!(p.numeric_filters.map(|v| v.len()), Some(2));
    }

    #[test]
    fn test_unknown_keys_ignored_and_bad_types_rejected() {
        let p: SearchParams =
            serde_json::from_value(json!({"query": "phone", "clickAnalytics": true})).unwrap();
        assert_eq!(p.query, "phone");

        assert!(serde_json::from_value::<SearchParams>(json!({"page": "two"})).is_err());
        assert!(serde_json::from_value::<SearchParams>(json!({"hitsPerPage": -1})).is_err());
    }

    #[test]
    fn test_raw_request_mode() {
        let raw: RawSearchRequest = serde_json::from_value(json!({
            "indexName": "products",
            "type": "facet",
            "facet": "brand",
            "params": {"facetQuery": "ac"}
        }))
        .unwrap();
        assert_eq!(raw.mode(), RequestMode::FacetSearch);

        let raw: RawSearchRequest =
            serde_json::from_value(json!({"indexName": "products"})).unwrap();
        assert_eq!(raw.mode(), RequestMode::Search);
        assert!(raw.params.is_null());
    }
}
