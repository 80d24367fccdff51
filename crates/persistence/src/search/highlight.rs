//! Highlight expressions and hit reconstitution.

use serde_json::{Map, Value};

use crate::constants::HIGHLIGHT_COLUMN_PREFIX;
use crate::search::sql::{SqlWriter, quote_ident};
use crate::types::{HighlightResult, Hit, MatchLevel};

/// Resolved highlight request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightSpec {
    /// Attributes to highlight, in request order.
    pub attributes: Vec<String>,
    /// Opening tag.
    pub pre_tag: String,
    /// Closing tag.
    pub post_tag: String,
}

/// Internal column carrying the headline of the `index`-th attribute.
///
/// Positional so long attribute names cannot collide after identifier
/// truncation.
pub fn highlight_column(index: usize) -> String {
    format!("{HIGHLIGHT_COLUMN_PREFIX}{index}")
}

impl HighlightSpec {
    /// Returns `None` when there is nothing to highlight.
    pub fn new(attributes: Vec<String>, pre_tag: String, post_tag: String) -> Option<Self> {
        if attributes.is_empty() {
            return None;
        }
        Some(Self {
            attributes,
            pre_tag,
            post_tag,
        })
    }

    /// Tags are double-quoted option values; embedded `"` is doubled.
    fn headline_options(&self) -> String {
        format!(
            "StartSel={},StopSel={},MaxFragments=2,HighlightAll=true",
            quote_ident(&self.pre_tag),
            quote_ident(&self.post_tag)
        )
    }

    /// Select-list expressions, one per attribute.
    ///
    /// `language` and `query` are placeholders already bound by the caller.
    pub fn select_expressions(&self, language: &str, query: &str, w: &mut SqlWriter) -> Vec<String> {
        let options = w.text(self.headline_options());
        self.attributes
            .iter()
            .enumerate()
            .map(|(i, attribute)| {
                format!(
                    "ts_headline({language}::regconfig, {}::text, websearch_to_tsquery({language}::regconfig, {query}), {options}) AS {}",
                    quote_ident(attribute),
                    quote_ident(&highlight_column(i)),
                )
            })
            .collect()
    }

    /// Moves the headline columns of `hit` into `_highlightResult`.
    pub fn reconstitute(&self, hit: &mut Hit) {
        let mut results = Map::new();
        for (i, attribute) in self.attributes.iter().enumerate() {
            let fragment = hit.remove(&highlight_column(i));
            let fragment = match fragment {
                Some(Value::String(s)) => Some(s),
                Some(Value::Null) | None => None,
                Some(other) => Some(other.to_string()),
            };

            let result = match fragment {
                Some(fragment) if fragment.contains(&self.pre_tag) => HighlightResult {
                    value: fragment,
                    match_level: MatchLevel::Full,
                    matched_words: Vec::new(),
                },
                _ => HighlightResult {
                    value: match hit.get(attribute) {
                        Some(Value::String(s)) => s.clone(),
                        _ => String::new(),
                    },
                    match_level: MatchLevel::None,
                    matched_words: Vec::new(),
                },
            };
            if let Ok(value) = serde_json::to_value(result) {
                results.insert(attribute.clone(), value);
            }
        }
        hit.insert("_highlightResult".to_string(), Value::Object(results));
    }
}
