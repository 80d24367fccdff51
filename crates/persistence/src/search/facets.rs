//! Facet-count and facet-stats CTEs.
//!
//! Every CTE reads from `all_selection`, so counts and stats reflect the
//! filtered row set. Each produces a single `json` column that the final
//! select nests under the attribute name.

use crate::search::sql::{SqlWriter, quote_ident};
use crate::types::{FacetSelection, IndexSettings, SearchParams, SortFacetValuesBy};

/// Resolved facet request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacetSpec {
    /// Attributes to count, in request order.
    pub attributes: Vec<String>,
    /// Numeric attributes among `attributes` that get min/max/avg/sum.
    pub stats: Vec<String>,
    /// Maximum values per facet.
    pub max_values: u32,
    /// Value ordering.
    pub sort_by: SortFacetValuesBy,
}

impl FacetSpec {
    /// Resolves the request's facet selection against the index settings.
    ///
    /// Returns `None` when nothing is to be counted. Attributes that are not
    /// countable are dropped here; rejecting them is the validator's job.
    pub fn resolve(params: &SearchParams, settings: &IndexSettings) -> Option<Self> {
        let countable = settings.countable_facets();
        let attributes: Vec<String> = match &params.facets {
            FacetSelection::None => return None,
            FacetSelection::All => countable,
            FacetSelection::Attributes(names) => {
                let mut out: Vec<String> = Vec::with_capacity(names.len());
                for name in names {
                    if countable.contains(name) && !out.contains(name) {
                        out.push(name.clone());
                    }
                }
                out
            }
        };
        if attributes.is_empty() {
            return None;
        }

        let stats = attributes
            .iter()
            .filter(|a| settings.is_numeric(a))
            .cloned()
            .collect();

        Some(Self {
            attributes,
            stats,
            max_values: params
                .max_values_per_facet
                .unwrap_or(settings.max_values_per_facet),
            sort_by: params
                .sort_facet_values_by
                .unwrap_or(settings.sort_facet_values_by),
        })
    }
}

/// SQL produced for a [`FacetSpec`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FacetSql {
    /// CTE definitions, without the leading comma.
    pub ctes: Vec<String>,
    /// `json_build_object(...)` for the `facets` key, if any.
    pub facets_json: Option<String>,
    /// `json_build_object(...)` for the `facets_stats` key, if any.
    pub stats_json: Option<String>,
}

fn facet_order(sort_by: SortFacetValuesBy) -> &'static str {
    match sort_by {
        SortFacetValuesBy::Count => "count DESC, value ASC",
        SortFacetValuesBy::Alpha => "value ASC",
    }
}

/// Emits the count and stats CTEs for `spec`.
pub fn emit_facets(spec: &FacetSpec, w: &mut SqlWriter) -> FacetSql {
    let mut sql = FacetSql::default();
    let order = facet_order(spec.sort_by);
    let limit = w.integer(i64::from(spec.max_values));

    let mut facet_keys = Vec::with_capacity(spec.attributes.len());
    for (i, attribute) in spec.attributes.iter().enumerate() {
        let column = quote_ident(attribute);
        let name = format!("facet_{i}");
        sql.ctes.push(format!(
            "{name} AS (SELECT COALESCE(json_object_agg(s.value, s.count ORDER BY {order}), '{{}}'::json) AS json \
             FROM (SELECT {column}::text AS value, count(*) AS count FROM all_selection \
             WHERE {column} IS NOT NULL GROUP BY 1 ORDER BY {order} LIMIT {limit}) s)"
        ));
        facet_keys.push(format!("{}, (SELECT json FROM {name})", w.text(attribute.clone())));
    }
    if !facet_keys.is_empty() {
        sql.facets_json = Some(format!("json_build_object({})", facet_keys.join(", ")));
    }

    let mut stats_keys = Vec::with_capacity(spec.stats.len());
    for (i, attribute) in spec.stats.iter().enumerate() {
        let column = quote_ident(attribute);
        let name = format!("facet_stats_{i}");
        sql.ctes.push(format!(
            "{name} AS (SELECT json_build_object('min', min({column}), 'max', max({column}), \
             'avg', round(avg({column})::numeric, 4), 'sum', sum({column})) AS json \
             FROM all_selection WHERE {column} IS NOT NULL)"
        ));
        stats_keys.push(format!("{}, (SELECT json FROM {name})", w.text(attribute.clone())));
    }
    if !stats_keys.is_empty() {
        sql.stats_json = Some(format!("json_build_object({})", stats_keys.join(", ")));
    }

    sql
}
