//! Request compiler: validates a raw request and assembles its statement.
//!
//! A search compiles to one CTE chain:
//!
//! ```text
//! WITH all_selection AS (...)   -- full-text match AND filters
//!    , hits_selection AS (...)  -- page of hits with highlight columns
//!    , facet_N / facet_stats_N  -- counts and stats over all_selection
//! SELECT json_build_object('totalHits', ..., 'hits', ..., 'facets', ..., 'facets_stats', ...)
//! ```
//!
//! A facet-value search compiles to the same `all_selection` followed by a
//! grouped, pattern-matched select over one facet column.

use serde_json::Value;
use tracing::debug;

use crate::constants::{RANK_COLUMN, VECTOR_COLUMN};
use crate::error::{SearchboxError, SearchboxResult};
use crate::search::columns::ColumnSelection;
use crate::search::facets::{FacetSpec, emit_facets};
use crate::search::filters::Filters;
use crate::search::highlight::HighlightSpec;
use crate::search::pagination::PaginationPlan;
use crate::search::sort::TableSort;
use crate::search::sql::{QueryPlan, SqlWriter, quote_ident};
use crate::search::validation::{RequestValidator, validate_index_name};
use crate::types::{IndexConfig, IndexConfigs, RawSearchRequest, RequestMode, SearchParams};

/// A compiled regular search.
#[derive(Debug, Clone)]
pub struct CompiledSearch {
    /// The statement.
    pub plan: QueryPlan,
    /// Pagination used to derive response fields.
    pub pagination: PaginationPlan,
    /// Highlight columns to fold into `_highlightResult`.
    pub highlight: Option<HighlightSpec>,
    /// Index identifier as sent.
    pub index: String,
    /// Full-text query.
    pub query: String,
    /// Raw params for the response echo.
    pub raw_params: Value,
    /// Rendering hints to echo, when configured.
    pub rendering_content: Option<Value>,
}

/// A compiled facet-value search.
#[derive(Debug, Clone)]
pub struct CompiledFacetSearch {
    /// The statement; returns `value`, `count`, `highlighted` rows.
    pub plan: QueryPlan,
}

/// A compiled request.
#[derive(Debug, Clone)]
pub enum CompiledRequest {
    /// Hits, facets and stats.
    Search(Box<CompiledSearch>),
    /// Facet values.
    FacetSearch(CompiledFacetSearch),
}

impl CompiledRequest {
    /// The statement to execute.
    pub fn plan(&self) -> &QueryPlan {
        match self {
            CompiledRequest::Search(search) => &search.plan,
            CompiledRequest::FacetSearch(facet) => &facet.plan,
        }
    }
}

/// Decodes request params; JSON `null` or absence means no params.
pub fn decode_params(raw: &Value) -> SearchboxResult<SearchParams> {
    if raw.is_null() {
        return Ok(SearchParams::default());
    }
    serde_json::from_value(raw.clone()).map_err(|e| SearchboxError::rejected("params", e.to_string()))
}

/// Validates and compiles one request.
pub fn compile(request: &RawSearchRequest, configs: &IndexConfigs) -> SearchboxResult<CompiledRequest> {
    if let Some(issue) = validate_index_name(&request.index_name) {
        return Err(SearchboxError::ValidationRejected {
            issues: vec![issue],
        });
    }
    let table_sort = TableSort::parse(&request.index_name)?;
    let config = configs.resolve(&table_sort.table);
    let params = decode_params(&request.params)?;

    let filters = Filters::parse(
        params.facet_filters.as_ref(),
        params.numeric_filters.as_deref().unwrap_or_default(),
    )?;
    let pagination = PaginationPlan::resolve(&params, &config.settings);

    let issues = RequestValidator {
        request,
        params: &params,
        config,
        filters: &filters,
        pagination: &pagination,
    }
    .issues();
    if !issues.is_empty() {
        return Err(SearchboxError::ValidationRejected { issues });
    }

    let compiled = match request.mode() {
        RequestMode::Search => CompiledRequest::Search(Box::new(compile_search(
            request,
            &params,
            config,
            &table_sort,
            &filters,
            pagination,
        ))),
        RequestMode::FacetSearch => CompiledRequest::FacetSearch(compile_facet_search(
            request, &params, config, &table_sort, &filters,
        )),
    };

    debug!(
        index = %request.index_name,
        params = compiled.plan().params.len(),
        sql = %compiled.plan().sql,
        "compiled search request"
    );
    Ok(compiled)
}

/// Renders `all_selection` and returns it with the bound query placeholder.
fn all_selection(
    params: &SearchParams,
    config: &IndexConfig,
    table_sort: &TableSort,
    filters: &Filters,
    w: &mut SqlWriter,
) -> (String, String, String) {
    let language = w.text(config.settings.language.clone());
    let query = w.text(params.query.clone());
    let vector = quote_ident(VECTOR_COLUMN);

    let mut condition = format!(
        "(({vector} @@ websearch_to_tsquery({language}::regconfig, {query}) AND {query} <> '') OR {query} = '')"
    );
    if let Some(predicate) = filters.to_predicate() {
        condition.push_str(" AND ");
        condition.push_str(&predicate.render(w));
    }

    let cte = format!(
        "all_selection AS (SELECT * FROM {} WHERE {condition})",
        quote_ident(&table_sort.table)
    );
    (cte, language, query)
}

fn compile_search(
    request: &RawSearchRequest,
    params: &SearchParams,
    config: &IndexConfig,
    table_sort: &TableSort,
    filters: &Filters,
    pagination: PaginationPlan,
) -> CompiledSearch {
    let settings = &config.settings;
    let mut w = SqlWriter::new();

    let (all_selection, language, query) = all_selection(params, config, table_sort, filters, &mut w);

    let columns = ColumnSelection::from_attributes(
        params
            .attributes_to_retrieve
            .as_ref()
            .unwrap_or(&settings.attributes_to_retrieve),
    );
    let highlight = HighlightSpec::new(
        params
            .attributes_to_highlight
            .clone()
            .unwrap_or_else(|| settings.attributes_to_highlight.clone()),
        params
            .highlight_pre_tag
            .clone()
            .unwrap_or_else(|| settings.highlight_pre_tag.clone()),
        params
            .highlight_post_tag
            .clone()
            .unwrap_or_else(|| settings.highlight_post_tag.clone()),
    );

    let order_by = table_sort.order_by();
    let mut select_items = columns.select_items();
    if let Some(spec) = &highlight {
        select_items.extend(spec.select_expressions(&language, &query, &mut w));
    }
    select_items.push(format!(
        "row_number() OVER ({}) AS {}",
        order_by.as_deref().unwrap_or_default(),
        quote_ident(RANK_COLUMN)
    ));

    let offset = w.integer(i64::try_from(pagination.offset).unwrap_or(i64::MAX));
    let limit = w.integer(i64::try_from(pagination.limit).unwrap_or(i64::MAX));
    let hits_selection = format!(
        "hits_selection AS (SELECT {} FROM all_selection{} OFFSET {offset} LIMIT {limit})",
        select_items.join(", "),
        order_by.map(|o| format!(" {o}")).unwrap_or_default(),
    );

    let mut ctes = vec![all_selection, hits_selection];
    let mut fields = vec![
        "'totalHits', (SELECT count(*) FROM all_selection)".to_string(),
        format!(
            "'hits', COALESCE((SELECT json_agg(h ORDER BY h.{rank}) FROM hits_selection h), '[]'::json)",
            rank = quote_ident(RANK_COLUMN)
        ),
    ];

    if let Some(spec) = FacetSpec::resolve(params, settings) {
        let facet_sql = emit_facets(&spec, &mut w);
        ctes.extend(facet_sql.ctes);
        if let Some(json) = facet_sql.facets_json {
            fields.push(format!("'facets', {json}"));
        }
        if let Some(json) = facet_sql.stats_json {
            fields.push(format!("'facets_stats', {json}"));
        }
    }

    let sql = format!(
        "WITH {} SELECT json_build_object({}) AS json",
        ctes.join(", "),
        fields.join(", ")
    );

    let rendering_content = match &settings.rendering_content {
        Value::Null => None,
        Value::Object(map) if map.is_empty() => None,
        other => Some(other.clone()),
    };

    CompiledSearch {
        plan: w.finish(sql),
        pagination,
        highlight,
        index: request.index_name.clone(),
        query: params.query.clone(),
        raw_params: request.params.clone(),
        rendering_content,
    }
}

/// Escapes `%`, `_` and `\` for a LIKE pattern with the default escape.
fn escape_like(needle: &str) -> String {
    let mut out = String::with_capacity(needle.len());
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Escapes every non-alphanumeric character for a POSIX regex.
fn escape_regex(needle: &str) -> String {
    let mut out = String::with_capacity(needle.len() * 2);
    for c in needle.chars() {
        if !c.is_alphanumeric() {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Escapes `\` in a `regexp_replace` replacement string. A bare `&` is
/// literal there; `\&` would splice in the match.
fn escape_replacement(tag: &str) -> String {
    tag.replace('\\', "\\\\")
}

fn compile_facet_search(
    request: &RawSearchRequest,
    params: &SearchParams,
    config: &IndexConfig,
    table_sort: &TableSort,
    filters: &Filters,
) -> CompiledFacetSearch {
    let settings = &config.settings;
    let mut w = SqlWriter::new();

    let (all_selection, _, _) = all_selection(params, config, table_sort, filters, &mut w);

    let facet = request.facet.as_deref().unwrap_or_default();
    let column = quote_ident(facet);
    let needle = params.facet_query.as_deref().unwrap_or_default();
    let pattern = w.text(format!("%{}%", escape_like(needle)));

    let highlighted = if needle.is_empty() {
        "s.value".to_string()
    } else {
        let pre = params
            .highlight_pre_tag
            .as_deref()
            .unwrap_or(&settings.highlight_pre_tag);
        let post = params
            .highlight_post_tag
            .as_deref()
            .unwrap_or(&settings.highlight_post_tag);
        let regex = w.text(escape_regex(needle));
        let replacement = w.text(format!(
            "{}\\&{}",
            escape_replacement(pre),
            escape_replacement(post)
        ));
        format!("regexp_replace(s.value, {regex}, {replacement}, 'i')")
    };

    let limit = w.integer(i64::from(
        params.max_facet_hits.unwrap_or(settings.max_facet_hits),
    ));

    let sql = format!(
        "WITH {all_selection} \
         SELECT s.value, s.count, {highlighted} AS highlighted \
         FROM (SELECT {column}::text AS value, count(*) AS count FROM all_selection \
         WHERE {column} IS NOT NULL AND {column}::text ILIKE {pattern} GROUP BY 1) s \
         ORDER BY s.count DESC, s.value ASC LIMIT {limit}"
    );

    CompiledFacetSearch {
        plan: w.finish(sql),
    }
}
