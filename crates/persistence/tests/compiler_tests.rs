//! Compiler integration tests.
//!
//! These exercise the public compile / reshape path without a database.
//!
//! Run with: `cargo test -p searchbox-persistence --test compiler_tests`

use searchbox_persistence::search::facet_tree::{Combinator, FilterNode};
use searchbox_persistence::search::numeric::NumericFilter;
use searchbox_persistence::search::ranges::{RangeComparison, merge_ranges};
use searchbox_persistence::search::{CompiledRequest, SqlParam, compile, reshape_search};
use searchbox_persistence::types::{IndexConfigs, RawFilter, RawSearchRequest};
use searchbox_persistence::SearchboxError;
use serde_json::{Value, json};

// ============================================================================
// Helpers
// ============================================================================

fn configs() -> IndexConfigs {
    IndexConfigs::from_json(
        r#"[
            {
                "indexName": "products",
                "settings": {
                    "attributesForFaceting": ["searchable(brand)", "color", "filterOnly(sku)"],
                    "numericAttributesForFiltering": ["price"],
                    "maxValuesPerFacet": 5
                },
                "clientValidation": {
                    "validFacetFilters": ["brand", "color", "price", "sku"]
                }
            },
            {
                "settings": {"hitsPerPage": 10}
            }
        ]"#,
    )
    .unwrap()
}

fn request(value: Value) -> RawSearchRequest {
    serde_json::from_value(value).unwrap()
}

fn compile_sql(value: Value) -> (String, Vec<SqlParam>) {
    let compiled = compile(&request(value), &configs()).unwrap();
    let plan = compiled.plan().clone();
    (plan.sql, plan.params)
}

fn rejected_fields(value: Value) -> Vec<String> {
    match compile(&request(value), &configs()) {
        Err(SearchboxError::ValidationRejected { issues }) => {
            issues.into_iter().map(|i| i.field).collect()
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

/// Collects the leaves of `node` together with the combinator of their
/// enclosing group.
fn leaf_combinators(node: &FilterNode, parent: Option<Combinator>, out: &mut Vec<Combinator>) {
    match node {
        FilterNode::Leaf { .. } => out.extend(parent),
        FilterNode::Group {
            children,
            combinator,
        } => {
            for child in children {
                leaf_combinators(child, Some(*combinator), out);
            }
        }
    }
}

// ============================================================================
// Facet filter depth semantics
// ============================================================================

#[test]
fn test_leaf_combinator_depends_only_on_depth() {
    let shapes = [
        json!(["brand:a", "color:b"]),
        json!([["brand:a", "brand:b"], "color:c"]),
        json!([[["brand:a"], "brand:b"], [["color:c", "color:d"]]]),
    ];
    for shape in shapes {
        let raw: RawFilter = serde_json::from_value(shape.clone()).unwrap();
        let tree = FilterNode::from_raw(&raw).unwrap();

        let FilterNode::Group { children, .. } = &tree else {
            panic!("root must be a group");
        };
        for child in children {
            let mut combinators = Vec::new();
            leaf_combinators(child, Some(Combinator::And), &mut combinators);
            match child {
                FilterNode::Leaf { .. } => assert_eq!(combinators, vec![Combinator::And]),
                FilterNode::Group { .. } => {
                    assert!(
                        combinators.iter().all(|c| *c == Combinator::Or),
                        "nested leaves in {shape} must be disjunctive"
                    );
                }
            }
        }
    }
}

#[test]
fn test_nested_group_compiles_to_in_list() {
    let (sql, params) = compile_sql(json!({
        "indexName": "products",
        "params": {"facetFilters": [["color:red", "color:blue"], "brand:-Acme"]}
    }));
    assert!(sql.contains(r#""color"::text IN ($3::text, $4::text)"#), "{sql}");
    assert!(sql.contains(r#""brand"::text NOT IN ($5::text)"#), "{sql}");
    assert_eq!(params[2], SqlParam::Text("red".into()));
    assert_eq!(params[4], SqlParam::Text("Acme".into()));
}

// ============================================================================
// Numeric ranges
// ============================================================================

fn comparisons(tokens: &[&str]) -> Vec<RangeComparison> {
    tokens
        .iter()
        .map(|t| {
            let filter = NumericFilter::parse(t).unwrap();
            let value = filter.value.values()[0];
            RangeComparison {
                attribute: filter.attribute,
                operator: filter.operator,
                value,
            }
        })
        .collect()
}

#[test]
fn test_closed_range_matches_literal_evaluation() {
    let merged = merge_ranges(comparisons(&["price>=10", "price<=20"]));
    assert_eq!(merged.len(), 1);
    for value in -5..40 {
        assert_eq!(
            merged[0].contains(value),
            (10..=20).contains(&value),
            "value {value}"
        );
    }
}

#[test]
fn test_disjoint_ranges_match_literal_union() {
    let merged = merge_ranges(comparisons(&["price<5", "price>30", "price>=10", "price<20"]));
    assert_eq!(merged[0].ranges.len(), 3);
    let literal = |v: i64| v < 5 || (10..20).contains(&v) || v > 30;
    for value in -5..40 {
        assert_eq!(merged[0].contains(value), literal(value), "value {value}");
    }
}

#[test]
fn test_equality_filters_are_not_ranges() {
    let (sql, params) = compile_sql(json!({
        "indexName": "products",
        "params": {"numericFilters": ["price=[5,10]", "price!=7"]}
    }));
    assert!(sql.contains(r#""price" IN ($3::bigint, $4::bigint)"#), "{sql}");
    assert!(sql.contains(r#""price" NOT IN ($5::bigint)"#), "{sql}");
    assert_eq!(params[4], SqlParam::Integer(7));
}

// ============================================================================
// Facets
// ============================================================================

#[test]
fn test_facet_limit_and_order_are_bound() {
    let (sql, params) = compile_sql(json!({
        "indexName": "products",
        "params": {"facets": "*", "sortFacetValuesBy": "alpha"}
    }));
    assert!(sql.contains(r#"FROM (SELECT "brand"::text AS value"#));
    assert!(sql.contains(r#"FROM (SELECT "color"::text AS value"#));
    assert!(!sql.contains(r#"SELECT "sku"::text"#));
    assert!(sql.contains("ORDER BY value ASC LIMIT $5::bigint"), "{sql}");
    assert_eq!(params[4], SqlParam::Integer(5));
}

#[test]
fn test_filter_only_facet_is_rejected() {
    let fields = rejected_fields(json!({
        "indexName": "products",
        "params": {"facets": ["sku"]}
    }));
    assert_eq!(fields, vec!["facets"]);
}

// ============================================================================
// Validation
// ============================================================================

#[test]
fn test_all_violations_are_reported_together() {
    let fields = rejected_fields(json!({
        "indexName": "products",
        "params": {
            "facetFilters": ["secret:1"],
            "hitsPerPage": 0,
            "page": 101
        }
    }));
    assert!(fields.contains(&"facetFilters".to_string()), "{fields:?}");
    assert!(fields.contains(&"hitsPerPage".to_string()), "{fields:?}");
    assert!(fields.contains(&"page".to_string()), "{fields:?}");
}

#[test]
fn test_offset_ceiling_rejected() {
    let fields = rejected_fields(json!({
        "indexName": "products",
        "params": {"offset": 2500, "length": 2500}
    }));
    assert!(fields.contains(&"offset".to_string()));
}

#[test]
fn test_index_name_rules() {
    assert_eq!(rejected_fields(json!({"indexName": "Products"})), vec!["indexName"]);
    assert_eq!(rejected_fields(json!({"indexName": "?sort=a"})), vec!["indexName"]);
    let long = "a".repeat(201);
    assert_eq!(rejected_fields(json!({"indexName": long})), vec!["indexName"]);
}

#[test]
fn test_unnamed_config_applies_to_other_tables() {
    let compiled = compile(&request(json!({"indexName": "movies"})), &configs()).unwrap();
    let CompiledRequest::Search(search) = compiled else {
        panic!("expected search");
    };
    assert_eq!(search.pagination.limit, 10);
}

// ============================================================================
// Sorting
// ============================================================================

#[test]
fn test_sort_clause() {
    let (sql, _) = compile_sql(json!({
        "indexName": "products?sort=price+desc+nulls+last,name+sideways"
    }));
    assert!(
        sql.contains(r#"ORDER BY "price" DESC NULLS LAST, "name" OFFSET"#),
        "{sql}"
    );
}

// ============================================================================
// Pagination round trip
// ============================================================================

#[test]
fn test_page_metrics_round_trip() {
    for (page, expected_offset) in [(0u32, 0u64), (1, 20), (2, 40)] {
        let compiled = compile(
            &request(json!({
                "indexName": "products",
                "params": {"page": page, "hitsPerPage": 20}
            })),
            &configs(),
        )
        .unwrap();
        let CompiledRequest::Search(search) = compiled else {
            panic!("expected search");
        };
        assert_eq!(search.pagination.offset, expected_offset);

        let hits: Vec<Value> = if page < 2 {
            vec![json!({"name": "x"})]
        } else {
            vec![]
        };
        let response =
            reshape_search(&search, json!({"totalHits": 23, "hits": hits}), "test", 1).unwrap();
        assert_eq!(response.nb_hits, 23);
        assert_eq!(response.nb_pages, Some(2));
        assert_eq!(response.page, Some(page));
        assert_eq!(response.hits.is_empty(), page == 2);
    }
}

#[test]
fn test_offset_mode_omits_page_metrics() {
    let compiled = compile(
        &request(json!({
            "indexName": "products",
            "params": {"offset": 5, "length": 3}
        })),
        &configs(),
    )
    .unwrap();
    let CompiledRequest::Search(search) = compiled else {
        panic!("expected search");
    };
    let response = reshape_search(&search, json!({"totalHits": 9, "hits": []}), "test", 1).unwrap();
    let body = serde_json::to_value(&response).unwrap();
    assert_eq!(body["offset"], json!(5));
    assert_eq!(body["length"], json!(3));
    assert!(body.get("nbPages").is_none());
    assert!(body.get("page").is_none());
}
