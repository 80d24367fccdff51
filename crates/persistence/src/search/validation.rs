//! Per-request validation against the index's allow-lists and ceilings.
//!
//! Every check runs and every violation is collected, so a rejected request
//! names all of its offending fields at once.

use std::sync::LazyLock;

use regex::Regex;

use crate::constants::MAX_INDEX_NAME_LENGTH;
use crate::error::ValidationIssue;
use crate::search::filters::Filters;
use crate::search::pagination::PaginationPlan;
use crate::types::{
    FacetKind, FacetSelection, IndexConfig, RawSearchRequest, RequestMode, SearchParams, allows,
};

static INDEX_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9_?,=+]+$").expect("index name regex"));

/// Checks the shape of an index identifier.
pub fn validate_index_name(index_name: &str) -> Option<ValidationIssue> {
    if index_name.is_empty() || index_name.len() > MAX_INDEX_NAME_LENGTH {
        return Some(ValidationIssue::new(
            "indexName",
            format!("length must be between 1 and {MAX_INDEX_NAME_LENGTH}"),
        ));
    }
    if !INDEX_NAME.is_match(index_name) {
        return Some(ValidationIssue::new(
            "indexName",
            "may only contain a-z, 0-9 and _ ? , = +",
        ));
    }
    None
}

/// Everything a request is checked against.
pub struct RequestValidator<'a> {
    /// The raw request (mode and facet).
    pub request: &'a RawSearchRequest,
    /// Decoded params.
    pub params: &'a SearchParams,
    /// The resolved index configuration.
    pub config: &'a IndexConfig,
    /// Parsed filters.
    pub filters: &'a Filters,
    /// Resolved pagination.
    pub pagination: &'a PaginationPlan,
}

impl RequestValidator<'_> {
    /// Runs every check.
    pub fn issues(&self) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();
        self.check_attributes(&mut issues);
        self.check_tags(&mut issues);
        self.check_filters(&mut issues);
        issues.extend(
            self.pagination
                .validate(&self.config.settings, &self.config.client_validation),
        );
        self.check_facets(&mut issues);
        if self.request.mode() == RequestMode::FacetSearch {
            self.check_facet_search(&mut issues);
        }
        issues
    }

    fn check_attributes(&self, issues: &mut Vec<ValidationIssue>) {
        let settings = &self.config.settings;
        let validation = &self.config.client_validation;

        let retrieve = self
            .params
            .attributes_to_retrieve
            .as_ref()
            .unwrap_or(&settings.attributes_to_retrieve);
        if !retrieve
            .iter()
            .all(|a| allows(&validation.valid_attributes_to_retrieve, a))
        {
            issues.push(ValidationIssue::new(
                "attributesToRetrieve",
                "not contained by validAttributesToRetrieve",
            ));
        }

        let highlight = self
            .params
            .attributes_to_highlight
            .as_ref()
            .unwrap_or(&settings.attributes_to_highlight);
        if !highlight
            .iter()
            .all(|a| allows(&validation.valid_attributes_to_highlight, a))
        {
            issues.push(ValidationIssue::new(
                "attributesToHighlight",
                "not contained by validAttributesToHighlight",
            ));
        }
    }

    fn check_tags(&self, issues: &mut Vec<ValidationIssue>) {
        let settings = &self.config.settings;
        let validation = &self.config.client_validation;

        let pre = self
            .params
            .highlight_pre_tag
            .as_deref()
            .unwrap_or(&settings.highlight_pre_tag);
        if !allows(&validation.valid_highlight_pre_tags, pre) {
            issues.push(ValidationIssue::new(
                "highlightPreTag",
                "not in validHighlightPreTags",
            ));
        }

        let post = self
            .params
            .highlight_post_tag
            .as_deref()
            .unwrap_or(&settings.highlight_post_tag);
        if !allows(&validation.valid_highlight_post_tags, post) {
            issues.push(ValidationIssue::new(
                "highlightPostTag",
                "not in validHighlightPostTags",
            ));
        }
    }

    fn check_filters(&self, issues: &mut Vec<ValidationIssue>) {
        let valid = &self.config.client_validation.valid_facet_filters;
        if !self.filters.facet_attributes.iter().all(|a| allows(valid, a)) {
            issues.push(ValidationIssue::new(
                "facetFilters",
                "attribute not in validFacetFilters",
            ));
        }
        if !self
            .filters
            .numeric_attributes
            .iter()
            .all(|a| allows(valid, a))
        {
            issues.push(ValidationIssue::new(
                "numericFilters",
                "attribute not in validFacetFilters",
            ));
        }
    }

    fn check_facets(&self, issues: &mut Vec<ValidationIssue>) {
        if let FacetSelection::Attributes(names) = &self.params.facets {
            let countable = self.config.settings.countable_facets();
            if !names.iter().all(|n| countable.contains(n)) {
                issues.push(ValidationIssue::new(
                    "facets",
                    "attribute is not declared for faceting",
                ));
            }
        }
    }

    fn check_facet_search(&self, issues: &mut Vec<ValidationIssue>) {
        let searchable = self
            .request
            .facet
            .as_deref()
            .filter(|f| !f.is_empty())
            .and_then(|f| self.config.settings.facet_declaration(f))
            .is_some_and(|d| d.kind == FacetKind::Searchable);
        if !searchable {
            issues.push(ValidationIssue::new(
                "facet",
                "must name a searchable facet",
            ));
        }
        if self.params.facet_query.is_none() {
            issues.push(ValidationIssue::new("facetQuery", "required for facet search"));
        }
    }
}
