//! Page/offset resolution and the pagination fields of the response.

use crate::error::ValidationIssue;
use crate::types::{ClientValidation, IndexSettings, SearchParams};

/// Length used in offset mode when the request names none.
pub const DEFAULT_LENGTH: u32 = 20;

/// Which pagination fields the response carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageShape {
    /// `page` / `hitsPerPage` / `nbPages`.
    Page {
        /// Zero-based page number.
        page: u32,
        /// Hits per page.
        hits_per_page: u32,
    },
    /// `offset` / `length`.
    Offset {
        /// Number of hits skipped.
        offset: u32,
        /// Number of hits returned.
        length: u32,
    },
}

/// Resolved pagination of one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationPlan {
    /// Rows skipped.
    pub offset: u64,
    /// Rows returned.
    pub limit: u64,
    /// Response fields.
    pub shape: PageShape,
}

/// Pagination fields derived after execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageMetrics {
    /// Matching rows.
    pub nb_hits: u64,
    /// Page count (page mode only).
    pub nb_pages: Option<u64>,
    /// Echoed page (page mode only).
    pub page: Option<u32>,
    /// Echoed page size (page mode only).
    pub hits_per_page: Option<u32>,
    /// Echoed offset (offset mode only).
    pub offset: Option<u32>,
    /// Echoed length (offset mode only).
    pub length: Option<u32>,
}

impl PaginationPlan {
    /// Resolves the request: offset mode when `offset` is present, page
    /// mode otherwise.
    pub fn resolve(params: &SearchParams, settings: &IndexSettings) -> Self {
        match params.offset {
            Some(offset) => {
                let length = params.length.unwrap_or(DEFAULT_LENGTH);
                Self {
                    offset: u64::from(offset),
                    limit: u64::from(length),
                    shape: PageShape::Offset { offset, length },
                }
            }
            None => {
                let page = params.page.unwrap_or(0);
                let hits_per_page = params.hits_per_page.unwrap_or(settings.hits_per_page);
                Self {
                    offset: u64::from(page) * u64::from(hits_per_page),
                    limit: u64::from(hits_per_page),
                    shape: PageShape::Page {
                        page,
                        hits_per_page,
                    },
                }
            }
        }
    }

    /// Checks the plan against the ceilings; returns every violation.
    pub fn validate(
        &self,
        settings: &IndexSettings,
        validation: &ClientValidation,
    ) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();

        match self.shape {
            PageShape::Page {
                page,
                hits_per_page,
            } => {
                if page > validation.max_page {
                    issues.push(ValidationIssue::new("page", "exceeds maxPage"));
                }
                if hits_per_page == 0 || hits_per_page > validation.max_hits_per_page {
                    issues.push(ValidationIssue::new(
                        "hitsPerPage",
                        "must be between 1 and maxHitsPerPage",
                    ));
                }
            }
            PageShape::Offset { offset, length } => {
                if offset > validation.max_offset {
                    issues.push(ValidationIssue::new("offset", "exceeds maxOffset"));
                }
                if length == 0 || length > validation.max_length {
                    issues.push(ValidationIssue::new(
                        "length",
                        "must be between 1 and maxLength",
                    ));
                }
            }
        }

        let ceiling = u64::from(settings.pagination_limited_to.min(validation.max_hits_total));
        if self.offset + self.limit > ceiling {
            let field = match self.shape {
                PageShape::Page { .. } => "page",
                PageShape::Offset { .. } => "offset",
            };
            issues.push(ValidationIssue::new(
                field,
                format!("offset + limit exceeds {ceiling}"),
            ));
        }

        issues
    }

    /// Derives the response fields from the total hit count.
    pub fn metrics(&self, total_hits: u64) -> PageMetrics {
        match self.shape {
            PageShape::Page {
                page,
                hits_per_page,
            } => PageMetrics {
                nb_hits: total_hits,
                nb_pages: Some(if total_hits == 0 || hits_per_page == 0 {
                    0
                } else {
                    total_hits.div_ceil(u64::from(hits_per_page))
                }),
                page: Some(page),
                hits_per_page: Some(hits_per_page),
                offset: None,
                length: None,
            },
            PageShape::Offset { offset, length } => PageMetrics {
                nb_hits: total_hits,
                nb_pages: None,
                page: None,
                hits_per_page: None,
                offset: Some(offset),
                length: Some(length),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> SearchParams {
        SearchParams::default()
    }

    #[test]
    fn test_page_mode_defaults() {
        let plan = PaginationPlan::resolve(&params(), &IndexSettings::default());
        assert_eq!(plan.offset, 0);
        assert_eq!(plan.limit, 20);
        assert_eq!(
            plan.shape,
            PageShape::Page {
                page: 0,
                hits_per_page: 20
            }
        );
    }

    #[test]
    fn test_page_mode_offset() {
        let mut p = params();
        p.page = Some(2);
        p.hits_per_page = Some(20);
        let plan = PaginationPlan::resolve(&p, &IndexSettings::default());
        assert_eq!(plan.offset, 40);
        assert_eq!(plan.limit, 20);
    }

    #[test]
    fn test_offset_mode_default_length() {
        let mut p = params();
        p.offset = Some(5);
        p.page = Some(3);
        let plan = PaginationPlan::resolve(&p, &IndexSettings::default());
        assert_eq!(plan.offset, 5);
        assert_eq!(plan.limit, 20);
        assert_eq!(
            plan.shape,
            PageShape::Offset {
                offset: 5,
                length: 20
            }
        );
    }

    #[test]
    fn test_nb_pages() {
        let mut p = params();
        p.hits_per_page = Some(20);
        let plan = PaginationPlan::resolve(&p, &IndexSettings::default());
        assert_eq!(plan.metrics(23).nb_pages, Some(2));
        assert_eq!(plan.metrics(40).nb_pages, Some(2));
        assert_eq!(plan.metrics(0).nb_pages, Some(0));
        assert_eq!(plan.metrics(23).nb_hits, 23);
    }

    #[test]
    fn test_offset_mode_omits_page_metrics() {
        let mut p = params();
        p.offset = Some(0);
        p.length = Some(10);
        let metrics = PaginationPlan::resolve(&p, &IndexSettings::default()).metrics(55);
        assert_eq!(metrics.nb_pages, None);
        assert_eq!(metrics.page, None);
        assert_eq!(metrics.offset, Some(0));
        assert_eq!(metrics.length, Some(10));
    }

    #[test]
    fn test_ceiling_rejected() {
        let mut p = params();
        p.offset = Some(2500);
        p.length = Some(2500);
        let validation = ClientValidation {
            max_length: 3000,
            ..Default::default()
        };
        let plan = PaginationPlan::resolve(&p, &IndexSettings::default());
        let issues = plan.validate(&IndexSettings::default(), &validation);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].field, "offset");
    }

    #[test]
    fn test_bounds() {
        let mut p = params();
        p.page = Some(101);
        p.hits_per_page = Some(0);
        let plan = PaginationPlan::resolve(&p, &IndexSettings::default());
        let fields: Vec<String> = plan
            .validate(&IndexSettings::default(), &ClientValidation::default())
            .into_iter()
            .map(|i| i.field)
            .collect();
        assert_eq!(fields, vec!["page", "hitsPerPage"]);

        let mut p = params();
        p.offset = Some(0);
        p.length = Some(101);
        let plan = PaginationPlan::resolve(&p, &IndexSettings::default());
        let issues = plan.validate(&IndexSettings::default(), &ClientValidation::default());
        assert_eq!(issues[0].field, "length");
    }

    #[test]
    fn test_pagination_limited_to_applies() {
        let settings = IndexSettings {
            pagination_limited_to: 100,
            ..Default::default()
        };
        let mut p = params();
        p.page = Some(5);
        p.hits_per_page = Some(20);
        let plan = PaginationPlan::resolve(&p, &settings);
        let issues = plan.validate(&settings, &ClientValidation::default());
        assert_eq!(issues.len(), 1);
        assert!(issues[0].message.contains("100"));
    }
}
