//! Renders facet and numeric filters into one WHERE predicate.

use crate::error::{SearchboxError, SearchboxResult};
use crate::search::facet_tree::{FacetValue, FilterNode, Refinement, Refinements};
use crate::search::numeric::{NumericFilter, NumericOperator, NumericValue};
use crate::search::ranges::{AttributeRanges, RangeComparison, merge_ranges};
use crate::search::sql::{CompareOp, Operand, Predicate};
use crate::types::RawFilter;

/// Parsed filters of one request.
#[derive(Debug, Clone, Default)]
pub struct Filters {
    /// Facet refinements and numeric equalities.
    pub refinements: Refinements,
    /// Merged numeric ranges, ordered by attribute.
    pub ranges: Vec<AttributeRanges>,
    /// Attributes named in `facetFilters`, first-seen order.
    pub facet_attributes: Vec<String>,
    /// Attributes named in `numericFilters`, first-seen order.
    pub numeric_attributes: Vec<String>,
}

impl Filters {
    /// Parses `facetFilters` and `numericFilters`.
    pub fn parse(
        facet_filters: Option<&RawFilter>,
        numeric_filters: &[String],
    ) -> SearchboxResult<Self> {
        let mut refinements = Refinements::new();
        let mut facet_attributes = Vec::new();
        if let Some(raw) = facet_filters {
            let tree = FilterNode::from_raw(raw)?;
            facet_attributes = tree.attributes().into_iter().map(String::from).collect();
            refinements.add_filter_tree(&tree);
        }

        let mut comparisons = Vec::new();
        let mut numeric_attributes: Vec<String> = Vec::new();
        for (token, filter) in numeric_filters
            .iter()
            .zip(NumericFilter::parse_all(numeric_filters)?)
        {
            if !numeric_attributes.contains(&filter.attribute) {
                numeric_attributes.push(filter.attribute.clone());
            }
            match (filter.operator, filter.value) {
                (NumericOperator::Eq, value) => {
                    refinements.add_equal(&filter.attribute, value.values())
                }
                (NumericOperator::NotEq, value) => {
                    refinements.add_not_equal(&filter.attribute, value.values())
                }
                (operator, NumericValue::Single(value)) => comparisons.push(RangeComparison {
                    attribute: filter.attribute,
                    operator,
                    value,
                }),
                (_, NumericValue::List(_)) => {
                    return Err(SearchboxError::malformed(
                        token.as_str(),
                        "range operators take a single value",
                    ));
                }
            }
        }

        Ok(Self {
            refinements,
            ranges: merge_ranges(comparisons),
            facet_attributes,
            numeric_attributes,
        })
    }

    /// The combined predicate, or `None` when nothing filters.
    pub fn to_predicate(&self) -> Option<Predicate> {
        let mut parts: Vec<Predicate> = self
            .refinements
            .iter()
            .filter(|r| !r.is_empty())
            .map(refinement_predicate)
            .collect();
        parts.extend(self.ranges.iter().map(AttributeRanges::to_predicate));

        if parts.is_empty() {
            None
        } else {
            Some(Predicate::And(parts))
        }
    }
}

fn split_values(values: &[FacetValue]) -> (Vec<Operand>, Vec<Operand>) {
    let mut texts = Vec::new();
    let mut numbers = Vec::new();
    for value in values {
        match value {
            FacetValue::Text(t) => texts.push(Operand::Text(t.clone())),
            FacetValue::Number(n) => numbers.push(Operand::Integer(*n)),
        }
    }
    (texts, numbers)
}

fn membership(attribute: &str, values: &[FacetValue], negated: bool) -> Vec<Predicate> {
    let (texts, numbers) = split_values(values);
    let mut parts = Vec::new();
    if !texts.is_empty() {
        parts.push(Predicate::In {
            operand: Operand::ColumnText(attribute.to_string()),
            values: texts,
            negated,
        });
    }
    if !numbers.is_empty() {
        parts.push(Predicate::In {
            operand: Operand::Column(attribute.to_string()),
            values: numbers,
            negated,
        });
    }
    parts
}

fn equality(attribute: &str, value: &FacetValue) -> Predicate {
    match value {
        FacetValue::Text(t) => Predicate::compare(
            Operand::ColumnText(attribute.to_string()),
            CompareOp::Eq,
            Operand::Text(t.clone()),
        ),
        FacetValue::Number(n) => Predicate::compare(
            Operand::Column(attribute.to_string()),
            CompareOp::Eq,
            Operand::Integer(*n),
        ),
    }
}

fn refinement_predicate(refinement: &Refinement) -> Predicate {
    let attribute = refinement.attribute.as_str();
    let mut parts = Vec::new();

    if !refinement.or.is_empty() {
        parts.push(Predicate::Or(membership(attribute, &refinement.or, false)));
    }
    parts.extend(refinement.and.iter().map(|v| equality(attribute, v)));
    parts.extend(membership(attribute, &refinement.and_not, true));

    Predicate::And(parts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::sql::{SqlParam, SqlWriter};

    fn render(filters: &Filters) -> (String, Vec<SqlParam>) {
        let mut w = SqlWriter::new();
        let sql = filters
            .to_predicate()
            .map(|p| p.render(&mut w))
            .unwrap_or_default();
        let plan = w.finish(sql);
        (plan.sql, plan.params)
    }

    fn leaves(items: &[&str]) -> RawFilter {
        RawFilter::Group(
            items
                .iter()
                .map(|s| RawFilter::Leaf(s.to_string()))
                .collect(),
        )
    }

    #[test]
    fn test_no_filters() {
        let filters = Filters::parse(None, &[]).unwrap();
        assert!(filters.to_predicate().is_none());
    }

    #[test]
    fn test_and_with_exclusion() {
        let raw = leaves(&["brand:Jacobi LLC", "brand:-test"]);
        let filters = Filters::parse(Some(&raw), &[]).unwrap();
        let (sql, params) = render(&filters);
        assert_eq!(
            sql,
            r#"("brand"::text = $1::text AND "brand"::text NOT IN ($2::text))"#
        );
        assert_eq!(
            params,
            vec![
                SqlParam::Text("Jacobi LLC".into()),
                SqlParam::Text("test".into())
            ]
        );
    }

    #[test]
    fn test_or_group() {
        let raw = RawFilter::Group(vec![leaves(&["color:red", "color:blue"])]);
        let filters = Filters::parse(Some(&raw), &[]).unwrap();
        let (sql, _) = render(&filters);
        assert_eq!(sql, r#""color"::text IN ($1::text, $2::text)"#);
    }

    #[test]
    fn test_numeric_range_and_equalities() {
        let filters = Filters::parse(
            None,
            &[
                "price>=10".to_string(),
                "price<=20".to_string(),
                "year=[1999,2001]".to_string(),
                "year!=2000".to_string(),
            ],
        )
        .unwrap();
        let (sql, params) = render(&filters);
        assert_eq!(
            sql,
            r#"(("year" IN ($1::bigint, $2::bigint) AND "year" NOT IN ($3::bigint)) AND ("price" >= $4::bigint AND "price" <= $5::bigint))"#
        );
        assert_eq!(params.len(), 5);
        assert_eq!(filters.numeric_attributes, vec!["price", "year"]);
        assert!(filters.facet_attributes.is_empty());
    }

    #[test]
    fn test_range_with_list_is_malformed() {
        let err = Filters::parse(None, &["price>[1,2]".to_string()]).unwrap_err();
        assert!(matches!(err, SearchboxError::MalformedFilter { .. }));
    }

    #[test]
    fn test_mixed_text_and_numeric_or_bucket() {
        let raw = RawFilter::Group(vec![leaves(&["year:unknown"])]);
        let filters = Filters::parse(Some(&raw), &["year=2001".to_string()]).unwrap();
        let (sql, _) = render(&filters);
        assert_eq!(
            sql,
            r#"("year"::text IN ($1::text) OR "year" IN ($2::bigint))"#
        );
    }
}
