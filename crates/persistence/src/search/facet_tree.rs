//! Facet filter trees and per-attribute refinement buckets.
//!
//! The raw nested array is converted once into a [`FilterNode`] tree whose
//! groups carry their combinator. Leaves directly under the top-level array
//! are conjunctive, leaves nested one array deeper or more are disjunctive,
//! and a `-` prefix negates a leaf at any depth.

use crate::error::{SearchboxError, SearchboxResult};
use crate::types::RawFilter;

/// How the leaves of a group combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// Conjunctive (`AND` / `AND NOT`).
    And,
    /// Disjunctive (`OR`).
    Or,
}

/// A facet filter expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterNode {
    /// `attribute:value` or `attribute:-value`.
    Leaf {
        /// Text before the first `:`.
        attribute: String,
        /// Text after the first `:`, without the negation prefix.
        value: String,
        /// The value carried a leading `-`.
        negated: bool,
    },
    /// A nested array.
    Group {
        /// Nested expressions.
        children: Vec<FilterNode>,
        /// How the leaves directly under this group combine.
        combinator: Combinator,
    },
}

impl FilterNode {
    /// Builds the tree from the raw client expression.
    pub fn from_raw(raw: &RawFilter) -> SearchboxResult<Self> {
        Self::build(raw, 0)
    }

    fn build(raw: &RawFilter, depth: usize) -> SearchboxResult<Self> {
        match raw {
            RawFilter::Leaf(token) => Self::parse_leaf(token),
            RawFilter::Group(items) => {
                // Children of the outermost array sit at depth 1.
                let combinator = if depth == 0 {
                    Combinator::And
                } else {
                    Combinator::Or
                };
                let children = items
                    .iter()
                    .map(|item| Self::build(item, depth + 1))
                    .collect::<SearchboxResult<Vec<_>>>()?;
                Ok(FilterNode::Group {
                    children,
                    combinator,
                })
            }
        }
    }

    fn parse_leaf(token: &str) -> SearchboxResult<Self> {
        let (attribute, value) = token
            .split_once(':')
            .ok_or_else(|| SearchboxError::malformed(token, "expected attribute:value"))?;
        if attribute.is_empty() {
            return Err(SearchboxError::malformed(token, "empty attribute"));
        }
        let (value, negated) = match value.strip_prefix('-') {
            Some(stripped) => (stripped, true),
            None => (value, false),
        };
        Ok(FilterNode::Leaf {
            attribute: attribute.to_string(),
            value: value.to_string(),
            negated,
        })
    }

    /// Every attribute named by a leaf, in order of appearance.
    pub fn attributes(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_attributes(&mut out);
        out
    }

    fn collect_attributes<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            FilterNode::Leaf { attribute, .. } => {
                if !out.contains(&attribute.as_str()) {
                    out.push(attribute);
                }
            }
            FilterNode::Group { children, .. } => {
                for child in children {
                    child.collect_attributes(out);
                }
            }
        }
    }
}

/// A literal compared against a column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FacetValue {
    /// Compared against the column's text form.
    Text(String),
    /// Compared against the column directly.
    Number(i64),
}

/// The refinement buckets of one attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Refinement {
    /// Attribute (column) name.
    pub attribute: String,
    /// Values any of which may match.
    pub or: Vec<FacetValue>,
    /// Values each of which must match.
    pub and: Vec<FacetValue>,
    /// Values none of which may match.
    pub and_not: Vec<FacetValue>,
}

impl Refinement {
    fn new(attribute: &str) -> Self {
        Self {
            attribute: attribute.to_string(),
            or: Vec::new(),
            and: Vec::new(),
            and_not: Vec::new(),
        }
    }

    /// Returns true when every bucket is empty.
    pub fn is_empty(&self) -> bool {
        self.or.is_empty() && self.and.is_empty() && self.and_not.is_empty()
    }
}

/// Refinements of every attribute, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Refinements {
    entries: Vec<Refinement>,
}

impl Refinements {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    fn entry(&mut self, attribute: &str) -> &mut Refinement {
        let index = match self.entries.iter().position(|r| r.attribute == attribute) {
            Some(index) => index,
            None => {
                self.entries.push(Refinement::new(attribute));
                self.entries.len() - 1
            }
        };
        &mut self.entries[index]
    }

    /// Routes every leaf of `node` into its bucket.
    pub fn add_filter_tree(&mut self, node: &FilterNode) {
        self.walk(node, Combinator::And);
    }

    fn walk(&mut self, node: &FilterNode, parent: Combinator) {
        match node {
            FilterNode::Leaf {
                attribute,
                value,
                negated,
            } => {
                let value = FacetValue::Text(value.clone());
                let entry = self.entry(attribute);
                match (negated, parent) {
                    (true, _) => entry.and_not.push(value),
                    (false, Combinator::And) => entry.and.push(value),
                    (false, Combinator::Or) => entry.or.push(value),
                }
            }
            FilterNode::Group {
                children,
                combinator,
            } => {
                for child in children {
                    self.walk(child, *combinator);
                }
            }
        }
    }

    /// Adds `attribute = value` alternatives (numeric `=`).
    pub fn add_equal(&mut self, attribute: &str, values: impl IntoIterator<Item = i64>) {
        self.entry(attribute)
            .or
            .extend(values.into_iter().map(FacetValue::Number));
    }

    /// Adds `attribute != value` exclusions (numeric `!=`).
    pub fn add_not_equal(&mut self, attribute: &str, values: impl IntoIterator<Item = i64>) {
        self.entry(attribute)
            .and_not
            .extend(values.into_iter().map(FacetValue::Number));
    }

    /// Iterates the refinements in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = &Refinement> {
        self.entries.iter()
    }

    /// Looks up one attribute.
    pub fn get(&self, attribute: &str) -> Option<&Refinement> {
        self.entries.iter().find(|r| r.attribute == attribute)
    }

    /// Returns true when nothing was added.
    pub fn is_empty(&self) -> bool {
        self.entries.iter().all(Refinement::is_empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(s: &str) -> RawFilter {
        RawFilter::Leaf(s.to_string())
    }

    fn group(items: Vec<RawFilter>) -> RawFilter {
        RawFilter::Group(items)
    }

    fn text(s: &str) -> FacetValue {
        FacetValue::Text(s.to_string())
    }

    fn refinements(raw: RawFilter) -> Refinements {
        let tree = FilterNode::from_raw(&raw).unwrap();
        let mut r = Refinements::new();
        r.add_filter_tree(&tree);
        r
    }

    #[test]
    fn test_top_level_leaves_are_conjunctive() {
        let r = refinements(group(vec![leaf("brand:Jacobi LLC"), leaf("brand:-test")]));
        let brand = r.get("brand").unwrap();
        assert_eq!(brand.and, vec![text("Jacobi LLC")]);
        assert_eq!(brand.and_not, vec![text("test")]);
        assert!(brand.or.is_empty());
    }

    #[test]
    fn test_nested_leaves_are_disjunctive() {
        let r = refinements(group(vec![
            group(vec![leaf("color:red"), leaf("color:blue")]),
            leaf("brand:Acme"),
        ]));
        assert_eq!(r.get("color").unwrap().or, vec![text("red"), text("blue")]);
        assert_eq!(r.get("brand").unwrap().and, vec![text("Acme")]);
    }

    #[test]
    fn test_depth_beyond_two_stays_disjunctive() {
        let r = refinements(group(vec![group(vec![group(vec![
            leaf("size:S"),
            leaf("size:M"),
        ])])]));
        assert_eq!(r.get("size").unwrap().or, vec![text("S"), text("M")]);
    }

    #[test]
    fn test_bare_leaf_is_conjunctive() {
        let r = refinements(leaf("brand:Acme"));
        assert_eq!(r.get("brand").unwrap().and, vec![text("Acme")]);
    }

    #[test]
    fn test_negation_at_any_depth() {
        let r = refinements(group(vec![group(vec![leaf("color:-red")])]));
        assert_eq!(r.get("color").unwrap().and_not, vec![text("red")]);
    }

    #[test]
    fn test_split_on_first_colon_only() {
        let r = refinements(leaf("url:https://example.com"));
        assert_eq!(
            r.get("url").unwrap().and,
            vec![text("https://example.com")]
        );
    }

    #[test]
    fn test_attribute_in_several_buckets_keeps_first_seen_order() {
        let r = refinements(group(vec![
            leaf("brand:A"),
            leaf("color:red"),
            group(vec![leaf("brand:B"), leaf("brand:C")]),
        ]));
        let order: Vec<&str> = r.iter().map(|e| e.attribute.as_str()).collect();
        assert_eq!(order, vec!["brand", "color"]);
        let brand = r.get("brand").unwrap();
        assert_eq!(brand.and, vec![text("A")]);
        assert_eq!(brand.or, vec![text("B"), text("C")]);
    }

    #[test]
    fn test_malformed_leaves() {
        for bad in ["no-colon", ":value"] {
            let err = FilterNode::from_raw(&group(vec![leaf(bad)])).unwrap_err();
            assert!(matches!(err, SearchboxError::MalformedFilter { .. }));
        }
    }

    #[test]
    fn test_attributes_listed_once() {
        let tree = FilterNode::from_raw(&group(vec![
            leaf("brand:A"),
            group(vec![leaf("color:red"), leaf("brand:B")]),
        ]))
        .unwrap();
        assert_eq!(tree.attributes(), vec!["brand", "color"]);
    }

    #[test]
    fn test_numeric_equalities() {
        let mut r = Refinements::new();
        r.add_equal("year", [1999, 2001]);
        r.add_not_equal("year", [2000]);
        let year = r.get("year").unwrap();
        assert_eq!(year.or, vec![FacetValue::Number(1999), FacetValue::Number(2001)]);
        assert_eq!(year.and_not, vec![FacetValue::Number(2000)]);
    }
}
