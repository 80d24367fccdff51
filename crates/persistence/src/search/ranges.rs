//! Consolidates numeric range comparisons into a union of ranges.
//!
//! Comparisons are sorted by `(attribute, value, operator rank)` and scanned
//! once per attribute. A lower bound arriving while the current range already
//! has an upper bound starts a new range; otherwise it fills (or tightens) the
//! lower slot. An upper bound always replaces the current upper bound.

use crate::search::numeric::NumericOperator;
use crate::search::sql::{CompareOp, Operand, Predicate};

/// One range: any combination of bounds, each optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NumericRange {
    /// `>=`
    pub gte: Option<i64>,
    /// `>`
    pub gt: Option<i64>,
    /// `<`
    pub lt: Option<i64>,
    /// `<=`
    pub lte: Option<i64>,
}

impl NumericRange {
    fn has_upper(&self) -> bool {
        self.lt.is_some() || self.lte.is_some()
    }

    fn set_lower(&mut self, op: NumericOperator, value: i64) {
        self.gte = None;
        self.gt = None;
        match op {
            NumericOperator::Gte => self.gte = Some(value),
            _ => self.gt = Some(value),
        }
    }

    fn set_upper(&mut self, op: NumericOperator, value: i64) {
        self.lt = None;
        self.lte = None;
        match op {
            NumericOperator::Lte => self.lte = Some(value),
            _ => self.lt = Some(value),
        }
    }

    /// Returns true when `value` falls inside the range.
    pub fn contains(&self, value: i64) -> bool {
        self.gte.is_none_or(|b| value >= b)
            && self.gt.is_none_or(|b| value > b)
            && self.lt.is_none_or(|b| value < b)
            && self.lte.is_none_or(|b| value <= b)
    }

    /// Renders the range as a conjunction over `attribute`.
    pub fn to_predicate(&self, attribute: &str) -> Predicate {
        let bounds = [
            (CompareOp::Gte, self.gte),
            (CompareOp::Gt, self.gt),
            (CompareOp::Lt, self.lt),
            (CompareOp::Lte, self.lte),
        ];
        Predicate::And(
            bounds
                .into_iter()
                .filter_map(|(op, bound)| {
                    bound.map(|v| {
                        Predicate::compare(
                            Operand::Column(attribute.to_string()),
                            op,
                            Operand::Integer(v),
                        )
                    })
                })
                .collect(),
        )
    }
}

/// A single range comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeComparison {
    /// Attribute (column) name.
    pub attribute: String,
    /// One of `<`, `<=`, `>`, `>=`.
    pub operator: NumericOperator,
    /// Bound value.
    pub value: i64,
}

/// The merged ranges of one attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeRanges {
    /// Attribute (column) name.
    pub attribute: String,
    /// Union members, in scan order.
    pub ranges: Vec<NumericRange>,
}

impl AttributeRanges {
    /// Renders the union as a disjunction.
    pub fn to_predicate(&self) -> Predicate {
        Predicate::Or(
            self.ranges
                .iter()
                .map(|r| r.to_predicate(&self.attribute))
                .collect(),
        )
    }

    /// Returns true when `value` falls inside any range of the union.
    pub fn contains(&self, value: i64) -> bool {
        self.ranges.iter().any(|r| r.contains(value))
    }
}

/// Merges range comparisons into per-attribute unions, ordered by attribute.
pub fn merge_ranges(mut comparisons: Vec<RangeComparison>) -> Vec<AttributeRanges> {
    comparisons.sort_by(|a, b| {
        a.attribute
            .cmp(&b.attribute)
            .then(a.value.cmp(&b.value))
            .then(a.operator.rank().cmp(&b.operator.rank()))
    });

    let mut merged: Vec<AttributeRanges> = Vec::new();

    for comparison in comparisons {
        let needs_entry = merged
            .last()
            .is_none_or(|last| last.attribute != comparison.attribute);
        if needs_entry {
            merged.push(AttributeRanges {
                attribute: comparison.attribute.clone(),
                ranges: vec![NumericRange::default()],
            });
        }
        let Some(entry) = merged.last_mut() else {
            continue;
        };
        let Some(current) = entry.ranges.last_mut() else {
            continue;
        };

        match comparison.operator {
            NumericOperator::Gte | NumericOperator::Gt => {
                if current.has_upper() {
                    let mut next = NumericRange::default();
                    next.set_lower(comparison.operator, comparison.value);
                    entry.ranges.push(next);
                } else {
                    current.set_lower(comparison.operator, comparison.value);
                }
            }
            NumericOperator::Lt | NumericOperator::Lte => {
                current.set_upper(comparison.operator, comparison.value);
            }
            NumericOperator::Eq | NumericOperator::NotEq => {}
        }
    }

    merged
}
