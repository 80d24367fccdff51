//! Numeric filter tokens: `attribute<op>value`.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{SearchboxError, SearchboxResult};
use crate::search::sql::CompareOp;

// Two-character operators come first so `<=` is never read as `<` + `=...`.
static NUMERIC_FILTER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\w+)(<=|>=|!=|<|>|=)([\[\]\d\s,-]+)$").expect("numeric filter regex")
});

/// A numeric comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericOperator {
    /// `<`
    Lt,
    /// `<=`
    Lte,
    /// `>`
    Gt,
    /// `>=`
    Gte,
    /// `=`
    Eq,
    /// `!=`
    NotEq,
}

impl NumericOperator {
    fn parse(op: &str) -> Option<Self> {
        Some(match op {
            "<" => NumericOperator::Lt,
            "<=" => NumericOperator::Lte,
            ">" => NumericOperator::Gt,
            ">=" => NumericOperator::Gte,
            "=" => NumericOperator::Eq,
            "!=" => NumericOperator::NotEq,
            _ => return None,
        })
    }

    /// Position in the merge order `>=, >, <, <=`; equality operators sort last.
    pub fn rank(self) -> u8 {
        match self {
            NumericOperator::Gte => 0,
            NumericOperator::Gt => 1,
            NumericOperator::Lt => 2,
            NumericOperator::Lte => 3,
            NumericOperator::Eq => 4,
            NumericOperator::NotEq => 5,
        }
    }

    /// The SQL comparison for range operators.
    pub fn compare_op(self) -> CompareOp {
        match self {
            NumericOperator::Lt => CompareOp::Lt,
            NumericOperator::Lte => CompareOp::Lte,
            NumericOperator::Gt => CompareOp::Gt,
            NumericOperator::Gte => CompareOp::Gte,
            NumericOperator::Eq => CompareOp::Eq,
            NumericOperator::NotEq => CompareOp::NotEq,
        }
    }
}

/// The right-hand side of a numeric filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NumericValue {
    /// A single integer.
    Single(i64),
    /// A bracketed list of integers.
    List(Vec<i64>),
}

impl NumericValue {
    /// All values as a list.
    pub fn values(&self) -> Vec<i64> {
        match self {
            NumericValue::Single(v) => vec![*v],
            NumericValue::List(values) => values.clone(),
        }
    }
}

/// A parsed numeric filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumericFilter {
    /// Attribute (column) name.
    pub attribute: String,
    /// Comparison operator.
    pub operator: NumericOperator,
    /// Value or list of values.
    pub value: NumericValue,
}

impl NumericFilter {
    /// Parses a single token.
    pub fn parse(token: &str) -> SearchboxResult<Self> {
        let caps = NUMERIC_FILTER
            .captures(token)
            .ok_or_else(|| SearchboxError::malformed(token, "expected attribute<op>value"))?;

        let attribute = caps[1].to_string();
        let operator = NumericOperator::parse(&caps[2])
            .ok_or_else(|| SearchboxError::malformed(token, "unknown operator"))?;
        let value = parse_value(token, caps[3].trim())?;

        Ok(Self {
            attribute,
            operator,
            value,
        })
    }

    /// Parses every token, failing on the first malformed one.
    pub fn parse_all(tokens: &[String]) -> SearchboxResult<Vec<Self>> {
        tokens.iter().map(|t| Self::parse(t)).collect()
    }
}

fn parse_value(token: &str, raw: &str) -> SearchboxResult<NumericValue> {
    if let Some(inner) = raw.strip_prefix('[').and_then(|r| r.strip_suffix(']')) {
        let values = inner
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| parse_integer(token, s))
            .collect::<SearchboxResult<Vec<i64>>>()?;
        if values.is_empty() {
            return Err(SearchboxError::malformed(token, "empty value list"));
        }
        return Ok(NumericValue::List(values));
    }
    if raw.contains(['[', ']', ',']) {
        return Err(SearchboxError::malformed(token, "unbalanced value list"));
    }
    parse_integer(token, raw).map(NumericValue::Single)
}

fn parse_integer(token: &str, raw: &str) -> SearchboxResult<i64> {
    let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    compact
        .parse::<i64>()
        .map_err(|_| SearchboxError::malformed(token, format!("'{raw}' is not an integer")))
}
