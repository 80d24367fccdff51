//! SQL building blocks shared by every emitter.
//!
//! Identifiers go through [`quote_ident`]; literals never appear in SQL text
//! at all, they are bound through [`SqlWriter`] as `$N` parameters. Filter
//! predicates are built as a small [`Predicate`] tree and rendered in one
//! place.

use std::fmt;

/// Quotes an identifier, doubling embedded double quotes.
pub fn quote_ident(name: &str) -> String {
    let mut quoted = String::with_capacity(name.len() + 2);
    quoted.push('"');
    for c in name.chars() {
        if c == '"' {
            quoted.push('"');
        }
        quoted.push(c);
    }
    quoted.push('"');
    quoted
}

/// A bound parameter value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlParam {
    /// Text parameter, rendered as `$N::text`.
    Text(String),
    /// Integer parameter, rendered as `$N::bigint`.
    Integer(i64),
}

impl SqlParam {
    fn cast(&self) -> &'static str {
        match self {
            SqlParam::Text(_) => "text",
            SqlParam::Integer(_) => "bigint",
        }
    }
}

/// Collects bound parameters while SQL text is assembled.
#[derive(Debug, Default)]
pub struct SqlWriter {
    params: Vec<SqlParam>,
}

impl SqlWriter {
    /// Creates an empty writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds a parameter and returns its typed placeholder.
    pub fn bind(&mut self, param: SqlParam) -> String {
        let cast = param.cast();
        self.params.push(param);
        format!("${}::{}", self.params.len(), cast)
    }

    /// Binds a text parameter.
    pub fn text(&mut self, value: impl Into<String>) -> String {
        self.bind(SqlParam::Text(value.into()))
    }

    /// Binds an integer parameter.
    pub fn integer(&mut self, value: i64) -> String {
        self.bind(SqlParam::Integer(value))
    }

    /// Number of parameters bound so far.
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Returns true when nothing was bound.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Pairs the finished SQL with the collected parameters.
    pub fn finish(self, sql: String) -> QueryPlan {
        QueryPlan {
            sql,
            params: self.params,
        }
    }
}

/// An executable statement: SQL text plus its ordered parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryPlan {
    /// SQL with `$N` placeholders.
    pub sql: String,
    /// Parameter values, `$1` first.
    pub params: Vec<SqlParam>,
}

/// The value side or column side of a comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    /// A column compared in its own type.
    Column(String),
    /// A column cast to text.
    ColumnText(String),
    /// A text literal.
    Text(String),
    /// An integer literal.
    Integer(i64),
}

impl Operand {
    fn render(&self, w: &mut SqlWriter) -> String {
        match self {
            Operand::Column(name) => quote_ident(name),
            Operand::ColumnText(name) => format!("{}::text", quote_ident(name)),
            Operand::Text(value) => w.text(value.clone()),
            Operand::Integer(value) => w.integer(*value),
        }
    }
}

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    /// `=`
    Eq,
    /// `<>`
    NotEq,
    /// `<`
    Lt,
    /// `<=`
    Lte,
    /// `>`
    Gt,
    /// `>=`
    Gte,
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CompareOp::Eq => "=",
            CompareOp::NotEq => "<>",
            CompareOp::Lt => "<",
            CompareOp::Lte => "<=",
            CompareOp::Gt => ">",
            CompareOp::Gte => ">=",
        })
    }
}

/// A boolean predicate over typed operands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// `left op right`
    Compare {
        /// Left-hand operand.
        left: Operand,
        /// Comparison operator.
        op: CompareOp,
        /// Right-hand operand.
        right: Operand,
    },
    /// `operand [NOT] IN (values)`
    In {
        /// Tested operand.
        operand: Operand,
        /// Candidate values; empty renders as `FALSE` (or `TRUE` negated).
        values: Vec<Operand>,
        /// `NOT IN` when set.
        negated: bool,
    },
    /// Conjunction; empty renders as `TRUE`.
    And(Vec<Predicate>),
    /// Disjunction; empty renders as `FALSE`.
    Or(Vec<Predicate>),
}

impl Predicate {
    /// Shorthand for a comparison.
    pub fn compare(left: Operand, op: CompareOp, right: Operand) -> Self {
        Predicate::Compare { left, op, right }
    }

    /// Renders the predicate, binding every literal through `w`.
    pub fn render(&self, w: &mut SqlWriter) -> String {
        match self {
            Predicate::Compare { left, op, right } => {
                let left = left.render(w);
                let right = right.render(w);
                format!("{left} {op} {right}")
            }
            Predicate::In {
                operand,
                values,
                negated,
            } => {
                if values.is_empty() {
                    return if *negated { "TRUE" } else { "FALSE" }.to_string();
                }
                let operand = operand.render(w);
                let values: Vec<String> = values.iter().map(|v| v.render(w)).collect();
                let keyword = if *negated { "NOT IN" } else { "IN" };
                format!("{operand} {keyword} ({})", values.join(", "))
            }
            Predicate::And(children) => render_group(children, " AND ", "TRUE", w),
            Predicate::Or(children) => render_group(children, " OR ", "FALSE", w),
        }
    }
}

fn render_group(children: &[Predicate], separator: &str, empty: &str, w: &mut SqlWriter) -> String {
    match children {
        [] => empty.to_string(),
        [only] => only.render(w),
        _ => {
            let parts: Vec<String> = children.iter().map(|c| c.render(w)).collect();
            format!("({})", parts.join(separator))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_ident() {
        assert_eq!(quote_ident("brand"), r#""brand""#);
        assert_eq!(quote_ident(r#"a"b"#), r#""a""b""#);
        assert_eq!(
            quote_ident(r#"x"; DROP TABLE users; --"#),
            r#""x""; DROP TABLE users; --""#
        );
    }

    #[test]
    fn test_writer_numbers_placeholders() {
        let mut w = SqlWriter::new();
        assert_eq!(w.text("a"), "$1::text");
        assert_eq!(w.integer(5), "$2::bigint");
        let plan = w.finish("SELECT 1".to_string());
        assert_eq!(
            plan.params,
            vec![SqlParam::Text("a".into()), SqlParam::Integer(5)]
        );
    }

    #[test]
    fn test_literals_never_reach_sql_text() {
        let mut w = SqlWriter::new();
        let p = Predicate::compare(
            Operand::ColumnText("brand".into()),
            CompareOp::Eq,
            Operand::Text("O'Reilly'); DROP TABLE x; --".into()),
        );
        let sql = p.render(&mut w);
        assert_eq!(sql, r#""brand"::text = $1::text"#);
        assert!(!sql.contains("DROP"));
    }

    #[test]
    fn test_groups() {
        let mut w = SqlWriter::new();
        let p = Predicate::And(vec![
            Predicate::In {
                operand: Operand::ColumnText("color".into()),
                values: vec![Operand::Text("red".into()), Operand::Text("blue".into())],
                negated: false,
            },
            Predicate::Or(vec![
                Predicate::compare(
                    Operand::Column("price".into()),
                    CompareOp::Gte,
                    Operand::Integer(10),
                ),
                Predicate::compare(
                    Operand::Column("price".into()),
                    CompareOp::Lt,
                    Operand::Integer(2),
                ),
            ]),
        ]);
        assert_eq!(
            p.render(&mut w),
            r#"("color"::text IN ($1::text, $2::text) AND ("price" >= $3::bigint OR "price" < $4::bigint))"#
        );
        assert_eq!(w.len(), 4);
    }

    #[test]
    fn test_single_child_and_empty_groups() {
        let mut w = SqlWriter::new();
        let single = Predicate::Or(vec![Predicate::compare(
            Operand::Column("a".into()),
            CompareOp::NotEq,
            Operand::Integer(1),
        )]);
        assert_eq!(single.render(&mut w), r#""a" <> $1::bigint"#);
        assert_eq!(Predicate::And(vec![]).render(&mut w), "TRUE");
        assert_eq!(Predicate::Or(vec![]).render(&mut w), "FALSE");
        let empty_in = Predicate::In {
            operand: Operand::Column("a".into()),
            values: vec![],
            negated: true,
        };
        assert_eq!(empty_in.render(&mut w), "TRUE");
    }
}
