//! Table and ORDER BY resolution from the index identifier.
//!
//! An index identifier is `table[?sort=col [ASC|DESC] [NULLS FIRST|LAST],...]`.

use crate::error::{SearchboxError, SearchboxResult};
use crate::search::sql::quote_ident;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// `ASC`
    Asc,
    /// `DESC`
    Desc,
}

/// Placement of NULLs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nulls {
    /// `NULLS FIRST`
    First,
    /// `NULLS LAST`
    Last,
}

/// One ORDER BY key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    /// Column name.
    pub column: String,
    /// Direction, when given.
    pub direction: Option<Direction>,
    /// NULL placement, when given.
    pub nulls: Option<Nulls>,
}

impl SortKey {
    fn parse(spec: &str) -> Option<Self> {
        let mut words = spec.split_whitespace();
        let column = words.next()?.to_string();
        let mut key = SortKey {
            column,
            direction: None,
            nulls: None,
        };

        let rest: Vec<String> = words.map(str::to_ascii_uppercase).collect();
        let mut i = 0;
        while i < rest.len() {
            match rest[i].as_str() {
                "ASC" => key.direction = Some(Direction::Asc),
                "DESC" => key.direction = Some(Direction::Desc),
                "NULLS" => match rest.get(i + 1).map(String::as_str) {
                    Some("FIRST") => {
                        key.nulls = Some(Nulls::First);
                        i += 1;
                    }
                    Some("LAST") => {
                        key.nulls = Some(Nulls::Last);
                        i += 1;
                    }
                    _ => {}
                },
                // Unknown modifiers are ignored.
                _ => {}
            }
            i += 1;
        }
        Some(key)
    }

    fn render(&self) -> String {
        let mut out = quote_ident(&self.column);
        match self.direction {
            Some(Direction::Asc) => out.push_str(" ASC"),
            Some(Direction::Desc) => out.push_str(" DESC"),
            None => {}
        }
        match self.nulls {
            Some(Nulls::First) => out.push_str(" NULLS FIRST"),
            Some(Nulls::Last) => out.push_str(" NULLS LAST"),
            None => {}
        }
        out
    }
}

/// The table and sort encoded in an index identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSort {
    /// Table name.
    pub table: String,
    /// ORDER BY keys; empty means natural order.
    pub keys: Vec<SortKey>,
}

impl TableSort {
    /// Splits `index_name` on the first `?` and decodes its `sort` key.
    pub fn parse(index_name: &str) -> SearchboxResult<Self> {
        let (table, query) = match index_name.split_once('?') {
            Some((table, query)) => (table, Some(query)),
            None => (index_name, None),
        };
        if table.is_empty() {
            return Err(SearchboxError::rejected("indexName", "missing table name"));
        }

        let keys = query
            .and_then(|q| {
                url::form_urlencoded::parse(q.as_bytes())
                    .find(|(k, _)| k == "sort")
                    .map(|(_, v)| v.into_owned())
            })
            .map(|sort| sort.split(',').filter_map(SortKey::parse).collect())
            .unwrap_or_default();

        Ok(Self {
            table: table.to_string(),
            keys,
        })
    }

    /// `ORDER BY ...`, or `None` for natural order.
    pub fn order_by(&self) -> Option<String> {
        if self.keys.is_empty() {
            return None;
        }
        let keys: Vec<String> = self.keys.iter().map(SortKey::render).collect();
        Some(format!("ORDER BY {}", keys.join(", ")))
    }
}
