//! Retrieved columns.

use crate::constants::INTERNAL_COLUMN_PREFIX;
use crate::search::sql::quote_ident;
use crate::types::Hit;

/// Which columns a hit carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnSelection {
    /// `SELECT *`.
    All,
    /// The named columns, in order.
    Named(Vec<String>),
}

impl ColumnSelection {
    /// `'*'` anywhere in the list selects every column.
    pub fn from_attributes(attributes: &[String]) -> Self {
        if attributes.iter().any(|a| a == "*") {
            ColumnSelection::All
        } else {
            ColumnSelection::Named(attributes.to_vec())
        }
    }

    /// Select-list items.
    pub fn select_items(&self) -> Vec<String> {
        match self {
            ColumnSelection::All => vec!["*".to_string()],
            ColumnSelection::Named(columns) => columns.iter().map(|c| quote_ident(c)).collect(),
        }
    }
}

/// Removes every compiler-internal column from a hit.
pub fn strip_internal(hit: &mut Hit) {
    hit.retain(|key, _| !key.starts_with(INTERNAL_COLUMN_PREFIX));
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_wildcard() {
        let selection = ColumnSelection::from_attributes(&["name".into(), "*".into()]);
        assert_eq!(selection, ColumnSelection::All);
        assert_eq!(selection.select_items(), vec!["*"]);
    }

    #[test]
    fn test_named_columns_are_quoted() {
        let selection = ColumnSelection::from_attributes(&["name".into(), "unit price".into()]);
        assert_eq!(selection.select_items(), vec![r#""name""#, r#""unit price""#]);
    }

    #[test]
    fn test_strip_internal() {
        let mut hit: Hit = serde_json::from_value(json!({
            "name": "x",
            "postgres_searchbox_v1_doc": "'x':1",
            "postgres_searchbox_v1_rank": 1
        }))
        .unwrap();
        strip_internal(&mut hit);
        assert_eq!(serde_json::Value::Object(hit), json!({"name": "x"}));
    }
}
