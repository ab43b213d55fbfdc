//! Column Definition
//!
//! Declares grid columns and infers them from the shape of a record.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::record::{PATH_SEPARATOR, Record};
use crate::error::{Error, Result};

/// Column definition for the grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    /// Column identifier, a dotted path for nested fields
    pub name: String,
    /// Column header label (defaults to the name)
    #[serde(default)]
    pub heading: String,
    /// Whether the column is sortable
    #[serde(default = "default_sortable")]
    pub sortable: bool,
}

fn default_sortable() -> bool {
    true
}

impl ColumnSpec {
    /// Create a new sortable column
    pub fn new(name: impl Into<String>, heading: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            heading: heading.into(),
            sortable: true,
        }
    }

    /// Make the column unsortable
    pub fn unsortable(mut self) -> Self {
        self.sortable = false;
        self
    }

    /// Fill an empty heading with the column name
    pub fn normalize(&mut self) {
        if self.heading.is_empty() {
            self.heading = self.name.clone();
        }
    }
}

/// Infer columns from the first record of a dataset.
///
/// One column per top-level key, in declaration order. A nested object is
/// followed through its first key only, so `{"owner": {"name": .., "id": ..}}`
/// yields the single column `owner.name` headed `owner`.
pub fn infer_columns(first: &Record) -> Vec<ColumnSpec> {
    first
        .iter()
        .map(|(key, value)| {
            let mut name = key.clone();
            let mut current = value;
            while let Some((sub_key, sub_value)) = current.as_object().and_then(first_entry) {
                name.push(PATH_SEPARATOR);
                name.push_str(sub_key);
                current = sub_value;
            }
            ColumnSpec::new(name, key.clone())
        })
        .collect()
}

fn first_entry(object: &serde_json::Map<String, Value>) -> Option<(&String, &Value)> {
    object.iter().next()
}

/// Reject column lists that reuse a name
pub fn ensure_unique(columns: &[ColumnSpec]) -> Result<()> {
    let mut seen = HashSet::new();
    for column in columns {
        if !seen.insert(column.name.as_str()) {
            return Err(Error::configuration(format!(
                "duplicate column name `{}`",
                column.name
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn first(value: Value) -> Record {
        value.as_object().cloned().expect("object")
    }

    #[test]
    fn test_infer_flat_columns_in_order() {
        let columns = infer_columns(&first(json!({"id": 1, "name": "Ada", "status": "active"})));
        let names: Vec<_> = columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["id", "name", "status"]);
        assert!(columns.iter().all(|c| c.sortable));
        assert_eq!(columns[1].heading, "name");
    }

    #[test]
    fn test_infer_nested_follows_first_key_only() {
        let columns = infer_columns(&first(json!({
            "id": 7,
            "owner": {"profile": {"first": "Ada", "last": "Lovelace"}, "id": 3}
        })));
        assert_eq!(columns.len(), 2);
        assert_eq!(columns[1].name, "owner.profile.first");
        assert_eq!(columns[1].heading, "owner");
    }

    #[test]
    fn test_normalize_heading() {
        let mut column: ColumnSpec =
            serde_json::from_value(json!({"name": "status"})).expect("column");
        assert!(column.sortable);
        column.normalize();
        assert_eq!(column.heading, "status");
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let columns = vec![ColumnSpec::new("a", "A"), ColumnSpec::new("a", "Again")];
        assert!(matches!(
            ensure_unique(&columns),
            Err(Error::Configuration { .. })
        ));
        assert!(ensure_unique(&columns[..1]).is_ok());
    }
}
