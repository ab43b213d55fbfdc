//! Column Filters
//!
//! Per-column keyword filters. An empty keyword is kept but constrains
//! nothing; removing a filter is a separate operation.

use hashlink::LinkedHashMap;

use super::record::{Record, cell_text, resolve_scalar};
use crate::error::Result;

/// Keyword per column name, in the order columns were first filtered
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSet {
    keywords: LinkedHashMap<String, String>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store or overwrite the keyword for a column, keeping its position
    pub fn set(&mut self, column: impl Into<String>, keyword: impl Into<String>) {
        let column = column.into();
        let keyword = keyword.into();
        match self.keywords.get_mut(&column) {
            Some(existing) => *existing = keyword,
            None => {
                self.keywords.insert(column, keyword);
            }
        }
    }

    /// Remove the filter for a column
    pub fn clear(&mut self, column: &str) -> Option<String> {
        self.keywords.remove(column)
    }

    pub fn clear_all(&mut self) {
        self.keywords.clear();
    }

    pub fn keyword(&self, column: &str) -> Option<&str> {
        self.keywords.get(column).map(String::as_str)
    }

    /// Whether the column carries a non-empty keyword
    pub fn is_active(&self, column: &str) -> bool {
        self.keyword(column).is_some_and(|k| !k.is_empty())
    }

    /// All stored entries, including empty keywords
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.keywords.iter().map(|(c, k)| (c.as_str(), k.as_str()))
    }

    /// Entries with a non-empty keyword
    pub fn active(&self) -> impl Iterator<Item = (&str, &str)> {
        self.iter().filter(|(_, keyword)| !keyword.is_empty())
    }

    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    /// Case-insensitive substring match on every active column (AND).
    pub fn matches(&self, record: &Record) -> Result<bool> {
        for (column, keyword) in self.active() {
            let text = cell_text(resolve_scalar(record, column)?).to_lowercase();
            if !text.contains(&keyword.to_lowercase()) {
                return Ok(false);
            }
        }
        Ok(true)
    }
}
