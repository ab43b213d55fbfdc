//! Sort State

use serde::{Deserialize, Serialize};

/// Sort direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortType {
    #[default]
    Asc,
    Desc,
}

impl SortType {
    pub fn toggled(self) -> Self {
        match self {
            SortType::Asc => SortType::Desc,
            SortType::Desc => SortType::Asc,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortType::Asc => "asc",
            SortType::Desc => "desc",
        }
    }
}

/// Direction to use when the user picks `candidate` as the sort column.
///
/// Picking the current column again flips the direction. Picking a different
/// column keeps the previous direction instead of resetting to ascending.
pub fn next_sort_type(current: Option<&str>, candidate: &str, sort_type: SortType) -> SortType {
    if current == Some(candidate) {
        sort_type.toggled()
    } else {
        sort_type
    }
}

/// Current sort column and direction. No column means natural order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortState {
    column: Option<String>,
    sort_type: SortType,
}

impl SortState {
    pub fn new(column: Option<String>, sort_type: SortType) -> Self {
        Self { column, sort_type }
    }

    pub fn column(&self) -> Option<&str> {
        self.column.as_deref()
    }

    pub fn sort_type(&self) -> SortType {
        self.sort_type
    }

    /// Set the column; the direction is kept when not given
    pub fn set(&mut self, column: impl Into<String>, sort_type: Option<SortType>) {
        self.column = Some(column.into());
        if let Some(sort_type) = sort_type {
            self.sort_type = sort_type;
        }
    }

    /// Back to natural order, keeping the direction for the next column
    pub fn clear(&mut self) {
        self.column = None;
    }

    /// Direction indicator for a column header
    pub fn indicator(&self, column: &str) -> Option<SortType> {
        (self.column() == Some(column)).then_some(self.sort_type)
    }
}
