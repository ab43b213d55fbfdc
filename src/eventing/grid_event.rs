//! GridEvent - Grid Event Enum
//!
//! Events the grid core emits for the presentation layer. The core never
//! writes to the console; collaborators subscribe to this channel instead.

use chrono::{DateTime, Local};

use crate::components::composite::data_grid::ColumnSpec;

/// Log level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn label(&self) -> &'static str {
        match self {
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }
}

/// Grid events for core -> presentation communication
#[derive(Debug, Clone)]
pub enum GridEvent {
    /// Log message
    Log {
        level: LogLevel,
        message: String,
        timestamp: DateTime<Local>,
    },

    /// A fetch was applied
    DataLoaded {
        page_index: usize,
        records: usize,
        total_count: usize,
    },

    /// A fetch failed; the previous page is still shown
    FetchFailed {
        message: String,
        timestamp: DateTime<Local>,
    },

    /// A response arrived after the grid state had moved on
    StaleResponseDiscarded { generation: u64 },

    /// Columns were inferred from the first record
    ColumnsInferred { columns: Vec<ColumnSpec> },
}

impl GridEvent {
    /// Create a log event with current timestamp
    pub fn log(level: LogLevel, message: impl Into<String>) -> Self {
        Self::Log {
            level,
            message: message.into(),
            timestamp: Local::now(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::log(LogLevel::Info, message)
    }

    pub fn warn(message: impl Into<String>) -> Self {
        Self::log(LogLevel::Warn, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::log(LogLevel::Error, message)
    }

    /// Create a fetch failure event with current timestamp
    pub fn fetch_failed(message: impl Into<String>) -> Self {
        Self::FetchFailed {
            message: message.into(),
            timestamp: Local::now(),
        }
    }
}
