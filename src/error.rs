//! Error types for the data grid
//!
//! Centralized error handling using snafu for ergonomic error definitions.

use snafu::Snafu;

/// Main error type for the grid engine
#[derive(Debug, Snafu)]
pub enum Error {
    /// Remote fetch failed (network, HTTP status, unreadable body)
    #[snafu(display("Transport error: {message}"))]
    Transport { message: String },

    /// HTTP client error
    #[snafu(display("HTTP error: {source}"))]
    Http { source: reqwest::Error },

    /// A record does not have the shape a column path expects
    #[snafu(display("Malformed record at `{path}`: {reason}"))]
    MalformedRecord { path: String, reason: String },

    /// Missing or mutually exclusive configuration
    #[snafu(display("Configuration error: {message}"))]
    Configuration { message: String },

    /// Sort requested on a column that is unknown or not sortable
    #[snafu(display("Unknown or unsortable column: {column}"))]
    UnknownColumn { column: String },

    /// IO error (config and data files)
    #[snafu(display("IO error: {source}"))]
    Io { source: std::io::Error },

    /// JSON serialization/deserialization error
    #[snafu(display("JSON error: {source}"))]
    Json { source: serde_json::Error },

    /// TOML deserialization error
    #[snafu(display("TOML parse error: {source}"))]
    TomlDe { source: toml::de::Error },
}

impl Error {
    /// Shorthand for a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration {
            message: message.into(),
        }
    }

    /// Shorthand for a malformed record error
    pub fn malformed(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::MalformedRecord {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Whether this error came from the remote transport
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport { .. } | Error::Http { .. })
    }
}

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io { source }
    }
}

impl From<serde_json::Error> for Error {
    fn from(source: serde_json::Error) -> Self {
        Error::Json { source }
    }
}

impl From<toml::de::Error> for Error {
    fn from(source: toml::de::Error) -> Self {
        Error::TomlDe { source }
    }
}

impl From<reqwest::Error> for Error {
    fn from(source: reqwest::Error) -> Self {
        Error::Http { source }
    }
}

/// Result type alias for convenience
pub type Result<T, E = Error> = std::result::Result<T, E>;
