//! Config - Grid Configuration
//!
//! Options consumed by the grid at construction. Loaded from TOML or JSON;
//! every file field is optional and falls back to the defaults below.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::components::composite::data_grid::{
    ColumnSpec, PageSize, Record, RequestParams, SortFormat, SortType, ensure_unique,
};
use crate::error::{Error, Result};
use crate::services::transport::ResponseShape;

/// Main grid configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Static collection of records (exclusive with `url`)
    pub data: Option<Vec<Record>>,
    /// JSON file holding the static collection, relative to the config file
    pub data_file: Option<PathBuf>,
    /// Remote endpoint (exclusive with `data`)
    pub url: Option<String>,
    /// Declared columns; inferred from the first record when absent
    pub columns: Option<Vec<ColumnSpec>>,
    pub default_page_size: usize,
    pub default_sort_column: Option<String>,
    pub default_sort_type: SortType,
    /// Request parameter carrying the page index
    pub page_param: String,
    /// Request parameter carrying the page size
    pub page_size_param: String,
    /// Request parameter carrying the sort column and direction
    pub sort_param: String,
    pub sort_format: SortFormat,
    /// Static parameters sent with every remote request
    pub additional_request_params: BTreeMap<String, String>,
    /// Whether rows are paged at all
    pub paging: bool,
    /// Width of the page button window
    pub page_button_count: usize,
    pub page_size_options: Vec<usize>,
    /// Response field holding the records array
    pub records_key: String,
    /// Response field holding the total row count
    pub total_key: String,
    /// Per-request timeout for remote sources, in seconds
    pub request_timeout_secs: Option<u64>,
}

impl Default for GridConfig {
    fn default() -> Self {
        let shape = ResponseShape::default();
        Self {
            data: None,
            data_file: None,
            url: None,
            columns: None,
            default_page_size: 10,
            default_sort_column: None,
            default_sort_type: SortType::Asc,
            page_param: "page".to_string(),
            page_size_param: "pageSize".to_string(),
            sort_param: "sort".to_string(),
            sort_format: SortFormat::Spaced,
            additional_request_params: BTreeMap::new(),
            paging: true,
            page_button_count: 5,
            page_size_options: vec![10, 25, 50],
            records_key: shape.records_key,
            total_key: shape.total_key,
            request_timeout_secs: None,
        }
    }
}

impl GridConfig {
    /// Config over an in-memory collection
    pub fn local(data: Vec<Record>) -> Self {
        Self {
            data: Some(data),
            ..Default::default()
        }
    }

    /// Config over a remote endpoint
    pub fn remote(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Default::default()
        }
    }

    /// Parse a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.prepare(None)
    }

    /// Parse a JSON document
    pub fn from_json_str(content: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(content)?;
        config.prepare(None)
    }

    /// Load a config file; `.json` files are JSON, anything else TOML
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let config: Self = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => serde_json::from_str(&content)?,
            _ => toml::from_str(&content)?,
        };
        tracing::debug!("Loaded grid config from {}", path.display());
        config.prepare(path.parent())
    }

    /// Resolve `data_file`, fill column headings and validate.
    ///
    /// Idempotent: a prepared config passes through unchanged.
    pub fn prepare(mut self, base_dir: Option<&Path>) -> Result<Self> {
        if let Some(file) = self.data_file.take() {
            if self.data.is_some() {
                return Err(Error::configuration(
                    "`data` and `data_file` are mutually exclusive",
                ));
            }
            let path = match base_dir {
                Some(base) if file.is_relative() => base.join(file),
                _ => file,
            };
            let content = fs::read_to_string(&path)?;
            let records: Vec<Record> = serde_json::from_str(&content)?;
            tracing::debug!("Loaded {} records from {}", records.len(), path.display());
            self.data = Some(records);
        }

        if let Some(columns) = self.columns.as_mut() {
            columns.iter_mut().for_each(ColumnSpec::normalize);
        }

        self.validate()?;
        Ok(self)
    }

    /// Check option combinations; fails fast before any render
    pub fn validate(&self) -> Result<()> {
        let has_data = self.data.is_some() || self.data_file.is_some();
        match (has_data, &self.url) {
            (true, Some(_)) => {
                return Err(Error::configuration(
                    "`data` and `url` are mutually exclusive",
                ));
            }
            (false, None) => {
                return Err(Error::configuration("one of `data` or `url` is required"));
            }
            (false, Some(url)) if url.trim().is_empty() => {
                return Err(Error::configuration("`url` is empty"));
            }
            _ => {}
        }

        if self.default_page_size == 0 {
            return Err(Error::configuration("`default_page_size` must be positive"));
        }
        if self.page_button_count == 0 {
            return Err(Error::configuration("`page_button_count` must be positive"));
        }
        if self.page_size_options.contains(&0) {
            return Err(Error::configuration(
                "`page_size_options` must not contain 0",
            ));
        }

        if self.request_timeout_secs == Some(0) {
            return Err(Error::configuration(
                "`request_timeout_secs` must be positive",
            ));
        }

        if let Some(columns) = &self.columns {
            ensure_unique(columns)?;
            if let Some(sort) = &self.default_sort_column {
                if !columns.iter().any(|c| &c.name == sort && c.sortable) {
                    return Err(Error::configuration(format!(
                        "`default_sort_column` `{sort}` is not a sortable column"
                    )));
                }
            }
        }

        Ok(())
    }

    /// Initial page size
    pub fn page_size(&self) -> PageSize {
        match PageSize::rows(self.default_page_size) {
            Some(size) if self.paging => size,
            _ => PageSize::Disabled,
        }
    }

    pub fn request_params(&self) -> RequestParams {
        RequestParams {
            page_param: self.page_param.clone(),
            page_size_param: self.page_size_param.clone(),
            sort_param: self.sort_param.clone(),
            sort_format: self.sort_format,
            additional: self.additional_request_params.clone(),
        }
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    pub fn response_shape(&self) -> ResponseShape {
        ResponseShape {
            records_key: self.records_key.clone(),
            total_key: self.total_key.clone(),
        }
    }
}
