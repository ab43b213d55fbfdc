//! GridController
//!
//! Turns presentation intents (page, page size, filter, sort, render) into
//! DataProvider mutations and fetches, and exposes read-only snapshots.
//! Every failure is returned to the caller and also emitted as a [`GridEvent`].

use std::num::NonZeroUsize;
use std::sync::Arc;

use crossbeam_channel::{Receiver, Sender};
use serde::Serialize;

use super::column::{ColumnSpec, ensure_unique, infer_columns};
use super::data_provider::{DataProvider, FetchStatus};
use super::pagination::{PageSize, compute_window};
use super::record::Record;
use super::sort::{SortType, next_sort_type};
use crate::domain::config::GridConfig;
use crate::error::{Error, Result};
use crate::eventing::GridEvent;
use crate::services::transport::Transport;

/// Column header state for rendering
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnSnapshot {
    pub name: String,
    pub heading: String,
    pub sortable: bool,
    /// Direction when this column is the sort column
    pub sort: Option<SortType>,
}

/// Owned, immutable view of the grid for the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridSnapshot {
    pub columns: Vec<ColumnSnapshot>,
    pub records: Vec<Record>,
    pub page_index: usize,
    /// `None` when paging is disabled
    pub page_size: Option<usize>,
    pub total_pages: usize,
    pub total_count: usize,
    pub page_buttons: Vec<usize>,
    pub page_size_options: Vec<usize>,
    pub filters: Vec<(String, String)>,
}

/// Orchestrates the data provider and the paginator
pub struct GridController {
    provider: DataProvider,
    /// Declared or inferred; `None` until the first non-empty page
    columns: Option<Vec<ColumnSpec>>,
    page_button_count: usize,
    page_size_options: Vec<usize>,
    /// Rows per page restored when paging is re-enabled
    rows_per_page: NonZeroUsize,
    tx: Sender<GridEvent>,
    rx: Receiver<GridEvent>,
}

impl GridController {
    /// Create a controller from configuration.
    ///
    /// Invalid configuration fails here, before any render.
    pub fn new(config: GridConfig, transport: Option<Arc<dyn Transport>>) -> Result<Self> {
        let config = config.prepare(None)?;
        let provider = DataProvider::from_config(&config, transport)?;
        let rows_per_page = NonZeroUsize::new(config.default_page_size)
            .ok_or_else(|| Error::configuration("`default_page_size` must be positive"))?;

        let (tx, rx) = crossbeam_channel::unbounded();
        tracing::debug!(remote = provider.is_remote(), "Grid controller created");

        Ok(Self {
            provider,
            columns: config.columns,
            page_button_count: config.page_button_count,
            page_size_options: config.page_size_options,
            rows_per_page,
            tx,
            rx,
        })
    }

    /// Get the event receiver for the presentation layer
    pub fn events(&self) -> Receiver<GridEvent> {
        self.rx.clone()
    }

    fn emit(&self, event: GridEvent) {
        let _ = self.tx.send(event);
    }

    // ==================== Intents ====================

    /// Initial render or re-render with the current state
    pub async fn render(&mut self) -> Result<FetchStatus> {
        self.reload().await
    }

    pub async fn change_page(&mut self, page_index: usize) -> Result<FetchStatus> {
        self.provider.set_page_index(page_index);
        self.reload().await
    }

    /// Change rows per page and return to the first page
    pub async fn change_page_size(&mut self, rows: usize) -> Result<FetchStatus> {
        let Some(rows) = NonZeroUsize::new(rows) else {
            let err = Error::configuration("page size must be positive");
            self.emit(GridEvent::error(err.to_string()));
            return Err(err);
        };
        self.rows_per_page = rows;
        self.provider.set_page_size(PageSize::Rows(rows));
        self.provider.set_page_index(1);
        self.reload().await
    }

    /// Toggle paging; disabled paging shows every row on one page
    pub async fn set_paging(&mut self, enabled: bool) -> Result<FetchStatus> {
        let page_size = if enabled {
            PageSize::Rows(self.rows_per_page)
        } else {
            PageSize::Disabled
        };
        self.provider.set_page_size(page_size);
        self.provider.set_page_index(1);
        self.reload().await
    }

    /// Set a column keyword and return to the first page
    pub async fn change_filter(
        &mut self,
        column: impl Into<String>,
        keyword: impl Into<String>,
    ) -> Result<FetchStatus> {
        self.provider.set_filter(column, keyword);
        self.provider.set_page_index(1);
        self.reload().await
    }

    /// Remove a column filter and return to the first page
    pub async fn clear_filter(&mut self, column: &str) -> Result<FetchStatus> {
        self.provider.clear_filter(column);
        self.provider.set_page_index(1);
        self.reload().await
    }

    /// Remove every column filter and return to the first page
    pub async fn clear_filters(&mut self) -> Result<FetchStatus> {
        self.provider.clear_filters();
        self.provider.set_page_index(1);
        self.reload().await
    }

    /// Back to the source's natural order
    pub async fn clear_sort(&mut self) -> Result<FetchStatus> {
        self.provider.clear_sort();
        self.reload().await
    }

    /// Sort by a column header click: same column flips, a new one keeps direction
    pub async fn change_sort(&mut self, column: &str) -> Result<FetchStatus> {
        if let Some(columns) = &self.columns {
            if !columns.iter().any(|c| c.name == column && c.sortable) {
                let err = Error::UnknownColumn {
                    column: column.to_string(),
                };
                self.emit(GridEvent::error(err.to_string()));
                return Err(err);
            }
        }

        let sort_type = next_sort_type(
            self.provider.sort_column(),
            column,
            self.provider.sort_type(),
        );
        self.provider.set_sort(column, Some(sort_type));
        self.reload().await
    }

    /// Replace the column set explicitly
    pub fn set_columns(&mut self, columns: Vec<ColumnSpec>) -> Result<()> {
        ensure_unique(&columns)?;
        let columns = columns
            .into_iter()
            .map(|mut column| {
                column.normalize();
                column
            })
            .collect();
        self.columns = Some(columns);
        Ok(())
    }

    async fn reload(&mut self) -> Result<FetchStatus> {
        let generation = self.provider.generation();
        match self.provider.fetch().await {
            Ok(FetchStatus::Applied) => {
                self.infer_columns_once();
                tracing::info!(
                    page = self.provider.page_index(),
                    records = self.provider.data().len(),
                    total = self.provider.total_count(),
                    "Grid data loaded"
                );
                self.emit(GridEvent::DataLoaded {
                    page_index: self.provider.page_index(),
                    records: self.provider.data().len(),
                    total_count: self.provider.total_count(),
                });
                Ok(FetchStatus::Applied)
            }
            // Unreachable while `fetch` holds `&mut self`; only callers driving
            // `begin_fetch`/`complete_fetch` themselves can observe a stale page.
            Ok(FetchStatus::Stale) => {
                self.emit(GridEvent::StaleResponseDiscarded { generation });
                Ok(FetchStatus::Stale)
            }
            Err(e) => {
                tracing::warn!("Grid fetch failed: {e}");
                self.emit(GridEvent::fetch_failed(e.to_string()));
                Err(e)
            }
        }
    }

    fn infer_columns_once(&mut self) {
        if self.columns.is_some() {
            return;
        }
        if let Some(first) = self.provider.data().first() {
            let columns = infer_columns(first);
            tracing::debug!(count = columns.len(), "Columns inferred");
            self.emit(GridEvent::ColumnsInferred {
                columns: columns.clone(),
            });
            self.columns = Some(columns);
        }
    }

    // ==================== Getters ====================

    pub fn provider(&self) -> &DataProvider {
        &self.provider
    }

    pub fn data(&self) -> &[Record] {
        self.provider.data()
    }

    pub fn page_index(&self) -> usize {
        self.provider.page_index()
    }

    pub fn page_size(&self) -> PageSize {
        self.provider.page_size()
    }

    pub fn total_pages(&self) -> usize {
        self.provider.total_pages()
    }

    pub fn total_count(&self) -> usize {
        self.provider.total_count()
    }

    /// Visible page button window
    pub fn page_buttons(&self) -> Vec<usize> {
        compute_window(
            self.provider.page_index(),
            self.provider.total_pages(),
            self.page_button_count,
        )
    }

    pub fn page_size_options(&self) -> &[usize] {
        &self.page_size_options
    }

    pub fn columns(&self) -> &[ColumnSpec] {
        self.columns.as_deref().unwrap_or_default()
    }

    pub fn snapshot(&self) -> GridSnapshot {
        let sort = self.provider.sort_state();
        GridSnapshot {
            columns: self
                .columns()
                .iter()
                .map(|column| ColumnSnapshot {
                    name: column.name.clone(),
                    heading: column.heading.clone(),
                    sortable: column.sortable,
                    sort: sort.indicator(&column.name),
                })
                .collect(),
            records: self.provider.data().to_vec(),
            page_index: self.page_index(),
            page_size: self.page_size().get(),
            total_pages: self.total_pages(),
            total_count: self.total_count(),
            page_buttons: self.page_buttons(),
            page_size_options: self.page_size_options.clone(),
            filters: self
                .provider
                .filters()
                .iter()
                .map(|(c, k)| (c.to_string(), k.to_string()))
                .collect(),
        }
    }
}

impl std::fmt::Debug for GridController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GridController")
            .field("provider", &self.provider)
            .field("columns", &self.columns)
            .field("page_button_count", &self.page_button_count)
            .finish()
    }
}
