//! DataGrid Component
//!
//! Data provisioning and pagination engine for a paged, sortable,
//! filterable grid over local or remote records.

pub mod column;
pub mod controller;
pub mod data_provider;
pub mod filter;
pub mod pagination;
pub mod record;
pub mod sort;

pub use column::{ColumnSpec, ensure_unique, infer_columns};
pub use controller::{ColumnSnapshot, GridController, GridSnapshot};
pub use data_provider::{
    DataProvider, DataSource, FetchOutcome, FetchStatus, FetchTicket, RemoteSource,
    RequestParams, SortFormat,
};
pub use filter::FilterSet;
pub use pagination::{PageSize, compute_total_pages, compute_window, page_range};
pub use record::{Record, cell_text, compare_values, resolve_path, resolve_scalar};
pub use sort::{SortState, SortType, next_sort_type};
