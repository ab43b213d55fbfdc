//! DataGrid Library
//!
//! Data provisioning and pagination engine for tabular grids: owns page, sort
//! and filter state, fetches pages from an in-memory collection or a remote
//! endpoint, and computes total pages and the page button window.

pub mod components;
pub mod domain;
pub mod error;
pub mod eventing;
pub mod services;

pub use components::composite::data_grid::{
    ColumnSpec, DataProvider, GridController, GridSnapshot, PageSize, Record, SortType,
};
pub use domain::config::GridConfig;
pub use error::{Error, Result};
pub use eventing::GridEvent;
