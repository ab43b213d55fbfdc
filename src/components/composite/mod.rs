//! Composite Components

pub mod data_grid;
