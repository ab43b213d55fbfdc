//! Domain - Configuration Types
//!
//! Plain data consumed by the grid at construction.

pub mod config;
