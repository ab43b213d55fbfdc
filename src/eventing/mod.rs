//! Eventing
//!
//! Structured events flowing from the grid core to its collaborators.

pub mod grid_event;

pub use grid_event::{GridEvent, LogLevel};
