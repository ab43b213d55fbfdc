//! Components - Reusable Grid Components
//!
//! Pure state and algorithms; no rendering, no I/O beyond the injected transport.

pub mod composite;
