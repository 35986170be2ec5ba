//! Command-line inference entrypoints over exported anomaly models.

mod common;
pub mod native;
pub mod portable;
