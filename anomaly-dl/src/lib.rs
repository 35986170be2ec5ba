//! The building blocks of visual anomaly detection pipelines.

mod common;
pub mod config;
pub mod dataset;
pub mod deploy;
pub mod error;
pub mod model;
pub mod transform;
