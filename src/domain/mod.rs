//! Domain layer: core models, errors, and ports.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{AnalyzerError, AnalyzerResult};
