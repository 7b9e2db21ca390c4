//! Plugin registry and built-in report/chart generators.

pub mod charts;
pub mod registry;
pub mod reports;

pub use registry::PluginRegistry;
