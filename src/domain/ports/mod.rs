//! Ports (trait interfaces) for external collaborators and extensions.

pub mod generators;
pub mod result_source;

pub use generators::{
    AnalyzerPlugin, ChartGenerator, PluginSet, ReportFormat, ReportGenerator,
};
pub use result_source::ResultSource;
