//! Application services: the summary and comparison engines plus the
//! orchestrator that ties them to the cache, appliance and plugins.

pub mod analyzer;
pub mod comparison;
pub mod summary;

pub use analyzer::{AnalyzerOptions, BatchItem, BatchOutput, ChartOutcome, ResultAnalyzer};
pub use comparison::compare;
pub use summary::summarize;
