//! Domain models for the runlens analyzer.

pub mod comparison;
pub mod config;
pub mod run;
pub mod summary;

pub use comparison::{ComparisonResult, MetricDelta, RunRef, SuccessRateDelta};
pub use config::{ApplianceConfig, BatchConfig, CacheConfig, Config, LoggingConfig};
pub use run::{RawResult, RunIdentity, TestType};
pub use summary::{MetricStats, StrikeMetrics, TestSummary, TransactionMetrics};
