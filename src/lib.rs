//! Runlens - network test appliance result analyzer
//!
//! Runlens fetches raw results from a Breaking-Point style test appliance,
//! condenses them into summaries, compares runs, and renders reports and
//! charts through a pluggable generator registry. Results are cached on
//! disk with per-entry TTLs and checksum verification.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture / Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): Models, error types and port traits
//! - **Adapters Layer** (`adapters`): Appliance HTTP client and cache store
//! - **Plugins Layer** (`plugins`): Report, chart and analyzer generators
//! - **Service Layer** (`services`): Summary/comparison engines and the orchestrator
//! - **Infrastructure Layer** (`infrastructure`): Configuration and logging
//! - **CLI Layer** (`cli`): Command-line interface

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod plugins;
pub mod services;

// Re-export commonly used types for convenience
pub use adapters::{ApplianceClient, CacheStats, PayloadKind, ResultCache};
pub use domain::errors::{AnalyzerError, AnalyzerResult};
pub use domain::models::{
    ComparisonResult, Config, MetricDelta, MetricStats, RawResult, RunIdentity, TestSummary,
    TestType,
};
pub use domain::ports::{
    AnalyzerPlugin, ChartGenerator, PluginSet, ReportFormat, ReportGenerator, ResultSource,
};
pub use plugins::PluginRegistry;
pub use services::{AnalyzerOptions, BatchItem, ChartOutcome, ResultAnalyzer};
