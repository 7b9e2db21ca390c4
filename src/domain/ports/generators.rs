//! Generator capability ports.
//!
//! Three independent capability interfaces back the plugin registry's
//! namespaces. Implementations are registered by name; the registry is the
//! only consumer-facing lookup surface.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::errors::{AnalyzerError, AnalyzerResult};
use crate::domain::models::{ComparisonResult, RawResult, TestSummary};
use crate::plugins::PluginRegistry;

/// Output format for report generators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    Html,
    Csv,
    Json,
}

impl ReportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "html" => Some(Self::Html),
            "csv" => Some(Self::Csv),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Renders a report artifact from a run's summary and raw result.
pub trait ReportGenerator: Send + Sync {
    fn generate(
        &self,
        summary: &TestSummary,
        raw: &RawResult,
        format: ReportFormat,
        output_file: &Path,
    ) -> AnalyzerResult<PathBuf>;
}

/// Renders a chart artifact from a run's summary and raw result.
pub trait ChartGenerator: Send + Sync {
    /// Whether this chart makes sense for the given summary (e.g. a strikes
    /// chart needs strike metrics).
    fn applies_to(&self, summary: &TestSummary) -> bool;

    fn generate(
        &self,
        summary: &TestSummary,
        raw: &RawResult,
        output_file: &Path,
    ) -> AnalyzerResult<PathBuf>;

    /// Render a two-run comparison chart. Only the `comparison` generator
    /// supports this; everything else reports a plugin failure.
    fn generate_comparison(
        &self,
        comparison: &ComparisonResult,
        output_file: &Path,
    ) -> AnalyzerResult<PathBuf> {
        let _ = (comparison, output_file);
        Err(AnalyzerError::Plugin {
            name: "chart".into(),
            message: "comparison rendering not supported by this generator".into(),
        })
    }
}

/// Derives an arbitrary analysis document from a raw result.
pub trait AnalyzerPlugin: Send + Sync {
    fn analyze(&self, raw: &RawResult) -> AnalyzerResult<serde_json::Value>;
}

/// A self-registering bundle of plugins.
///
/// Discovery is an explicit, injectable list of these units: each gets the
/// registry handed to it and registers whatever it provides. A set that
/// fails must not prevent the remaining sets from installing.
pub trait PluginSet: Send + Sync {
    /// Name used in discovery logs.
    fn name(&self) -> &str;

    /// Register this set's plugins with the registry.
    fn register(&self, registry: &PluginRegistry) -> AnalyzerResult<()>;
}
