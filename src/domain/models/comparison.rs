//! Comparison between two run summaries.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::summary::TestSummary;

/// Reference to one side of a comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunRef {
    pub test_id: String,
    pub run_id: String,
    pub test_name: String,
}

impl From<&TestSummary> for RunRef {
    fn from(summary: &TestSummary) -> Self {
        Self {
            test_id: summary.test_id.clone(),
            run_id: summary.run_id.clone(),
            test_name: summary.test_name.clone(),
        }
    }
}

/// Delta for one metric present in both summaries.
///
/// Directional: `difference = candidate - baseline`. `percentage` is `None`
/// when the baseline average is zero, which makes a relative change
/// undefined rather than an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricDelta {
    pub baseline: f64,
    pub candidate: f64,
    pub difference: f64,
    pub percentage: Option<f64>,
    pub unit: String,
}

/// Success-rate delta for a type-specific metric block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuccessRateDelta {
    pub baseline: f64,
    pub candidate: f64,
    pub difference: f64,
}

/// Result of comparing two summaries (candidate against baseline).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub baseline: RunRef,
    pub candidate: RunRef,
    /// Deltas for metrics present on both sides.
    pub metrics: BTreeMap<String, MetricDelta>,
    /// Metric names present on only one side; data, not a failure.
    pub incomparable: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strikes: Option<SuccessRateDelta>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transactions: Option<SuccessRateDelta>,
}
