//! Derived summary of a single test run.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::run::TestType;

/// Aggregate statistics for one metric over the run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricStats {
    pub average: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,
    pub unit: String,
}

/// Strike counts reported for security tests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrikeMetrics {
    pub attempted: u64,
    pub blocked: u64,
    pub allowed: u64,
    pub success_rate: f64,
}

/// Transaction counts reported for application/client simulations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionMetrics {
    pub attempted: u64,
    pub successful: u64,
    pub failed: u64,
    pub success_rate: f64,
}

/// Summary derived from one raw result.
///
/// Produced deterministically by the summary engine; `metrics` only carries
/// what the appliance actually reported, absent data is omitted rather than
/// zero-filled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestSummary {
    pub test_id: String,
    pub run_id: String,
    pub test_name: String,
    pub test_type: TestType,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    pub duration_seconds: f64,
    /// Metric name -> stats, ordered for stable serialization.
    pub metrics: BTreeMap<String, MetricStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strikes: Option<StrikeMetrics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transactions: Option<TransactionMetrics>,
}

impl TestSummary {
    pub fn metric(&self, name: &str) -> Option<&MetricStats> {
        self.metrics.get(name)
    }

    pub fn has_metric(&self, name: &str) -> bool {
        self.metrics.contains_key(name)
    }
}
