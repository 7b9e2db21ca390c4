//! Run identity and raw appliance results.
//!
//! A run is one execution of a configured test on the appliance. The
//! appliance reports results as a loosely structured JSON document; we keep
//! it opaque and read it through typed accessors.

use serde::{Deserialize, Serialize};

use crate::domain::errors::{AnalyzerError, AnalyzerResult};

/// Identifies one executed test run on the appliance.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunIdentity {
    pub test_id: String,
    pub run_id: String,
}

impl RunIdentity {
    /// Create a validated run identity. Both components must be non-empty.
    pub fn new(test_id: impl Into<String>, run_id: impl Into<String>) -> AnalyzerResult<Self> {
        let test_id = test_id.into();
        let run_id = run_id.into();
        if test_id.trim().is_empty() {
            return Err(AnalyzerError::Validation("test id cannot be empty".into()));
        }
        if run_id.trim().is_empty() {
            return Err(AnalyzerError::Validation("run id cannot be empty".into()));
        }
        Ok(Self { test_id, run_id })
    }
}

impl std::fmt::Display for RunIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.test_id, self.run_id)
    }
}

/// Kind of test the appliance executed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestType {
    /// Security strike test
    Strike,
    /// Application simulation
    AppSim,
    /// Client simulation
    ClientSim,
    /// Anything the appliance reports that we do not special-case
    Other(String),
}

impl TestType {
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "strike" => Self::Strike,
            "appsim" => Self::AppSim,
            "clientsim" => Self::ClientSim,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Strike => "strike",
            Self::AppSim => "appsim",
            Self::ClientSim => "clientsim",
            Self::Other(s) => s,
        }
    }

    /// Whether runs of this type report per-transaction metrics.
    pub fn reports_transactions(&self) -> bool {
        matches!(self, Self::AppSim | Self::ClientSim)
    }
}

impl Default for TestType {
    fn default() -> Self {
        Self::Other("unknown".to_string())
    }
}

/// Raw result document as returned by the appliance, read-only once fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawResult(serde_json::Value);

impl RawResult {
    pub fn new(value: serde_json::Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &serde_json::Value {
        &self.0
    }

    pub fn into_value(self) -> serde_json::Value {
        self.0
    }

    /// Top-level string field, if present and a string.
    pub fn str_field(&self, name: &str) -> Option<&str> {
        self.0.get(name).and_then(serde_json::Value::as_str)
    }

    /// Top-level numeric field, if present and a number.
    pub fn num_field(&self, name: &str) -> Option<f64> {
        self.0.get(name).and_then(serde_json::Value::as_f64)
    }

    pub fn test_name(&self) -> Option<&str> {
        self.str_field("testName")
    }

    pub fn test_type(&self) -> TestType {
        self.str_field("testType")
            .map(TestType::parse)
            .unwrap_or_default()
    }

    /// The `metrics` object, if the appliance reported one.
    pub fn metrics(&self) -> Option<&serde_json::Map<String, serde_json::Value>> {
        self.0.get("metrics").and_then(serde_json::Value::as_object)
    }

    /// One named block under `metrics`.
    pub fn metric_block(&self, name: &str) -> Option<&serde_json::Map<String, serde_json::Value>> {
        self.metrics()?.get(name)?.as_object()
    }

    /// Per-interval samples, when the appliance includes them.
    pub fn time_series(&self) -> Option<&Vec<serde_json::Value>> {
        self.0
            .get("timeSeriesData")
            .and_then(serde_json::Value::as_array)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn identity_rejects_empty_components() {
        assert!(RunIdentity::new("", "1").is_err());
        assert!(RunIdentity::new("t1", "  ").is_err());
        assert!(RunIdentity::new("t1", "1").is_ok());
    }

    #[test]
    fn test_type_round_trips_known_names() {
        assert_eq!(TestType::parse("strike"), TestType::Strike);
        assert_eq!(TestType::parse("AppSim"), TestType::AppSim);
        assert_eq!(TestType::parse("bandwidth").as_str(), "bandwidth");
        assert!(TestType::ClientSim.reports_transactions());
        assert!(!TestType::Strike.reports_transactions());
    }

    #[test]
    fn raw_result_accessors() {
        let raw = RawResult::new(json!({
            "testName": "T1",
            "testType": "strike",
            "duration": 120.5,
            "metrics": {"throughput": {"average": 100.0}}
        }));

        assert_eq!(raw.test_name(), Some("T1"));
        assert_eq!(raw.test_type(), TestType::Strike);
        assert_eq!(raw.num_field("duration"), Some(120.5));
        assert!(raw.metric_block("throughput").is_some());
        assert!(raw.metric_block("latency").is_none());
        assert!(raw.time_series().is_none());
    }
}
