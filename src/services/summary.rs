//! Summary engine: derives a `TestSummary` from one raw result.
//!
//! Pure transform, no side effects. Absent optional data is omitted, never
//! fabricated; the only mandatory field is the test name.

use std::collections::BTreeMap;

use crate::domain::errors::{AnalyzerError, AnalyzerResult};
use crate::domain::models::{
    MetricStats, RawResult, RunIdentity, StrikeMetrics, TestSummary, TestType,
    TransactionMetrics,
};

fn num(block: &serde_json::Map<String, serde_json::Value>, field: &str) -> Option<f64> {
    block.get(field).and_then(serde_json::Value::as_f64)
}

fn count(block: &serde_json::Map<String, serde_json::Value>, field: &str) -> u64 {
    block.get(field).and_then(serde_json::Value::as_u64).unwrap_or(0)
}

fn stats_metric(raw: &RawResult, name: &str, unit: &str) -> Option<MetricStats> {
    let block = raw.metric_block(name)?;
    let average = num(block, "average")?;
    Some(MetricStats {
        average,
        minimum: num(block, "minimum"),
        maximum: num(block, "maximum"),
        unit: unit.to_string(),
    })
}

fn strike_metrics(raw: &RawResult) -> Option<StrikeMetrics> {
    let block = raw.metric_block("strikes")?;
    Some(StrikeMetrics {
        attempted: count(block, "attempted"),
        blocked: count(block, "blocked"),
        allowed: count(block, "allowed"),
        success_rate: num(block, "successRate").unwrap_or(0.0),
    })
}

fn transaction_metrics(raw: &RawResult) -> Option<TransactionMetrics> {
    let block = raw.metric_block("transactions")?;
    Some(TransactionMetrics {
        attempted: count(block, "attempted"),
        successful: count(block, "successful"),
        failed: count(block, "failed"),
        success_rate: num(block, "successRate").unwrap_or(0.0),
    })
}

/// Derive the summary for one run from its raw result.
///
/// Fails only when the raw result lacks a test name; every other field is
/// optional and simply omitted when absent.
pub fn summarize(identity: &RunIdentity, raw: &RawResult) -> AnalyzerResult<TestSummary> {
    let test_name = raw
        .test_name()
        .ok_or_else(|| {
            AnalyzerError::Validation(format!("raw result for {identity} has no test name"))
        })?
        .to_string();

    let test_type = raw.test_type();
    let mut metrics = BTreeMap::new();
    if let Some(stats) = stats_metric(raw, "throughput", "mbps") {
        metrics.insert("throughput".to_string(), stats);
    }
    if let Some(stats) = stats_metric(raw, "latency", "ms") {
        metrics.insert("latency".to_string(), stats);
    }

    // Type-specific blocks only exist for the test types that report them.
    let strikes = if test_type == TestType::Strike {
        strike_metrics(raw)
    } else {
        None
    };
    let transactions = if test_type.reports_transactions() {
        transaction_metrics(raw)
    } else {
        None
    };

    Ok(TestSummary {
        test_id: identity.test_id.clone(),
        run_id: identity.run_id.clone(),
        test_name,
        test_type,
        status: raw
            .str_field("status")
            .unwrap_or("unknown")
            .to_string(),
        start_time: raw.str_field("startTime").map(str::to_string),
        end_time: raw.str_field("endTime").map(str::to_string),
        duration_seconds: raw.num_field("duration").unwrap_or(0.0),
        metrics,
        strikes,
        transactions,
    })
}
