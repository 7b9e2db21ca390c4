//! Comparison engine: diffs two run summaries.

use std::collections::BTreeMap;

use crate::domain::models::{
    ComparisonResult, MetricDelta, RunRef, SuccessRateDelta, TestSummary,
};

/// Compare a candidate summary against a baseline.
///
/// Metrics present on both sides are diffed (`candidate - baseline`, with
/// the percentage undefined on a zero baseline). Metrics present on only
/// one side are listed as incomparable rather than dropped or raised.
pub fn compare(baseline: &TestSummary, candidate: &TestSummary) -> ComparisonResult {
    let mut metrics = BTreeMap::new();
    let mut incomparable = Vec::new();

    for (name, base_stats) in &baseline.metrics {
        match candidate.metric(name) {
            Some(cand_stats) => {
                let difference = cand_stats.average - base_stats.average;
                let percentage = if base_stats.average == 0.0 {
                    None
                } else {
                    Some(difference / base_stats.average * 100.0)
                };
                metrics.insert(
                    name.clone(),
                    MetricDelta {
                        baseline: base_stats.average,
                        candidate: cand_stats.average,
                        difference,
                        percentage,
                        unit: base_stats.unit.clone(),
                    },
                );
            }
            None => incomparable.push(name.clone()),
        }
    }
    for name in candidate.metrics.keys() {
        if !baseline.metrics.contains_key(name) {
            incomparable.push(name.clone());
        }
    }
    incomparable.sort();

    let strikes = match (&baseline.strikes, &candidate.strikes) {
        (Some(base), Some(cand)) => Some(SuccessRateDelta {
            baseline: base.success_rate,
            candidate: cand.success_rate,
            difference: cand.success_rate - base.success_rate,
        }),
        (Some(_), None) | (None, Some(_)) => {
            incomparable.push("strikes".to_string());
            None
        }
        (None, None) => None,
    };

    let transactions = match (&baseline.transactions, &candidate.transactions) {
        (Some(base), Some(cand)) => Some(SuccessRateDelta {
            baseline: base.success_rate,
            candidate: cand.success_rate,
            difference: cand.success_rate - base.success_rate,
        }),
        (Some(_), None) | (None, Some(_)) => {
            incomparable.push("transactions".to_string());
            None
        }
        (None, None) => None,
    };

    ComparisonResult {
        baseline: RunRef::from(baseline),
        candidate: RunRef::from(candidate),
        metrics,
        incomparable,
        strikes,
        transactions,
    }
}
