//! Integration tests for the result analyzer orchestrator, driven through
//! a mock appliance source.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

use runlens::{
    AnalyzerError, AnalyzerOptions, AnalyzerResult, ChartGenerator, ComparisonResult,
    PluginRegistry, RawResult, ReportFormat, ResultAnalyzer, ResultCache, RunIdentity,
    TestSummary,
};

struct MockSource {
    results: HashMap<String, serde_json::Value>,
    fetch_count: AtomicUsize,
    delay: Duration,
}

impl MockSource {
    fn new(results: HashMap<String, serde_json::Value>) -> Self {
        Self {
            results,
            fetch_count: AtomicUsize::new(0),
            delay: Duration::ZERO,
        }
    }

    fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    fn fetches(&self) -> usize {
        self.fetch_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl runlens::ResultSource for MockSource {
    fn name(&self) -> &str {
        "mock"
    }

    async fn fetch_raw_result(
        &self,
        identity: &RunIdentity,
        _timeout: Duration,
    ) -> AnalyzerResult<RawResult> {
        self.fetch_count.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.results
            .get(&identity.to_string())
            .cloned()
            .map(RawResult::new)
            .ok_or_else(|| AnalyzerError::Network {
                endpoint: identity.to_string(),
                message: "no such run".to_string(),
            })
    }

    async fn fetch_run_status(&self, identity: &RunIdentity) -> AnalyzerResult<String> {
        if self.results.contains_key(&identity.to_string()) {
            Ok("completed".to_string())
        } else {
            Err(AnalyzerError::Network {
                endpoint: identity.to_string(),
                message: "no such run".to_string(),
            })
        }
    }
}

fn run_payload(name: &str, throughput: f64) -> serde_json::Value {
    json!({
        "testName": name,
        "testType": "appsim",
        "status": "completed",
        "duration": 300.0,
        "metrics": {
            "throughput": {"average": throughput, "minimum": throughput * 0.8, "maximum": throughput * 1.1},
            "latency": {"average": 12.5, "minimum": 8.0, "maximum": 40.0},
            "transactions": {"attempted": 1000, "successful": 990, "failed": 10, "successRate": 99.0}
        }
    })
}

fn identity(test_id: &str, run_id: &str) -> RunIdentity {
    RunIdentity::new(test_id, run_id).unwrap()
}

fn build(source: MockSource) -> (Arc<ResultAnalyzer>, Arc<MockSource>, TempDir) {
    let dir = TempDir::new().unwrap();
    let source = Arc::new(source);
    let cache = ResultCache::open(dir.path().join("cache"), Duration::from_secs(3600)).unwrap();
    let analyzer = ResultAnalyzer::new(
        source.clone(),
        Arc::new(cache),
        Arc::new(PluginRegistry::with_builtins()),
        AnalyzerOptions {
            fetch_timeout: Duration::from_secs(5),
            max_in_flight: 2,
            cache_enabled: true,
        },
    );
    (Arc::new(analyzer), source, dir)
}

fn one_run() -> HashMap<String, serde_json::Value> {
    HashMap::from([("t1/r1".to_string(), run_payload("HTTP baseline", 900.0))])
}

#[tokio::test]
async fn test_concurrent_cold_misses_fetch_once() {
    let (analyzer, source, _dir) =
        build(MockSource::new(one_run()).with_delay(Duration::from_millis(50)));
    let id = identity("t1", "r1");

    let calls = (0..8).map(|_| analyzer.get_summary(&id, true));
    let summaries = futures::future::join_all(calls).await;

    for summary in summaries {
        assert_eq!(summary.unwrap().test_name, "HTTP baseline");
    }
    assert_eq!(source.fetches(), 1, "coalesced misses should fetch once");
}

#[tokio::test]
async fn test_warm_cache_skips_the_source() {
    let (analyzer, source, _dir) = build(MockSource::new(one_run()));
    let id = identity("t1", "r1");

    analyzer.get_summary(&id, true).await.unwrap();
    analyzer.get_summary(&id, true).await.unwrap();
    analyzer.get_raw_result(&id, true).await.unwrap();

    assert_eq!(source.fetches(), 1);
}

#[tokio::test]
async fn test_cache_bypass_always_fetches() {
    let (analyzer, source, _dir) = build(MockSource::new(one_run()));
    let id = identity("t1", "r1");

    analyzer.get_raw_result(&id, false).await.unwrap();
    analyzer.get_raw_result(&id, false).await.unwrap();

    assert_eq!(source.fetches(), 2);
}

#[tokio::test]
async fn test_failed_fetch_is_not_cached() {
    let (analyzer, source, _dir) = build(MockSource::new(HashMap::new()));
    let id = identity("missing", "r1");

    assert!(analyzer.get_raw_result(&id, true).await.is_err());
    assert!(analyzer.get_raw_result(&id, true).await.is_err());

    assert_eq!(source.fetches(), 2, "errors must not be served from cache");
}

#[tokio::test]
async fn test_compare_runs_diffs_shared_metrics() {
    let results = HashMap::from([
        ("t1/base".to_string(), run_payload("HTTP baseline", 100.0)),
        ("t1/cand".to_string(), run_payload("HTTP candidate", 150.0)),
    ]);
    let (analyzer, _source, _dir) = build(MockSource::new(results));

    let comparison = analyzer
        .compare_runs(&identity("t1", "base"), &identity("t1", "cand"))
        .await
        .unwrap();

    let delta = &comparison.metrics["throughput"];
    assert!((delta.difference - 50.0).abs() < f64::EPSILON);
    assert!((delta.percentage.unwrap() - 50.0).abs() < 1e-9);
    assert!(comparison.incomparable.is_empty());
}

#[tokio::test]
async fn test_generate_report_unknown_type() {
    let (analyzer, source, dir) = build(MockSource::new(one_run()));

    let err = analyzer
        .generate_report(
            &identity("t1", "r1"),
            "quarterly",
            ReportFormat::Html,
            dir.path(),
        )
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        AnalyzerError::PluginNotFound { namespace: "report", .. }
    ));
    assert_eq!(source.fetches(), 0, "lookup happens before any fetch");
}

#[tokio::test]
async fn test_generate_report_writes_artifact() {
    let (analyzer, _source, dir) = build(MockSource::new(one_run()));

    let path = analyzer
        .generate_report(
            &identity("t1", "r1"),
            "standard",
            ReportFormat::Html,
            &dir.path().join("out"),
        )
        .await
        .unwrap();

    assert!(path.ends_with("report_t1_r1_standard.html"));
    let body = std::fs::read_to_string(&path).unwrap();
    assert!(body.contains("HTTP baseline"));
}

struct BrokenChart;

impl ChartGenerator for BrokenChart {
    fn applies_to(&self, _summary: &TestSummary) -> bool {
        true
    }

    fn generate(
        &self,
        _summary: &TestSummary,
        _raw: &RawResult,
        _output_file: &Path,
    ) -> AnalyzerResult<PathBuf> {
        Err(AnalyzerError::Plugin {
            name: "broken".to_string(),
            message: "renderer exploded".to_string(),
        })
    }
}

#[tokio::test]
async fn test_chart_failure_does_not_block_others() {
    let (analyzer, _source, dir) = build(MockSource::new(one_run()));
    analyzer
        .registry()
        .register_chart("broken", Arc::new(BrokenChart));

    let outcomes = analyzer
        .generate_charts(&identity("t1", "r1"), &dir.path().join("charts"))
        .await
        .unwrap();

    let broken = outcomes.iter().find(|o| o.chart == "broken").unwrap();
    assert!(broken.outcome.is_err());

    let rendered: Vec<_> = outcomes
        .iter()
        .filter(|o| o.outcome.is_ok())
        .map(|o| o.chart.as_str())
        .collect();
    assert!(rendered.contains(&"throughput"));
    assert!(rendered.contains(&"latency"));
    assert!(rendered.contains(&"transactions"));
    assert!(
        !outcomes.iter().any(|o| o.chart == "comparison"),
        "comparison chart needs two runs and must not apply here"
    );
}

#[tokio::test]
async fn test_compare_charts_writes_artifact() {
    let results = HashMap::from([
        ("t1/base".to_string(), run_payload("HTTP baseline", 100.0)),
        ("t1/cand".to_string(), run_payload("HTTP candidate", 150.0)),
    ]);
    let (analyzer, _source, dir) = build(MockSource::new(results));

    let path = analyzer
        .compare_charts(
            &identity("t1", "base"),
            &identity("t1", "cand"),
            &dir.path().join("charts"),
        )
        .await
        .unwrap();

    assert!(path.ends_with("comparison_t1_base_vs_t1_cand.svg"));
    assert!(path.exists());
}

#[tokio::test]
async fn test_batch_isolates_per_item_failures() {
    let results = HashMap::from([
        ("t1/r1".to_string(), run_payload("run one", 100.0)),
        ("t1/r3".to_string(), run_payload("run three", 120.0)),
    ]);
    let (analyzer, _source, dir) = build(MockSource::new(results));

    let items = analyzer
        .batch_process(
            vec![identity("t1", "r1"), identity("t1", "r2"), identity("t1", "r3")],
            "standard",
            ReportFormat::Json,
            &dir.path().join("batch"),
            CancellationToken::new(),
        )
        .await
        .unwrap();

    assert_eq!(items.len(), 3);
    assert_eq!(items[0].identity.run_id, "r1");
    assert!(items[0].outcome.is_ok());
    assert!(items[1].outcome.is_err(), "unknown run fails its own item");
    assert!(items[2].outcome.is_ok(), "later items still processed");
}

#[tokio::test]
async fn test_batch_rejects_unknown_report_type_up_front() {
    let (analyzer, source, dir) = build(MockSource::new(one_run()));

    let err = analyzer
        .batch_process(
            vec![identity("t1", "r1")],
            "quarterly",
            ReportFormat::Html,
            dir.path(),
            CancellationToken::new(),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, AnalyzerError::PluginNotFound { .. }));
    assert_eq!(source.fetches(), 0);
}

#[tokio::test]
async fn test_batch_cancellation_skips_pending_items() {
    let (analyzer, source, dir) = build(MockSource::new(one_run()));
    let cancel = CancellationToken::new();
    cancel.cancel();

    let items = analyzer
        .batch_process(
            vec![identity("t1", "r1"), identity("t1", "r2")],
            "standard",
            ReportFormat::Html,
            dir.path(),
            cancel,
        )
        .await
        .unwrap();

    assert_eq!(items.len(), 2);
    for item in &items {
        assert!(matches!(item.outcome, Err(AnalyzerError::Cancelled)));
    }
    assert_eq!(source.fetches(), 0);
}

#[tokio::test]
async fn test_batch_status_maps_failures_to_error() {
    let (analyzer, _source, _dir) = build(MockSource::new(one_run()));

    let statuses = analyzer
        .batch_status(&[identity("t1", "r1"), identity("t1", "gone")])
        .await;

    let by_run: HashMap<_, _> = statuses
        .iter()
        .map(|(id, status)| (id.run_id.clone(), status.clone()))
        .collect();
    assert_eq!(by_run["r1"], "completed");
    assert_eq!(by_run["gone"], "error");
}

#[tokio::test]
async fn test_comparison_serializes_round_trip() {
    let results = HashMap::from([
        ("t1/base".to_string(), run_payload("HTTP baseline", 100.0)),
        ("t1/cand".to_string(), run_payload("HTTP candidate", 150.0)),
    ]);
    let (analyzer, _source, _dir) = build(MockSource::new(results));

    let comparison = analyzer
        .compare_runs(&identity("t1", "base"), &identity("t1", "cand"))
        .await
        .unwrap();

    let value = serde_json::to_value(&comparison).unwrap();
    let back: ComparisonResult = serde_json::from_value(value).unwrap();
    assert_eq!(back.metrics.len(), comparison.metrics.len());
}
