//! Result analyzer orchestration.
//!
//! Composes the cache store, summary engine, comparison engine and plugin
//! registry behind the public single-run and batch operations. Batch work
//! runs concurrently under a bounded in-flight limit; requests for the same
//! cache key are coalesced so a concurrent cold miss triggers exactly one
//! remote fetch.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;

use futures::stream::{self, StreamExt};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::adapters::cache::{PayloadKind, ResultCache};
use crate::domain::errors::{AnalyzerError, AnalyzerResult};
use crate::domain::models::{ComparisonResult, RawResult, RunIdentity, TestSummary};
use crate::domain::ports::{ReportFormat, ResultSource};
use crate::plugins::PluginRegistry;
use crate::services::{comparison, summary};

/// Tunables for the orchestrator.
#[derive(Debug, Clone)]
pub struct AnalyzerOptions {
    /// Timeout applied to every remote fetch.
    pub fetch_timeout: Duration,
    /// Bound on concurrently processed batch items, and therefore on
    /// simultaneous appliance calls.
    pub max_in_flight: usize,
    /// Master switch; when off every operation bypasses the cache.
    pub cache_enabled: bool,
}

impl Default for AnalyzerOptions {
    fn default() -> Self {
        Self {
            fetch_timeout: Duration::from_secs(60),
            max_in_flight: 4,
            cache_enabled: true,
        }
    }
}

/// Per-chart result of a `generate_charts` call. A failed chart never
/// aborts the others.
#[derive(Debug)]
pub struct ChartOutcome {
    pub chart: String,
    pub outcome: AnalyzerResult<PathBuf>,
}

/// Per-item payload of a successful batch entry.
#[derive(Debug)]
pub struct BatchOutput {
    pub summary: TestSummary,
    pub report_path: PathBuf,
}

/// Per-item result of a batch run, in input order.
#[derive(Debug)]
pub struct BatchItem {
    pub identity: RunIdentity,
    pub outcome: AnalyzerResult<BatchOutput>,
}

/// Orchestrates fetch, analysis and rendering for test runs.
pub struct ResultAnalyzer {
    source: Arc<dyn ResultSource>,
    cache: Arc<ResultCache>,
    registry: Arc<PluginRegistry>,
    options: AnalyzerOptions,
    /// Per-key coalescing locks for in-flight fetches.
    inflight: StdMutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl ResultAnalyzer {
    pub fn new(
        source: Arc<dyn ResultSource>,
        cache: Arc<ResultCache>,
        registry: Arc<PluginRegistry>,
        options: AnalyzerOptions,
    ) -> Self {
        Self {
            source,
            cache,
            registry,
            options,
            inflight: StdMutex::new(HashMap::new()),
        }
    }

    pub fn cache(&self) -> &ResultCache {
        &self.cache
    }

    pub fn registry(&self) -> &PluginRegistry {
        &self.registry
    }

    /// Fetch the raw result for one run, consulting the cache first.
    ///
    /// `use_cache = false` bypasses both the read and the write. Failed
    /// fetches are never cached.
    pub async fn get_raw_result(
        &self,
        identity: &RunIdentity,
        use_cache: bool,
    ) -> AnalyzerResult<RawResult> {
        if !self.caching(use_cache) {
            return self.fetch_remote(identity).await;
        }

        let key = ResultCache::key_for(identity, PayloadKind::Raw);
        let lock = self.key_lock(&key);
        let guard = lock.lock().await;

        let result = match self.cache.get(&key) {
            Some(value) => Ok(RawResult::new(value)),
            None => match self.fetch_remote(identity).await {
                Ok(raw) => self.cache.put_default(&key, raw.as_value()).map(|()| raw),
                Err(e) => Err(e),
            },
        };

        drop(guard);
        self.release_key_lock(&key);
        result
    }

    /// Derive (or read back) the summary for one run.
    ///
    /// On a summary-cache miss this obtains the raw result (itself
    /// cache-aware), derives the summary and stores both entries.
    pub async fn get_summary(
        &self,
        identity: &RunIdentity,
        use_cache: bool,
    ) -> AnalyzerResult<TestSummary> {
        if !self.caching(use_cache) {
            let raw = self.fetch_remote(identity).await?;
            return summary::summarize(identity, &raw);
        }

        let key = ResultCache::key_for(identity, PayloadKind::Summary);
        let lock = self.key_lock(&key);
        let guard = lock.lock().await;

        let result = match self.cache.get(&key) {
            Some(value) => match serde_json::from_value::<TestSummary>(value) {
                Ok(summary) => Ok(summary),
                Err(e) => {
                    // Schema drift between releases; refetch as if absent.
                    debug!(%identity, error = %e, "cached summary unreadable, rebuilding");
                    self.cache.invalidate(&key);
                    self.rebuild_summary(identity, &key).await
                }
            },
            None => self.rebuild_summary(identity, &key).await,
        };

        drop(guard);
        self.release_key_lock(&key);
        result
    }

    async fn rebuild_summary(
        &self,
        identity: &RunIdentity,
        summary_key: &str,
    ) -> AnalyzerResult<TestSummary> {
        let raw = self.get_raw_result(identity, true).await?;
        let summary = summary::summarize(identity, &raw)?;
        self.cache
            .put_default(summary_key, &serde_json::to_value(&summary)?)?;
        Ok(summary)
    }

    /// Current appliance-side status of one run. Never cached; status is
    /// the one thing that changes while a run is live.
    pub async fn run_status(&self, identity: &RunIdentity) -> AnalyzerResult<String> {
        self.source.fetch_run_status(identity).await
    }

    /// Statuses for many runs, fetched concurrently. Per-item failures map
    /// to the status string `error`, matching the batch reporting surface.
    pub async fn batch_status(
        &self,
        identities: &[RunIdentity],
    ) -> Vec<(RunIdentity, String)> {
        stream::iter(identities.iter().cloned())
            .map(|identity| async move {
                let status = match self.source.fetch_run_status(&identity).await {
                    Ok(status) => status,
                    Err(e) => {
                        warn!(%identity, error = %e, "status fetch failed");
                        "error".to_string()
                    }
                };
                (identity, status)
            })
            .buffered(self.options.max_in_flight.max(1))
            .collect()
            .await
    }

    /// Compare two runs (candidate against baseline), cache-aware.
    pub async fn compare_runs(
        &self,
        baseline: &RunIdentity,
        candidate: &RunIdentity,
    ) -> AnalyzerResult<ComparisonResult> {
        let (base, cand) = futures::try_join!(
            self.get_summary(baseline, true),
            self.get_summary(candidate, true)
        )?;
        Ok(comparison::compare(&base, &cand))
    }

    /// Render one report for one run via the named report plugin.
    pub async fn generate_report(
        &self,
        identity: &RunIdentity,
        report_type: &str,
        format: ReportFormat,
        output_dir: &Path,
    ) -> AnalyzerResult<PathBuf> {
        let generator =
            self.registry
                .report(report_type)
                .ok_or_else(|| AnalyzerError::PluginNotFound {
                    namespace: "report",
                    name: report_type.to_string(),
                })?;

        let summary = self.get_summary(identity, true).await?;
        let raw = self.get_raw_result(identity, true).await?;

        ensure_output_dir(output_dir)?;
        let path = output_dir.join(format!(
            "report_{}_{}_{report_type}.{}",
            identity.test_id,
            identity.run_id,
            format.extension()
        ));
        let written = generator.generate(&summary, &raw, format, &path)?;
        info!(%identity, report_type, path = %written.display(), "generated report");
        Ok(written)
    }

    /// Render every applicable chart for one run.
    ///
    /// A failure in one chart type is recorded in its outcome and skipped;
    /// the remaining charts still render.
    pub async fn generate_charts(
        &self,
        identity: &RunIdentity,
        output_dir: &Path,
    ) -> AnalyzerResult<Vec<ChartOutcome>> {
        let summary = self.get_summary(identity, true).await?;
        let raw = self.get_raw_result(identity, true).await?;
        ensure_output_dir(output_dir)?;

        let mut outcomes = Vec::new();
        for name in self.registry.chart_names() {
            let Some(chart) = self.registry.chart(&name) else {
                continue;
            };
            if !chart.applies_to(&summary) {
                continue;
            }
            let path = output_dir.join(format!(
                "chart_{}_{}_{name}.svg",
                identity.test_id, identity.run_id
            ));
            let outcome = chart.generate(&summary, &raw, &path);
            if let Err(e) = &outcome {
                warn!(%identity, chart = %name, error = %e, "chart generation failed");
            }
            outcomes.push(ChartOutcome {
                chart: name,
                outcome,
            });
        }
        Ok(outcomes)
    }

    /// Render a single comparison chart for two runs.
    pub async fn compare_charts(
        &self,
        baseline: &RunIdentity,
        candidate: &RunIdentity,
        output_dir: &Path,
    ) -> AnalyzerResult<PathBuf> {
        let generator = self
            .registry
            .chart("comparison")
            .ok_or_else(|| AnalyzerError::PluginNotFound {
                namespace: "chart",
                name: "comparison".to_string(),
            })?;

        let comparison = self.compare_runs(baseline, candidate).await?;
        ensure_output_dir(output_dir)?;
        let path = output_dir.join(format!(
            "comparison_{}_{}_vs_{}_{}.svg",
            baseline.test_id, baseline.run_id, candidate.test_id, candidate.run_id
        ));
        generator.generate_comparison(&comparison, &path)
    }

    /// Process a batch of runs: derive each summary and render the
    /// requested report.
    ///
    /// Items run concurrently up to `max_in_flight`. Every per-item failure
    /// is captured in that item's outcome; the batch always completes.
    /// Cancelling the token skips items that have not started yet, each
    /// reported as `Cancelled`, without touching items already done.
    ///
    /// An unknown report type fails the whole batch up front, before any
    /// remote call.
    pub async fn batch_process(
        &self,
        identities: Vec<RunIdentity>,
        report_type: &str,
        format: ReportFormat,
        output_dir: &Path,
        cancel: CancellationToken,
    ) -> AnalyzerResult<Vec<BatchItem>> {
        if self.registry.report(report_type).is_none() {
            return Err(AnalyzerError::PluginNotFound {
                namespace: "report",
                name: report_type.to_string(),
            });
        }
        ensure_output_dir(output_dir)?;

        let total = identities.len();
        info!(total, report_type, "starting batch");

        let mut items: Vec<(usize, BatchItem)> = stream::iter(identities.into_iter().enumerate())
            .map(|(index, identity)| {
                let cancel = cancel.clone();
                async move {
                    let outcome = if cancel.is_cancelled() {
                        Err(AnalyzerError::Cancelled)
                    } else {
                        self.process_one(&identity, report_type, format, output_dir)
                            .await
                    };
                    (index, BatchItem { identity, outcome })
                }
            })
            .buffer_unordered(self.options.max_in_flight.max(1))
            .collect()
            .await;
        items.sort_by_key(|(index, _)| *index);

        let failed = items
            .iter()
            .filter(|(_, item)| item.outcome.is_err())
            .count();
        if failed > 0 {
            warn!(total, failed, "batch completed with errors");
        } else {
            info!(total, "batch completed");
        }

        Ok(items.into_iter().map(|(_, item)| item).collect())
    }

    async fn process_one(
        &self,
        identity: &RunIdentity,
        report_type: &str,
        format: ReportFormat,
        output_dir: &Path,
    ) -> AnalyzerResult<BatchOutput> {
        let summary = self.get_summary(identity, true).await?;
        let report_path = self
            .generate_report(identity, report_type, format, output_dir)
            .await?;
        Ok(BatchOutput {
            summary,
            report_path,
        })
    }

    async fn fetch_remote(&self, identity: &RunIdentity) -> AnalyzerResult<RawResult> {
        let timeout = self.options.fetch_timeout;
        debug!(%identity, source = self.source.name(), "fetching raw result");
        match tokio::time::timeout(timeout, self.source.fetch_raw_result(identity, timeout)).await
        {
            Ok(result) => result,
            Err(_) => Err(AnalyzerError::Timeout {
                operation: format!("fetch raw result for {identity}"),
                seconds: timeout.as_secs(),
            }),
        }
    }

    fn caching(&self, use_cache: bool) -> bool {
        use_cache && self.options.cache_enabled
    }

    fn key_lock(&self, key: &str) -> Arc<Mutex<()>> {
        let mut map = self.inflight.lock().expect("inflight lock poisoned");
        map.entry(key.to_string()).or_default().clone()
    }

    fn release_key_lock(&self, key: &str) {
        let mut map = self.inflight.lock().expect("inflight lock poisoned");
        // Drop the map entry once no other task holds a clone.
        if map.get(key).is_some_and(|lock| Arc::strong_count(lock) == 1) {
            map.remove(key);
        }
    }
}

fn ensure_output_dir(dir: &Path) -> AnalyzerResult<()> {
    std::fs::create_dir_all(dir).map_err(|e| {
        AnalyzerError::Validation(format!(
            "output directory {} is not usable: {e}",
            dir.display()
        ))
    })
}
