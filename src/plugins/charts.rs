//! Built-in chart generators.
//!
//! Charts are emitted as self-contained SVG documents: a time-series
//! polyline when the raw result carries interval samples, otherwise a bar
//! chart over the summary statistics. The `comparison` generator is the
//! only one that renders two runs side by side.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::errors::{AnalyzerError, AnalyzerResult};
use crate::domain::models::{ComparisonResult, RawResult, TestSummary};
use crate::domain::ports::ChartGenerator;

const WIDTH: f64 = 640.0;
const HEIGHT: f64 = 360.0;
const MARGIN: f64 = 48.0;

fn write_chart(name: &str, path: &Path, content: &str) -> AnalyzerResult<PathBuf> {
    fs::write(path, content).map_err(|e| AnalyzerError::Plugin {
        name: name.to_string(),
        message: format!("cannot write {}: {e}", path.display()),
    })?;
    Ok(path.to_path_buf())
}

fn svg_open(title: &str) -> String {
    format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{WIDTH}\" height=\"{HEIGHT}\" \
         viewBox=\"0 0 {WIDTH} {HEIGHT}\">\n\
         <rect width=\"{WIDTH}\" height=\"{HEIGHT}\" fill=\"white\"/>\n\
         <text x=\"{}\" y=\"24\" text-anchor=\"middle\" font-size=\"16\">{title}</text>\n",
        WIDTH / 2.0
    )
}

/// Vertical bar chart over labeled values.
fn bar_chart(title: &str, unit: &str, bars: &[(String, f64)]) -> String {
    let mut out = svg_open(title);
    let peak = bars
        .iter()
        .map(|(_, v)| *v)
        .fold(0.0_f64, f64::max)
        .max(1.0);

    let plot_w = WIDTH - 2.0 * MARGIN;
    let plot_h = HEIGHT - 2.0 * MARGIN;
    let slot = plot_w / bars.len() as f64;
    let bar_w = slot * 0.6;

    for (i, (label, value)) in bars.iter().enumerate() {
        let h = (value / peak) * plot_h;
        let x = MARGIN + i as f64 * slot + (slot - bar_w) / 2.0;
        let y = HEIGHT - MARGIN - h;
        let _ = writeln!(
            out,
            "<rect x=\"{x:.1}\" y=\"{y:.1}\" width=\"{bar_w:.1}\" height=\"{h:.1}\" fill=\"#0066cc\"/>"
        );
        let _ = writeln!(
            out,
            "<text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"middle\" font-size=\"12\">{label}</text>",
            x + bar_w / 2.0,
            HEIGHT - MARGIN + 16.0
        );
        let _ = writeln!(
            out,
            "<text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"middle\" font-size=\"11\">{value} {unit}</text>",
            x + bar_w / 2.0,
            y - 6.0
        );
    }

    out.push_str("</svg>\n");
    out
}

/// Time-series polyline over `(index, value)` samples.
fn series_chart(title: &str, unit: &str, values: &[f64], average: Option<f64>) -> String {
    let mut out = svg_open(title);
    let peak = values.iter().copied().fold(0.0_f64, f64::max).max(1.0);
    let plot_w = WIDTH - 2.0 * MARGIN;
    let plot_h = HEIGHT - 2.0 * MARGIN;
    let step = if values.len() > 1 {
        plot_w / (values.len() - 1) as f64
    } else {
        plot_w
    };

    let points: Vec<String> = values
        .iter()
        .enumerate()
        .map(|(i, v)| {
            let x = MARGIN + i as f64 * step;
            let y = HEIGHT - MARGIN - (v / peak) * plot_h;
            format!("{x:.1},{y:.1}")
        })
        .collect();
    let _ = writeln!(
        out,
        "<polyline fill=\"none\" stroke=\"#0066cc\" stroke-width=\"2\" points=\"{}\"/>",
        points.join(" ")
    );

    if let Some(avg) = average {
        let y = HEIGHT - MARGIN - (avg / peak) * plot_h;
        let _ = writeln!(
            out,
            "<line x1=\"{MARGIN}\" y1=\"{y:.1}\" x2=\"{:.1}\" y2=\"{y:.1}\" \
             stroke=\"red\" stroke-dasharray=\"6 4\"/>",
            WIDTH - MARGIN
        );
        let _ = writeln!(
            out,
            "<text x=\"{:.1}\" y=\"{:.1}\" font-size=\"11\" fill=\"red\">avg {avg} {unit}</text>",
            MARGIN + 4.0,
            y - 6.0
        );
    }

    out.push_str("</svg>\n");
    out
}

/// Samples of one field from the raw time series, in order.
fn series_values(raw: &RawResult, field: &str) -> Vec<f64> {
    raw.time_series()
        .map(|points| {
            points
                .iter()
                .filter_map(|p| p.get(field).and_then(serde_json::Value::as_f64))
                .collect()
        })
        .unwrap_or_default()
}

fn metric_chart(
    name: &'static str,
    metric: &str,
    title_prefix: &str,
    summary: &TestSummary,
    raw: &RawResult,
    output_file: &Path,
) -> AnalyzerResult<PathBuf> {
    let stats = summary
        .metric(metric)
        .ok_or_else(|| AnalyzerError::Plugin {
            name: name.to_string(),
            message: format!("summary has no {metric} metric"),
        })?;

    let title = format!("{title_prefix}: {}", summary.test_name);
    let values = series_values(raw, metric);
    let content = if values.len() >= 2 {
        series_chart(&title, &stats.unit, &values, Some(stats.average))
    } else {
        // No usable samples; fall back to the summary statistics.
        let mut bars = vec![("average".to_string(), stats.average)];
        if let Some(min) = stats.minimum {
            bars.push(("minimum".to_string(), min));
        }
        if let Some(max) = stats.maximum {
            bars.push(("maximum".to_string(), max));
        }
        bar_chart(&title, &stats.unit, &bars)
    };
    write_chart(name, output_file, &content)
}

/// Throughput over time, falling back to average/min/max bars.
pub struct ThroughputChart;

impl ChartGenerator for ThroughputChart {
    fn applies_to(&self, summary: &TestSummary) -> bool {
        summary.has_metric("throughput")
    }

    fn generate(
        &self,
        summary: &TestSummary,
        raw: &RawResult,
        output_file: &Path,
    ) -> AnalyzerResult<PathBuf> {
        metric_chart("throughput", "throughput", "Throughput", summary, raw, output_file)
    }
}

/// Latency over time, falling back to average/min/max bars.
pub struct LatencyChart;

impl ChartGenerator for LatencyChart {
    fn applies_to(&self, summary: &TestSummary) -> bool {
        summary.has_metric("latency")
    }

    fn generate(
        &self,
        summary: &TestSummary,
        raw: &RawResult,
        output_file: &Path,
    ) -> AnalyzerResult<PathBuf> {
        metric_chart("latency", "latency", "Latency", summary, raw, output_file)
    }
}

/// Strike outcome bars for security tests.
pub struct StrikesChart;

impl ChartGenerator for StrikesChart {
    fn applies_to(&self, summary: &TestSummary) -> bool {
        summary.strikes.is_some()
    }

    fn generate(
        &self,
        summary: &TestSummary,
        _raw: &RawResult,
        output_file: &Path,
    ) -> AnalyzerResult<PathBuf> {
        let strikes = summary.strikes.as_ref().ok_or_else(|| AnalyzerError::Plugin {
            name: "strikes".into(),
            message: "summary has no strike metrics".into(),
        })?;
        let bars = vec![
            ("attempted".to_string(), strikes.attempted as f64),
            ("blocked".to_string(), strikes.blocked as f64),
            ("allowed".to_string(), strikes.allowed as f64),
        ];
        let content = bar_chart(
            &format!("Strike Results: {}", summary.test_name),
            "strikes",
            &bars,
        );
        write_chart("strikes", output_file, &content)
    }
}

/// Transaction outcome bars for application/client simulations.
pub struct TransactionsChart;

impl ChartGenerator for TransactionsChart {
    fn applies_to(&self, summary: &TestSummary) -> bool {
        summary.transactions.is_some()
    }

    fn generate(
        &self,
        summary: &TestSummary,
        _raw: &RawResult,
        output_file: &Path,
    ) -> AnalyzerResult<PathBuf> {
        let tx = summary
            .transactions
            .as_ref()
            .ok_or_else(|| AnalyzerError::Plugin {
                name: "transactions".into(),
                message: "summary has no transaction metrics".into(),
            })?;
        let bars = vec![
            ("attempted".to_string(), tx.attempted as f64),
            ("successful".to_string(), tx.successful as f64),
            ("failed".to_string(), tx.failed as f64),
        ];
        let content = bar_chart(
            &format!("Transaction Results: {}", summary.test_name),
            "transactions",
            &bars,
        );
        write_chart("transactions", output_file, &content)
    }
}

/// Grouped baseline/candidate bars for every comparable metric.
pub struct ComparisonChart;

impl ChartGenerator for ComparisonChart {
    /// Never applicable to a single run; only `generate_comparison` works.
    fn applies_to(&self, _summary: &TestSummary) -> bool {
        false
    }

    fn generate(
        &self,
        _summary: &TestSummary,
        _raw: &RawResult,
        _output_file: &Path,
    ) -> AnalyzerResult<PathBuf> {
        Err(AnalyzerError::Plugin {
            name: "comparison".into(),
            message: "comparison charts need two runs".into(),
        })
    }

    fn generate_comparison(
        &self,
        comparison: &ComparisonResult,
        output_file: &Path,
    ) -> AnalyzerResult<PathBuf> {
        if comparison.metrics.is_empty() {
            return Err(AnalyzerError::Plugin {
                name: "comparison".into(),
                message: "no comparable metrics between the two runs".into(),
            });
        }

        let mut bars = Vec::new();
        for (name, delta) in &comparison.metrics {
            bars.push((format!("{name} (base)"), delta.baseline));
            bars.push((format!("{name} (cand)"), delta.candidate));
        }
        let content = bar_chart(
            &format!(
                "Comparison: {} vs {}",
                comparison.baseline.run_id, comparison.candidate.run_id
            ),
            "",
            &bars,
        );
        write_chart("comparison", output_file, &content)
    }
}
