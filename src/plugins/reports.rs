//! Built-in report generators.
//!
//! Four report flavours over the same summary data: `standard` (full metric
//! tables), `executive` (short verdict), `detailed` (standard plus raw
//! payload context) and `compliance` (security posture). Each supports
//! html, csv and json output. Styling is deliberately minimal; the
//! structure of the artifact is the contract.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::errors::{AnalyzerError, AnalyzerResult};
use crate::domain::models::{RawResult, TestSummary};
use crate::domain::ports::{ReportFormat, ReportGenerator};

fn write_artifact(name: &str, path: &Path, content: &str) -> AnalyzerResult<PathBuf> {
    fs::write(path, content).map_err(|e| AnalyzerError::Plugin {
        name: name.to_string(),
        message: format!("cannot write {}: {e}", path.display()),
    })?;
    Ok(path.to_path_buf())
}

fn html_header(title: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title}</title>\n</head>\n<body>\n<h1>{title}</h1>\n"
    )
}

fn html_table(out: &mut String, title: &str, rows: &[(String, String)]) {
    let _ = writeln!(out, "<div class=\"section\">\n<h2>{title}</h2>\n<table>");
    for (key, value) in rows {
        let _ = writeln!(out, "<tr><th>{key}</th><td>{value}</td></tr>");
    }
    let _ = writeln!(out, "</table>\n</div>");
}

fn info_rows(summary: &TestSummary) -> Vec<(String, String)> {
    let mut rows = vec![
        ("Test".to_string(), summary.test_name.clone()),
        ("Test ID".to_string(), summary.test_id.clone()),
        ("Run ID".to_string(), summary.run_id.clone()),
        ("Type".to_string(), summary.test_type.as_str().to_string()),
        ("Status".to_string(), summary.status.clone()),
        (
            "Duration".to_string(),
            format!("{} seconds", summary.duration_seconds),
        ),
    ];
    if let Some(start) = &summary.start_time {
        rows.push(("Start Time".to_string(), start.clone()));
    }
    if let Some(end) = &summary.end_time {
        rows.push(("End Time".to_string(), end.clone()));
    }
    rows
}

fn metric_rows(summary: &TestSummary) -> Vec<(String, String)> {
    let mut rows = Vec::new();
    for (name, stats) in &summary.metrics {
        let mut cell = format!("avg {} {}", stats.average, stats.unit);
        if let Some(min) = stats.minimum {
            let _ = write!(cell, ", min {min}");
        }
        if let Some(max) = stats.maximum {
            let _ = write!(cell, ", max {max}");
        }
        rows.push((name.clone(), cell));
    }
    rows
}

fn type_specific_rows(summary: &TestSummary) -> Vec<(String, String)> {
    let mut rows = Vec::new();
    if let Some(strikes) = &summary.strikes {
        rows.push(("Strikes Attempted".to_string(), strikes.attempted.to_string()));
        rows.push(("Strikes Blocked".to_string(), strikes.blocked.to_string()));
        rows.push(("Strikes Allowed".to_string(), strikes.allowed.to_string()));
        rows.push((
            "Strike Block Rate".to_string(),
            format!("{}%", strikes.success_rate),
        ));
    }
    if let Some(tx) = &summary.transactions {
        rows.push(("Transactions Attempted".to_string(), tx.attempted.to_string()));
        rows.push(("Transactions Successful".to_string(), tx.successful.to_string()));
        rows.push(("Transactions Failed".to_string(), tx.failed.to_string()));
        rows.push((
            "Transaction Success Rate".to_string(),
            format!("{}%", tx.success_rate),
        ));
    }
    rows
}

fn csv_document(sections: &[(&str, Vec<(String, String)>)]) -> String {
    let mut out = String::from("section,field,value\n");
    for (section, rows) in sections {
        for (key, value) in rows {
            let _ = writeln!(out, "{section},{key},\"{}\"", value.replace('"', "\"\""));
        }
    }
    out
}

fn json_document(
    report_type: &str,
    summary: &TestSummary,
    extra: Option<serde_json::Value>,
) -> AnalyzerResult<String> {
    let mut doc = serde_json::json!({
        "reportType": report_type,
        "summary": summary,
    });
    if let Some(extra) = extra {
        doc["details"] = extra;
    }
    Ok(serde_json::to_string_pretty(&doc)?)
}

/// Full metric tables for day-to-day result review.
pub struct StandardReport;

impl ReportGenerator for StandardReport {
    fn generate(
        &self,
        summary: &TestSummary,
        _raw: &RawResult,
        format: ReportFormat,
        output_file: &Path,
    ) -> AnalyzerResult<PathBuf> {
        let content = match format {
            ReportFormat::Html => {
                let mut out = html_header(&format!("Test Report: {}", summary.test_name));
                html_table(&mut out, "Test Information", &info_rows(summary));
                let metrics = metric_rows(summary);
                if !metrics.is_empty() {
                    html_table(&mut out, "Performance Metrics", &metrics);
                }
                let specific = type_specific_rows(summary);
                if !specific.is_empty() {
                    html_table(&mut out, "Test-Type Metrics", &specific);
                }
                out.push_str("</body>\n</html>\n");
                out
            }
            ReportFormat::Csv => csv_document(&[
                ("info", info_rows(summary)),
                ("metrics", metric_rows(summary)),
                ("type_specific", type_specific_rows(summary)),
            ]),
            ReportFormat::Json => json_document("standard", summary, None)?,
        };
        write_artifact("standard", output_file, &content)
    }
}

/// One-screen verdict for people who will not read the tables.
pub struct ExecutiveReport;

impl ExecutiveReport {
    fn headline(summary: &TestSummary) -> String {
        let mut parts = vec![format!(
            "{} ({}) finished with status '{}' in {} seconds.",
            summary.test_name,
            summary.test_type.as_str(),
            summary.status,
            summary.duration_seconds
        )];
        if let Some(throughput) = summary.metric("throughput") {
            parts.push(format!(
                "Average throughput {} {}.",
                throughput.average, throughput.unit
            ));
        }
        if let Some(strikes) = &summary.strikes {
            parts.push(format!(
                "{} of {} strikes blocked ({}%).",
                strikes.blocked, strikes.attempted, strikes.success_rate
            ));
        }
        if let Some(tx) = &summary.transactions {
            parts.push(format!(
                "{}% of {} transactions succeeded.",
                tx.success_rate, tx.attempted
            ));
        }
        parts.join(" ")
    }
}

impl ReportGenerator for ExecutiveReport {
    fn generate(
        &self,
        summary: &TestSummary,
        _raw: &RawResult,
        format: ReportFormat,
        output_file: &Path,
    ) -> AnalyzerResult<PathBuf> {
        let headline = Self::headline(summary);
        let content = match format {
            ReportFormat::Html => {
                let mut out = html_header(&format!("Executive Summary: {}", summary.test_name));
                let _ = writeln!(out, "<p>{headline}</p>");
                html_table(&mut out, "At a Glance", &info_rows(summary));
                out.push_str("</body>\n</html>\n");
                out
            }
            ReportFormat::Csv => csv_document(&[
                ("headline", vec![("summary".to_string(), headline)]),
                ("info", info_rows(summary)),
            ]),
            ReportFormat::Json => json_document(
                "executive",
                summary,
                Some(serde_json::json!({ "headline": headline })),
            )?,
        };
        write_artifact("executive", output_file, &content)
    }
}

/// Standard content plus raw-payload context for engineers digging in.
pub struct DetailedReport;

impl DetailedReport {
    fn raw_rows(raw: &RawResult) -> Vec<(String, String)> {
        let mut rows = Vec::new();
        if let Some(obj) = raw.as_value().as_object() {
            rows.push(("Top-level fields".to_string(), obj.len().to_string()));
        }
        if let Some(series) = raw.time_series() {
            rows.push(("Time-series samples".to_string(), series.len().to_string()));
        }
        if let Some(metrics) = raw.metrics() {
            let names: Vec<&str> = metrics.keys().map(String::as_str).collect();
            rows.push(("Reported metric blocks".to_string(), names.join(", ")));
        }
        rows
    }
}

impl ReportGenerator for DetailedReport {
    fn generate(
        &self,
        summary: &TestSummary,
        raw: &RawResult,
        format: ReportFormat,
        output_file: &Path,
    ) -> AnalyzerResult<PathBuf> {
        let content = match format {
            ReportFormat::Html => {
                let mut out = html_header(&format!("Detailed Report: {}", summary.test_name));
                html_table(&mut out, "Test Information", &info_rows(summary));
                let metrics = metric_rows(summary);
                if !metrics.is_empty() {
                    html_table(&mut out, "Performance Metrics", &metrics);
                }
                let specific = type_specific_rows(summary);
                if !specific.is_empty() {
                    html_table(&mut out, "Test-Type Metrics", &specific);
                }
                let raw_rows = Self::raw_rows(raw);
                if !raw_rows.is_empty() {
                    html_table(&mut out, "Raw Result Context", &raw_rows);
                }
                out.push_str("</body>\n</html>\n");
                out
            }
            ReportFormat::Csv => csv_document(&[
                ("info", info_rows(summary)),
                ("metrics", metric_rows(summary)),
                ("type_specific", type_specific_rows(summary)),
                ("raw", Self::raw_rows(raw)),
            ]),
            ReportFormat::Json => json_document(
                "detailed",
                summary,
                Some(serde_json::json!({ "raw": raw.as_value() })),
            )?,
        };
        write_artifact("detailed", output_file, &content)
    }
}

/// Security-posture view: strike outcomes and an overall pass/fail line.
pub struct ComplianceReport;

impl ComplianceReport {
    /// Block rates at or above this count as a passing posture.
    const PASS_THRESHOLD: f64 = 95.0;

    fn verdict(summary: &TestSummary) -> (String, String) {
        match &summary.strikes {
            Some(strikes) if strikes.success_rate >= Self::PASS_THRESHOLD => (
                "PASS".to_string(),
                format!("Block rate {}% meets the {}% threshold", strikes.success_rate, Self::PASS_THRESHOLD),
            ),
            Some(strikes) => (
                "FAIL".to_string(),
                format!(
                    "Block rate {}% below the {}% threshold ({} strikes allowed)",
                    strikes.success_rate, Self::PASS_THRESHOLD, strikes.allowed
                ),
            ),
            None => (
                "NOT APPLICABLE".to_string(),
                "Run reported no strike metrics".to_string(),
            ),
        }
    }
}

impl ReportGenerator for ComplianceReport {
    fn generate(
        &self,
        summary: &TestSummary,
        _raw: &RawResult,
        format: ReportFormat,
        output_file: &Path,
    ) -> AnalyzerResult<PathBuf> {
        let (verdict, reason) = Self::verdict(summary);
        let verdict_rows = vec![
            ("Verdict".to_string(), verdict.clone()),
            ("Reason".to_string(), reason.clone()),
        ];
        let content = match format {
            ReportFormat::Html => {
                let mut out = html_header(&format!("Compliance Report: {}", summary.test_name));
                html_table(&mut out, "Verdict", &verdict_rows);
                html_table(&mut out, "Test Information", &info_rows(summary));
                let specific = type_specific_rows(summary);
                if !specific.is_empty() {
                    html_table(&mut out, "Security Metrics", &specific);
                }
                out.push_str("</body>\n</html>\n");
                out
            }
            ReportFormat::Csv => csv_document(&[
                ("verdict", verdict_rows),
                ("info", info_rows(summary)),
                ("type_specific", type_specific_rows(summary)),
            ]),
            ReportFormat::Json => json_document(
                "compliance",
                summary,
                Some(serde_json::json!({ "verdict": verdict, "reason": reason })),
            )?,
        };
        write_artifact("compliance", output_file, &content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{MetricStats, StrikeMetrics, TestType};
    use std::collections::BTreeMap;

    fn strike_summary(block_rate: f64) -> TestSummary {
        let mut metrics = BTreeMap::new();
        metrics.insert(
            "throughput".to_string(),
            MetricStats {
                average: 950.0,
                minimum: None,
                maximum: Some(1020.0),
                unit: "mbps".to_string(),
            },
        );
        TestSummary {
            test_id: "t1".to_string(),
            run_id: "r1".to_string(),
            test_name: "Edge firewall strikes".to_string(),
            test_type: TestType::Strike,
            status: "completed".to_string(),
            start_time: Some("2026-08-01T10:00:00Z".to_string()),
            end_time: Some("2026-08-01T10:02:00Z".to_string()),
            duration_seconds: 120.0,
            metrics,
            strikes: Some(StrikeMetrics {
                attempted: 200,
                blocked: 190,
                allowed: 10,
                success_rate: block_rate,
            }),
            transactions: None,
        }
    }

    #[test]
    fn standard_report_writes_html_with_metric_tables() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.html");
        let raw = RawResult::new(serde_json::json!({}));

        let written = StandardReport
            .generate(&strike_summary(95.0), &raw, ReportFormat::Html, &path)
            .unwrap();

        let content = fs::read_to_string(written).unwrap();
        assert!(content.contains("Edge firewall strikes"));
        assert!(content.contains("Performance Metrics"));
        assert!(content.contains("Strikes Blocked"));
    }

    #[test]
    fn compliance_verdict_tracks_threshold() {
        let (pass, _) = ComplianceReport::verdict(&strike_summary(97.5));
        let (fail, _) = ComplianceReport::verdict(&strike_summary(80.0));
        assert_eq!(pass, "PASS");
        assert_eq!(fail, "FAIL");
    }

    #[test]
    fn json_report_embeds_summary() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        let raw = RawResult::new(serde_json::json!({"extra": true}));

        DetailedReport
            .generate(&strike_summary(95.0), &raw, ReportFormat::Json, &path)
            .unwrap();

        let doc: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(doc["reportType"], "detailed");
        assert_eq!(doc["summary"]["test_name"], "Edge firewall strikes");
        assert_eq!(doc["details"]["raw"]["extra"], true);
    }
}
