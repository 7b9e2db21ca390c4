//! Table output formatting for CLI commands
//!
//! Human-readable rendering of summaries, comparisons, batch results and
//! cache statistics using comfy-table.

use comfy_table::{Attribute, Cell, ContentArrangement, Table, presets};

use crate::adapters::CacheStats;
use crate::domain::models::{ComparisonResult, MetricDelta, TestSummary};
use crate::services::BatchItem;

fn base_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn header(cells: &[&str]) -> Vec<Cell> {
    cells
        .iter()
        .map(|c| Cell::new(c).add_attribute(Attribute::Bold))
        .collect()
}

fn opt_num(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.2}"))
}

pub fn format_summary(summary: &TestSummary) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Test: {} ({})\nRun: {}  Type: {}  Status: {}\nDuration: {:.1}s\n",
        summary.test_name,
        summary.test_id,
        summary.run_id,
        summary.test_type.as_str(),
        summary.status,
        summary.duration_seconds,
    ));

    if !summary.metrics.is_empty() {
        let mut table = base_table();
        table.set_header(header(&["Metric", "Average", "Min", "Max", "Unit"]));
        for (name, stats) in &summary.metrics {
            table.add_row(vec![
                name.clone(),
                format!("{:.2}", stats.average),
                opt_num(stats.minimum),
                opt_num(stats.maximum),
                stats.unit.clone(),
            ]);
        }
        out.push('\n');
        out.push_str(&table.to_string());
        out.push('\n');
    }

    if let Some(strikes) = &summary.strikes {
        out.push_str(&format!(
            "\nStrikes: {} attempted, {} blocked, {} allowed ({:.1}% blocked)\n",
            strikes.attempted, strikes.blocked, strikes.allowed, strikes.success_rate
        ));
    }
    if let Some(tx) = &summary.transactions {
        out.push_str(&format!(
            "\nTransactions: {} attempted, {} successful, {} failed ({:.1}% success)\n",
            tx.attempted, tx.successful, tx.failed, tx.success_rate
        ));
    }

    out
}

fn delta_row(name: &str, delta: &MetricDelta) -> Vec<String> {
    let pct = delta
        .percentage
        .map_or_else(|| "n/a".to_string(), |p| format!("{p:+.1}%"));
    vec![
        name.to_string(),
        format!("{:.2}", delta.baseline),
        format!("{:.2}", delta.candidate),
        format!("{:+.2}", delta.difference),
        pct,
        delta.unit.clone(),
    ]
}

pub fn format_comparison(comparison: &ComparisonResult) -> String {
    let mut out = format!(
        "Baseline:  {}/{}\nCandidate: {}/{}\n",
        comparison.baseline.test_id,
        comparison.baseline.run_id,
        comparison.candidate.test_id,
        comparison.candidate.run_id,
    );

    if comparison.metrics.is_empty() {
        out.push_str("\nNo comparable metrics.\n");
    } else {
        let mut table = base_table();
        table.set_header(header(&[
            "Metric", "Baseline", "Candidate", "Delta", "Change", "Unit",
        ]));
        for (name, delta) in &comparison.metrics {
            table.add_row(delta_row(name, delta));
        }
        out.push('\n');
        out.push_str(&table.to_string());
        out.push('\n');
    }

    if let Some(strikes) = &comparison.strikes {
        out.push_str(&format!(
            "\nStrike block rate: {:.1}% -> {:.1}% ({:+.1})\n",
            strikes.baseline, strikes.candidate, strikes.difference
        ));
    }
    if let Some(tx) = &comparison.transactions {
        out.push_str(&format!(
            "\nTransaction success rate: {:.1}% -> {:.1}% ({:+.1})\n",
            tx.baseline, tx.candidate, tx.difference
        ));
    }

    if !comparison.incomparable.is_empty() {
        out.push_str(&format!(
            "\nNot comparable: {}\n",
            comparison.incomparable.join(", ")
        ));
    }

    out
}

pub fn format_cache_stats(stats: &CacheStats) -> String {
    let mut table = base_table();
    table.set_header(header(&["Field", "Value"]));
    table.add_row(vec!["Entries".to_string(), stats.entry_count.to_string()]);
    table.add_row(vec![
        "Total size".to_string(),
        format!("{} bytes", stats.total_bytes),
    ]);
    table.add_row(vec![
        "Oldest entry".to_string(),
        stats
            .oldest_entry_age_seconds
            .map_or_else(|| "-".to_string(), |s| format!("{s}s")),
    ]);
    table.add_row(vec!["Hits".to_string(), stats.hit_count.to_string()]);
    table.add_row(vec!["Misses".to_string(), stats.miss_count.to_string()]);
    table.to_string()
}

pub fn format_batch(items: &[BatchItem]) -> String {
    let mut table = base_table();
    table.set_header(header(&["Run", "Result", "Report"]));
    for item in items {
        match &item.outcome {
            Ok(output) => table.add_row(vec![
                item.identity.to_string(),
                "ok".to_string(),
                output.report_path.display().to_string(),
            ]),
            Err(e) => table.add_row(vec![
                item.identity.to_string(),
                format!("failed ({})", e.kind()),
                e.to_string(),
            ]),
        };
    }

    let failed = items.iter().filter(|i| i.outcome.is_err()).count();
    format!(
        "{}\n\n{} run{} processed, {} failed\n",
        table,
        items.len(),
        if items.len() == 1 { "" } else { "s" },
        failed
    )
}
