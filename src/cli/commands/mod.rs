//! CLI command handlers, one module per subcommand.

pub mod batch;
pub mod cache;
pub mod charts;
pub mod compare;
pub mod compare_charts;
pub mod raw;
pub mod report;
pub mod status;
pub mod summary;

use anyhow::{Result, anyhow};

use crate::domain::models::RunIdentity;
use crate::domain::ports::ReportFormat;

pub(crate) fn identity(test_id: &str, run_id: &str) -> Result<RunIdentity> {
    Ok(RunIdentity::new(test_id, run_id)?)
}

pub(crate) fn report_format(s: &str) -> Result<ReportFormat> {
    ReportFormat::parse(s)
        .ok_or_else(|| anyhow!("Unknown report format: {s}. Expected html, csv or json"))
}
