//! CLI type definitions
//!
//! This module contains clap command structures that define the CLI interface.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "runlens")]
#[command(about = "Runlens - analyze and report on network test appliance runs", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Path to a config file (default: .runlens/config.yaml plus overrides)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Summarize one test run
    Summary(RunArgs),

    /// Dump the raw result payload for one run
    Raw(RunArgs),

    /// Show the appliance-side status of one run
    Status(RunArgs),

    /// Compare a candidate run against a baseline run
    Compare(CompareArgs),

    /// Generate a report for one run
    Report(ReportArgs),

    /// Render every applicable chart for one run
    Charts(ChartsArgs),

    /// Render a side-by-side comparison chart for two runs
    CompareCharts(CompareArgs),

    /// Summarize and report many runs concurrently
    Batch(BatchArgs),

    /// Cache maintenance commands
    #[command(subcommand)]
    Cache(CacheCommands),
}

#[derive(Args)]
pub struct RunArgs {
    /// Test identifier
    pub test_id: String,

    /// Run identifier
    pub run_id: String,

    /// Bypass the result cache for this call
    #[arg(long)]
    pub no_cache: bool,
}

#[derive(Args)]
pub struct CompareArgs {
    /// Baseline test identifier
    pub baseline_test_id: String,

    /// Baseline run identifier
    pub baseline_run_id: String,

    /// Candidate test identifier
    pub candidate_test_id: String,

    /// Candidate run identifier
    pub candidate_run_id: String,

    /// Directory for generated artifacts (compare-charts only)
    #[arg(short, long, default_value = "runlens-output")]
    pub output_dir: PathBuf,
}

#[derive(Args)]
pub struct ReportArgs {
    /// Test identifier
    pub test_id: String,

    /// Run identifier
    pub run_id: String,

    /// Report type (standard, executive, detailed, compliance)
    #[arg(short = 't', long, default_value = "standard")]
    pub report_type: String,

    /// Output format (html, csv, json)
    #[arg(short, long, default_value = "html")]
    pub format: String,

    /// Directory for generated reports
    #[arg(short, long, default_value = "runlens-output")]
    pub output_dir: PathBuf,
}

#[derive(Args)]
pub struct ChartsArgs {
    /// Test identifier
    pub test_id: String,

    /// Run identifier
    pub run_id: String,

    /// Directory for generated charts
    #[arg(short, long, default_value = "runlens-output")]
    pub output_dir: PathBuf,
}

#[derive(Args)]
pub struct BatchArgs {
    /// Runs to process, each as TEST_ID:RUN_ID
    #[arg(required = true, value_delimiter = ',')]
    pub runs: Vec<String>,

    /// Report type rendered for every run
    #[arg(short = 't', long, default_value = "standard")]
    pub report_type: String,

    /// Output format (html, csv, json)
    #[arg(short, long, default_value = "html")]
    pub format: String,

    /// Directory for generated reports
    #[arg(short, long, default_value = "runlens-output")]
    pub output_dir: PathBuf,

    /// Only fetch statuses instead of full processing
    #[arg(long)]
    pub status_only: bool,
}

#[derive(Subcommand)]
pub enum CacheCommands {
    /// Show cache statistics
    Stats,

    /// Remove every cached entry
    Clear,

    /// Remove expired entries (or everything older than --max-age-seconds)
    Cleanup {
        /// Age threshold overriding each entry's own TTL
        #[arg(long)]
        max_age_seconds: Option<u64>,
    },

    /// Drop the cached entries for one run
    Invalidate {
        /// Test identifier
        test_id: String,

        /// Run identifier
        run_id: String,
    },
}
