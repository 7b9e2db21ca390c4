//! Command-line interface: clap types, per-command handlers and output
//! formatting.

pub mod commands;
pub mod context;
pub mod output;
pub mod types;

pub use types::{Cli, Commands};

use crate::domain::errors::AnalyzerError;

/// Print a command failure and exit non-zero.
///
/// In JSON mode the error goes to stdout as a machine-readable object;
/// human mode prints to stderr.
pub fn handle_error(err: anyhow::Error, json: bool) -> ! {
    let kind = err
        .downcast_ref::<AnalyzerError>()
        .map_or("other", AnalyzerError::kind);

    if json {
        println!(
            "{}",
            serde_json::json!({ "error": err.to_string(), "kind": kind })
        );
    } else {
        eprintln!("Error: {err:#}");
    }
    std::process::exit(1);
}
