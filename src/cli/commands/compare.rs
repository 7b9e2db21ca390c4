use anyhow::Result;

use crate::cli::types::CompareArgs;
use crate::cli::{context, output};
use crate::domain::models::Config;

/// Handle the compare command
pub async fn execute(args: CompareArgs, json: bool, config: &Config) -> Result<()> {
    let analyzer = context::build_analyzer(config)?;

    let baseline = super::identity(&args.baseline_test_id, &args.baseline_run_id)?;
    let candidate = super::identity(&args.candidate_test_id, &args.candidate_run_id)?;
    let comparison = analyzer.compare_runs(&baseline, &candidate).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&comparison)?);
    } else {
        println!("{}", output::format_comparison(&comparison));
    }

    Ok(())
}
