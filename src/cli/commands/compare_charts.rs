use anyhow::Result;
use serde_json::json;

use crate::cli::context;
use crate::cli::types::CompareArgs;
use crate::domain::models::Config;

/// Handle the compare-charts command
pub async fn execute(args: CompareArgs, json: bool, config: &Config) -> Result<()> {
    let analyzer = context::build_analyzer(config)?;

    let baseline = super::identity(&args.baseline_test_id, &args.baseline_run_id)?;
    let candidate = super::identity(&args.candidate_test_id, &args.candidate_run_id)?;
    let path = analyzer
        .compare_charts(&baseline, &candidate, &args.output_dir)
        .await?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&json!({
                "baseline": baseline.to_string(),
                "candidate": candidate.to_string(),
                "path": path,
            }))?
        );
    } else {
        println!("Comparison chart written to {}", path.display());
    }

    Ok(())
}
