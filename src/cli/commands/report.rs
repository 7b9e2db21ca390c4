use anyhow::Result;
use serde_json::json;

use crate::cli::context;
use crate::cli::types::ReportArgs;
use crate::domain::models::Config;

/// Handle the report command
pub async fn execute(args: ReportArgs, json: bool, config: &Config) -> Result<()> {
    let analyzer = context::build_analyzer(config)?;

    let identity = super::identity(&args.test_id, &args.run_id)?;
    let format = super::report_format(&args.format)?;
    let path = analyzer
        .generate_report(&identity, &args.report_type, format, &args.output_dir)
        .await?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&json!({
                "test_id": identity.test_id,
                "run_id": identity.run_id,
                "report_type": args.report_type,
                "path": path,
            }))?
        );
    } else {
        println!("Report written to {}", path.display());
    }

    Ok(())
}
