use anyhow::Result;
use serde_json::json;

use crate::cli::context;
use crate::cli::types::RunArgs;
use crate::domain::models::Config;

/// Handle the status command
pub async fn execute(args: RunArgs, json: bool, config: &Config) -> Result<()> {
    let analyzer = context::build_analyzer(config)?;

    let identity = super::identity(&args.test_id, &args.run_id)?;
    let status = analyzer.run_status(&identity).await?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&json!({
                "test_id": identity.test_id,
                "run_id": identity.run_id,
                "status": status,
            }))?
        );
    } else {
        println!("{identity}: {status}");
    }

    Ok(())
}
