use anyhow::Result;

use crate::cli::types::RunArgs;
use crate::cli::{context, output};
use crate::domain::models::Config;

/// Handle the summary command
pub async fn execute(args: RunArgs, json: bool, config: &Config) -> Result<()> {
    let analyzer = context::build_analyzer(config)?;

    let identity = super::identity(&args.test_id, &args.run_id)?;
    let summary = analyzer.get_summary(&identity, !args.no_cache).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("{}", output::format_summary(&summary));
    }

    Ok(())
}
