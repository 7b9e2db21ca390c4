use anyhow::Result;

use crate::cli::context;
use crate::cli::types::RunArgs;
use crate::domain::models::Config;

/// Handle the raw command
///
/// Always prints JSON; the payload has no meaningful human rendering.
pub async fn execute(args: RunArgs, _json: bool, config: &Config) -> Result<()> {
    let analyzer = context::build_analyzer(config)?;

    let identity = super::identity(&args.test_id, &args.run_id)?;
    let raw = analyzer.get_raw_result(&identity, !args.no_cache).await?;

    println!("{}", serde_json::to_string_pretty(raw.as_value())?);
    Ok(())
}
