use anyhow::Result;
use serde_json::json;

use crate::cli::context;
use crate::cli::types::ChartsArgs;
use crate::domain::models::Config;

/// Handle the charts command
pub async fn execute(args: ChartsArgs, json: bool, config: &Config) -> Result<()> {
    let analyzer = context::build_analyzer(config)?;

    let identity = super::identity(&args.test_id, &args.run_id)?;
    let outcomes = analyzer.generate_charts(&identity, &args.output_dir).await?;

    if json {
        let entries: Vec<_> = outcomes
            .iter()
            .map(|o| match &o.outcome {
                Ok(path) => json!({ "chart": o.chart, "ok": true, "path": path }),
                Err(e) => json!({ "chart": o.chart, "ok": false, "error": e.to_string() }),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if outcomes.is_empty() {
        println!("No applicable charts for {identity}.");
        return Ok(());
    }
    for outcome in &outcomes {
        match &outcome.outcome {
            Ok(path) => println!("{}: {}", outcome.chart, path.display()),
            Err(e) => println!("{}: failed ({e})", outcome.chart),
        }
    }

    Ok(())
}
