use anyhow::{Result, anyhow};
use serde_json::json;
use tokio_util::sync::CancellationToken;

use crate::cli::types::BatchArgs;
use crate::cli::{context, output};
use crate::domain::models::{Config, RunIdentity};

/// Handle the batch command
///
/// Ctrl-C cancels gracefully: in-flight runs finish, queued runs are
/// reported as cancelled.
pub async fn execute(args: BatchArgs, json: bool, config: &Config) -> Result<()> {
    let analyzer = context::build_analyzer(config)?;

    let identities = args
        .runs
        .iter()
        .map(|spec| parse_run(spec))
        .collect::<Result<Vec<_>>>()?;

    if args.status_only {
        let statuses = analyzer.batch_status(&identities).await;
        if json {
            let entries: Vec<_> = statuses
                .iter()
                .map(|(identity, status)| {
                    json!({
                        "test_id": identity.test_id,
                        "run_id": identity.run_id,
                        "status": status,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&entries)?);
        } else {
            for (identity, status) in &statuses {
                println!("{identity}: {status}");
            }
        }
        return Ok(());
    }

    let format = super::report_format(&args.format)?;

    let cancel = CancellationToken::new();
    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            signal_cancel.cancel();
        }
    });

    let items = analyzer
        .batch_process(
            identities,
            &args.report_type,
            format,
            &args.output_dir,
            cancel,
        )
        .await?;

    if json {
        let entries: Vec<_> = items
            .iter()
            .map(|item| match &item.outcome {
                Ok(out) => json!({
                    "test_id": item.identity.test_id,
                    "run_id": item.identity.run_id,
                    "ok": true,
                    "report_path": out.report_path,
                    "summary": out.summary,
                }),
                Err(e) => json!({
                    "test_id": item.identity.test_id,
                    "run_id": item.identity.run_id,
                    "ok": false,
                    "error": e.to_string(),
                    "kind": e.kind(),
                }),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else {
        println!("{}", output::format_batch(&items));
    }

    Ok(())
}

fn parse_run(spec: &str) -> Result<RunIdentity> {
    let (test_id, run_id) = spec
        .split_once(':')
        .ok_or_else(|| anyhow!("Invalid run spec '{spec}'. Expected TEST_ID:RUN_ID"))?;
    super::identity(test_id, run_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_run_spec() {
        let identity = parse_run("t100:r7").unwrap();
        assert_eq!(identity.test_id, "t100");
        assert_eq!(identity.run_id, "r7");
    }

    #[test]
    fn test_parse_run_spec_rejects_missing_separator() {
        assert!(parse_run("t100-r7").is_err());
    }

    #[test]
    fn test_parse_run_spec_rejects_empty_side() {
        assert!(parse_run(":r7").is_err());
        assert!(parse_run("t100:").is_err());
    }
}
