use std::time::Duration;

use anyhow::Result;
use serde_json::json;

use crate::adapters::{PayloadKind, ResultCache};
use crate::cli::types::CacheCommands;
use crate::cli::{context, output};
use crate::domain::models::Config;

/// Handle cache maintenance commands
///
/// These never touch the appliance; only the on-disk store.
pub async fn execute(command: CacheCommands, json: bool, config: &Config) -> Result<()> {
    let cache = context::open_cache(config)?;

    match command {
        CacheCommands::Stats => {
            let stats = cache.stats();
            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                println!("{}", output::format_cache_stats(&stats));
            }
        }
        CacheCommands::Clear => {
            let removed = cache.clear();
            report_removed(removed, json);
        }
        CacheCommands::Cleanup { max_age_seconds } => {
            let removed = cache.cleanup(max_age_seconds.map(Duration::from_secs));
            report_removed(removed, json);
        }
        CacheCommands::Invalidate { test_id, run_id } => {
            let identity = super::identity(&test_id, &run_id)?;
            cache.invalidate(&ResultCache::key_for(&identity, PayloadKind::Raw));
            cache.invalidate(&ResultCache::key_for(&identity, PayloadKind::Summary));
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&json!({ "invalidated": identity.to_string() }))?
                );
            } else {
                println!("Invalidated cached entries for {identity}");
            }
        }
    }

    Ok(())
}

fn report_removed(removed: usize, json: bool) {
    if json {
        println!("{}", json!({ "removed": removed }));
    } else {
        println!(
            "Removed {removed} entr{}",
            if removed == 1 { "y" } else { "ies" }
        );
    }
}
