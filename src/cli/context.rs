//! Shared construction of the analyzer stack for CLI commands.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::adapters::{ApplianceClient, ResultCache};
use crate::domain::models::Config;
use crate::plugins::PluginRegistry;
use crate::services::{AnalyzerOptions, ResultAnalyzer};

/// Open the cache store alone, for maintenance commands that never dial
/// out to the appliance.
pub fn open_cache(config: &Config) -> Result<ResultCache> {
    let cache = ResultCache::open(
        config.cache.resolved_dir(),
        Duration::from_secs(config.cache.ttl_seconds),
    )
    .context("Failed to open result cache")?;
    Ok(cache)
}

/// Build the full analyzer: appliance client, cache store and builtin
/// plugin registry wired together per the loaded config.
pub fn build_analyzer(config: &Config) -> Result<ResultAnalyzer> {
    let source =
        ApplianceClient::new(&config.appliance).context("Failed to build appliance client")?;
    let cache = open_cache(config)?;
    let registry = PluginRegistry::with_builtins();

    let options = AnalyzerOptions {
        fetch_timeout: Duration::from_secs(config.appliance.timeout_seconds),
        max_in_flight: config.batch.max_in_flight,
        cache_enabled: config.cache.enabled,
    };

    Ok(ResultAnalyzer::new(
        Arc::new(source),
        Arc::new(cache),
        Arc::new(registry),
        options,
    ))
}
