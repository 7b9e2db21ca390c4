//! Result source port - interface to the remote test appliance.

use std::time::Duration;

use async_trait::async_trait;

use crate::domain::errors::AnalyzerResult;
use crate::domain::models::{RawResult, RunIdentity};

/// Trait for remote result sources.
///
/// The appliance is treated as unreliable, latent and rate-limited. An
/// implementation maps transport failures onto `Network`/`Auth`/`Timeout`
/// errors and never retries internally; retry policy belongs to the caller.
#[async_trait]
pub trait ResultSource: Send + Sync {
    /// Human-readable source name, used in logs.
    fn name(&self) -> &str;

    /// Fetch the raw result document for one run, within `timeout`.
    async fn fetch_raw_result(
        &self,
        identity: &RunIdentity,
        timeout: Duration,
    ) -> AnalyzerResult<RawResult>;

    /// Fetch the current status string of one run (e.g. `running`,
    /// `completed`).
    async fn fetch_run_status(&self, identity: &RunIdentity) -> AnalyzerResult<String>;
}
