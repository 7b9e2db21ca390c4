//! Domain errors for the runlens analyzer.

use thiserror::Error;

/// Errors surfaced by the analyzer core.
///
/// Cache corruption never appears here: the cache store self-heals and
/// reports a miss instead. Nothing in the core retries automatically;
/// `is_retryable` tells the calling layer which failures are worth another
/// attempt under its own backoff policy.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    #[error("Network error talking to {endpoint}: {message}")]
    Network { endpoint: String, message: String },

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Request timed out after {seconds}s: {operation}")]
    Timeout { operation: String, seconds: u64 },

    #[error("Cache error: {0}")]
    Cache(String),

    #[error("No {namespace} plugin registered under '{name}'")]
    PluginNotFound { namespace: &'static str, name: String },

    #[error("Plugin '{name}' failed: {message}")]
    Plugin { name: String, message: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Operation cancelled before it started")]
    Cancelled,
}

impl AnalyzerError {
    /// Whether the calling layer may meaningfully retry this failure.
    /// Auth failures and validation errors never are.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Network { .. } | Self::Timeout { .. })
    }

    /// Stable machine-readable kind, used in per-item batch reporting.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Network { .. } => "network",
            Self::Auth(_) => "auth",
            Self::Timeout { .. } => "timeout",
            Self::Cache(_) => "cache",
            Self::PluginNotFound { .. } => "plugin_not_found",
            Self::Plugin { .. } => "plugin",
            Self::Validation(_) => "validation",
            Self::Serialization(_) => "serialization",
            Self::Cancelled => "cancelled",
        }
    }
}

pub type AnalyzerResult<T> = Result<T, AnalyzerError>;

impl From<serde_json::Error> for AnalyzerError {
    fn from(err: serde_json::Error) -> Self {
        AnalyzerError::Serialization(err.to_string())
    }
}
