//! Application configuration model.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub appliance: ApplianceConfig,
    pub cache: CacheConfig,
    pub batch: BatchConfig,
    pub logging: LoggingConfig,
}

/// Connection settings for the test appliance.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplianceConfig {
    pub host: String,
    pub username: String,
    pub password: String,
    pub verify_ssl: bool,
    /// Per-request timeout applied to every remote fetch.
    pub timeout_seconds: u64,
}

impl Default for ApplianceConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            username: "admin".to_string(),
            password: String::new(),
            verify_ssl: false,
            timeout_seconds: 60,
        }
    }
}

/// Result cache settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub enabled: bool,
    /// Directory holding one file per entry. Empty means `~/.runlens/cache`.
    pub dir: PathBuf,
    pub ttl_seconds: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            dir: PathBuf::new(),
            ttl_seconds: 3600,
        }
    }
}

impl CacheConfig {
    /// Resolve the cache directory, falling back to the per-user default.
    pub fn resolved_dir(&self) -> PathBuf {
        if self.dir.as_os_str().is_empty() {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".runlens")
                .join("cache")
        } else {
            self.dir.clone()
        }
    }
}

/// Batch-processing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Maximum concurrent in-flight items; bounds simultaneous appliance
    /// calls.
    pub max_in_flight: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self { max_in_flight: 4 }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
