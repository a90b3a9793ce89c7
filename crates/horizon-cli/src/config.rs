//! Configuration file handling for the horizon CLI

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use horizon_client::RetryPolicy;
use serde::{Deserialize, Serialize};

pub const DEFAULT_SERVER: &str = "http://localhost:8000";

/// `[executor]` table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutorConfig {
    pub max_retries: Option<u32>,
    pub attempt_timeout_secs: Option<u64>,
    pub backoff_unit_ms: Option<u64>,
}

impl ExecutorConfig {
    /// Retry policy with unset fields left at their defaults
    pub fn policy(&self) -> RetryPolicy {
        let defaults = RetryPolicy::default();
        RetryPolicy {
            max_retries: self.max_retries.unwrap_or(defaults.max_retries),
            attempt_timeout: self
                .attempt_timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.attempt_timeout),
            backoff_unit: self
                .backoff_unit_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.backoff_unit),
        }
    }
}

/// Configuration for the CLI tool
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Default server URL
    pub server: Option<String>,
    /// Default output format
    pub output: Option<String>,
    /// Disable colored output
    pub no_color: Option<bool>,
    /// Directory holding per-scope session files
    pub session_dir: Option<PathBuf>,
    #[serde(default)]
    pub executor: ExecutorConfig,
}

impl Config {
    /// Load configuration from the default config file
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Get the default config file path
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join("horizon-cli");

        Ok(config_dir.join("config.toml"))
    }

    /// Merge CLI arguments over config file values
    pub fn merge_with_args(
        &self,
        server: Option<&str>,
        output: Option<&str>,
        no_color: bool,
    ) -> MergedConfig {
        MergedConfig {
            server: server
                .map(String::from)
                .or_else(|| self.server.clone())
                .unwrap_or_else(|| DEFAULT_SERVER.to_string()),
            output: output
                .map(String::from)
                .or_else(|| self.output.clone())
                .unwrap_or_else(|| "table".to_string()),
            no_color: no_color || self.no_color.unwrap_or(false),
            session_dir: self
                .session_dir
                .clone()
                .unwrap_or_else(default_session_dir),
            policy: self.executor.policy(),
        }
    }
}

/// Fully resolved configuration after merging CLI args
#[derive(Debug, Clone)]
pub struct MergedConfig {
    pub server: String,
    pub output: String,
    pub no_color: bool,
    pub session_dir: PathBuf,
    pub policy: RetryPolicy,
}

fn default_session_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("horizon-cli")
        .join("sessions")
}
