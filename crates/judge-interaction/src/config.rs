//! Configuration file management for the evaluator endpoint.
//!
//! Supports reading settings from `~/.config/html-judge/config.toml`, with
//! environment variables as a fallback for headless deployments.

use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default transport timeout when the configuration does not set one.
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Environment variable naming the evaluation endpoint URL.
const ENDPOINT_ENV: &str = "JUDGE_EVALUATOR_URL";
/// Environment variable overriding the transport timeout, in seconds.
const TIMEOUT_ENV: &str = "JUDGE_EVALUATOR_TIMEOUT_SECS";

/// Root configuration structure for config.toml
#[derive(Debug, Clone, Deserialize)]
struct ConfigRoot {
    evaluator: EvaluatorConfig,
}

/// Evaluation endpoint configuration
#[derive(Debug, Clone, Deserialize)]
pub struct EvaluatorConfig {
    /// Full URL of the evaluation endpoint.
    pub endpoint_url: String,
    /// Transport timeout in seconds. The controller imposes no timeout of
    /// its own; this is the only bound on a hung call.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl EvaluatorConfig {
    /// Creates a configuration for the given endpoint with the default
    /// timeout.
    pub fn new(endpoint_url: impl Into<String>) -> Self {
        Self {
            endpoint_url: endpoint_url.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// The configured timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Loads configuration with the standard priority:
    ///
    /// 1. `~/.config/html-judge/config.toml`
    /// 2. Environment variables (`JUDGE_EVALUATOR_URL`,
    ///    `JUDGE_EVALUATOR_TIMEOUT_SECS`)
    pub fn load() -> Result<Self> {
        let config_path = get_config_path()?;
        if config_path.exists() {
            return Self::load_from_path(&config_path);
        }

        let endpoint_url = env::var(ENDPOINT_ENV).map_err(|_| {
            anyhow!(
                "No configuration found: {} does not exist and {} is not set",
                config_path.display(),
                ENDPOINT_ENV
            )
        })?;

        let timeout_secs = match env::var(TIMEOUT_ENV) {
            Ok(raw) => raw
                .parse::<u64>()
                .with_context(|| format!("{} must be an integer number of seconds", TIMEOUT_ENV))?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            endpoint_url,
            timeout_secs,
        })
    }

    /// Loads configuration from a specific TOML file.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file at {}", path.display()))?;

        let root: ConfigRoot = toml::from_str(&content)
            .with_context(|| format!("Failed to parse configuration file at {}", path.display()))?;

        Ok(root.evaluator)
    }
}

/// Returns the path to the configuration file:
/// ~/.config/html-judge/config.toml
fn get_config_path() -> Result<PathBuf> {
    let home = dirs::home_dir().ok_or_else(|| anyhow!("Could not determine home directory"))?;
    Ok(home.join(".config").join("html-judge").join("config.toml"))
}
