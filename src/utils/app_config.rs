/// Application configuration management
/// Stores user preferences in <config dir>/dada-dash/config.toml

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::constants::{
    APP_NAME, CONFIG_FILE_NAME, DEFAULT_ENDPOINT, DEFAULT_PROTOCOLS,
    DEFAULT_REQUEST_TIMEOUT_SECS, ENDPOINT_ENV, LOG_FILE_NAME,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Base URL of the TVL API, without the `/tvl/...` path
    pub endpoint: String,
    /// Display names, one chart panel each
    pub protocols: Vec<String>,
    pub request_timeout_secs: u64,
    /// Where TUI mode writes its log; defaults next to the config file
    pub log_file: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            protocols: DEFAULT_PROTOCOLS.iter().map(|p| p.to_string()).collect(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            log_file: None,
        }
    }
}

impl AppConfig {
    /// Directory holding config and log files
    pub fn config_dir() -> Result<PathBuf> {
        let base = dirs::config_dir().context("Could not determine user config directory")?;
        Ok(base.join(APP_NAME))
    }

    /// Get config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE_NAME))
    }

    /// Load configuration from the default location, then apply environment overrides
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::config_path()?)?;
        config.apply_env();
        Ok(config)
    }

    /// Load configuration from file; a missing file yields defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let config: Self = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        Ok(config)
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(path, contents)
            .with_context(|| format!("Failed to write config file {}", path.display()))?;

        Ok(())
    }

    /// Apply `DADA_ENDPOINT` if set
    pub fn apply_env(&mut self) {
        self.override_endpoint(std::env::var(ENDPOINT_ENV).ok());
    }

    /// Replace the endpoint with a non-blank override
    pub fn override_endpoint(&mut self, endpoint: Option<String>) {
        if let Some(endpoint) = endpoint {
            let endpoint = endpoint.trim();
            if !endpoint.is_empty() {
                self.endpoint = endpoint.to_string();
            }
        }
    }

    /// Replace the protocol list when any were given
    pub fn override_protocols(&mut self, protocols: Vec<String>) {
        if !protocols.is_empty() {
            self.protocols = protocols;
        }
    }

    /// Never zero; reqwest would fail every request immediately
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    pub fn log_path(&self) -> Result<PathBuf> {
        match &self.log_file {
            Some(path) => Ok(PathBuf::from(path)),
            None => Ok(Self::config_dir()?.join(LOG_FILE_NAME)),
        }
    }
}
