//! Configuration loading for serper-scraper-mcp
//!
//! Configuration is loaded from:
//! 1. Environment variable SERPER_SCRAPER_CONFIG_PATH
//! 2. ~/.binks/serper-scraper.toml
//! 3. Default values
//!
//! `SERPER_API_KEY` overrides whatever key the file holds.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const API_KEY_ENV: &str = "SERPER_API_KEY";
pub const CONFIG_PATH_ENV: &str = "SERPER_SCRAPER_CONFIG_PATH";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub serper: SerperConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
}

/// Serper search API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerperConfig {
    /// API key; search is unavailable without it
    #[serde(default)]
    pub api_key: Option<String>,
    /// Search endpoint
    #[serde(default = "default_serper_url")]
    pub url: String,
}

/// Page fetching settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Per-request deadline, including redirects and body download
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,
    /// Largest body accepted, in bytes
    #[serde(default = "default_max_response_size")]
    pub max_response_size: usize,
    /// Simultaneous fetches per batch (0 = unbounded)
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
}

fn default_serper_url() -> String {
    "https://google.serper.dev/search".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_user_agent() -> String {
    concat!("serper-scraper-mcp/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_max_redirects() -> usize {
    20
}

fn default_max_response_size() -> usize {
    10 * 1024 * 1024 // 10MB
}

fn default_max_concurrency() -> usize {
    10
}

impl Default for SerperConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            url: default_serper_url(),
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout(),
            user_agent: default_user_agent(),
            max_redirects: default_max_redirects(),
            max_response_size: default_max_response_size(),
            max_concurrency: default_max_concurrency(),
        }
    }
}

impl Config {
    /// Load configuration from file or use defaults, then apply env overrides
    pub fn load() -> Result<Self> {
        let mut config = match Self::find_config_path() {
            Some(path) if path.exists() => Self::from_file(&path)?,
            Some(path) => {
                tracing::info!("Config file {} not found, using defaults", path.display());
                Self::default()
            }
            None => {
                tracing::info!("No config path available, using defaults");
                Self::default()
            }
        };

        if let Ok(key) = std::env::var(API_KEY_ENV) {
            config.serper.api_key = Some(key);
        }
        config.normalize();
        if !config.has_api_key() {
            tracing::info!("{} not set, search will be unavailable", API_KEY_ENV);
        }

        Ok(config)
    }

    /// Parse a TOML config file
    pub fn from_file(path: &Path) -> Result<Self> {
        tracing::info!("Loading config from: {}", path.display());
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let mut config: Config =
            toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))?;
        config.normalize();
        Ok(config)
    }

    /// Whether a usable API key is present
    pub fn has_api_key(&self) -> bool {
        self.serper.api_key.is_some()
    }

    // Blank keys are treated as absent.
    fn normalize(&mut self) {
        if let Some(key) = &self.serper.api_key {
            let trimmed = key.trim();
            self.serper.api_key = (!trimmed.is_empty()).then(|| trimmed.to_string());
        }
    }

    fn find_config_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            return Some(PathBuf::from(path));
        }

        dirs::home_dir().map(|home| home.join(".binks").join("serper-scraper.toml"))
    }
}
