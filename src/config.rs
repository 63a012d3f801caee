use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

use crate::backends::ApiError;
use crate::constants::{ACCESS_TOKEN_ENV, DEFAULT_BASE_URL, DEFAULT_PAGE_LIMIT};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub browser: BrowserConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default)]
    pub access_token: String,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_page_limit")]
    pub page_limit: u32,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
    #[serde(default = "default_max_pages")]
    pub max_pages: usize,

    #[serde(default = "default_true")]
    pub expand_albums: bool,
}

impl Config {
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::config_path()?)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load the file at `path`, writing defaults there if it does not exist yet
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            debug!("Loading config from {:?}", path);
            let contents = fs::read_to_string(path).context("Failed to read config file")?;
            let config: Config =
                toml::from_str(&contents).context("Failed to parse config file")?;
            info!("Config loaded successfully");
            Ok(config)
        } else {
            info!("No config file found, using defaults");
            let config = Config::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, contents).context("Failed to write config file")?;

        debug!("Config saved to {:?}", path);
        Ok(())
    }

    pub fn apply_env_overrides(&mut self) {
        if let Ok(token) = std::env::var(ACCESS_TOKEN_ENV) {
            if !token.trim().is_empty() {
                debug!("Using access token from {}", ACCESS_TOKEN_ENV);
                self.api.access_token = token;
            }
        }
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("Failed to get config directory")?;
        Ok(config_dir.join("glance").join("config.toml"))
    }
}

impl ApiConfig {
    pub fn with_token(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            ..Self::default()
        }
    }

    /// Reject settings that would make every request fail
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.access_token.trim().is_empty() {
            return Err(ApiError::Configuration(format!(
                "access token not set; add it to the [api] section of the config file or export {}",
                ACCESS_TOKEN_ENV
            )));
        }
        Url::parse(&self.base_url).map_err(|e| {
            ApiError::Configuration(format!("invalid base_url '{}': {}", self.base_url, e))
        })?;
        if self.page_limit == 0 {
            return Err(ApiError::Configuration(
                "page_limit must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            access_token: String::new(),
            base_url: default_base_url(),
            page_limit: default_page_limit(),
            timeout_secs: default_timeout(),
        }
    }
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            max_pages: default_max_pages(),
            expand_albums: default_true(),
        }
    }
}

// Default value functions
fn default_base_url() -> String { DEFAULT_BASE_URL.to_string() }
fn default_page_limit() -> u32 { DEFAULT_PAGE_LIMIT }
fn default_timeout() -> u64 { 30 }
fn default_max_pages() -> usize { 5 }
fn default_true() -> bool { true }
