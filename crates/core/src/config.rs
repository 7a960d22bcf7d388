//! Config file parsing for `~/.config/booklistings/config.toml`.
//!
//! Every field has a default, so a missing or partial file is fine. Use
//! `AppConfig::with_env_overrides` to apply `BOOKLISTINGS_SEARCH_URL`.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::query::MAX_RESULTS;

pub const DEFAULT_SEARCH_URL: &str = "https://www.googleapis.com/books/v1/volumes";

/// Term searched when an interactive session opens.
pub const DEFAULT_INITIAL_TERM: &str = "android";

/// Environment variable overriding `search.base_url`.
pub const SEARCH_URL_ENV: &str = "BOOKLISTINGS_SEARCH_URL";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub thumbnails: ThumbnailConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_search_url")]
    pub base_url: String,
    #[serde(default = "default_max_results")]
    pub max_results: u32,
    #[serde(default = "default_search_timeout")]
    pub timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Searched on startup of `browse`; empty to start with a blank list.
    #[serde(default = "default_initial_term")]
    pub initial_term: String,
}

fn default_search_url() -> String {
    DEFAULT_SEARCH_URL.to_string()
}
fn default_max_results() -> u32 {
    MAX_RESULTS
}
fn default_search_timeout() -> u64 {
    15
}
fn default_user_agent() -> String {
    concat!("booklistings/", env!("CARGO_PKG_VERSION")).to_string()
}
fn default_initial_term() -> String {
    DEFAULT_INITIAL_TERM.to_string()
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            base_url: default_search_url(),
            max_results: default_max_results(),
            timeout_secs: default_search_timeout(),
            user_agent: default_user_agent(),
            initial_term: default_initial_term(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThumbnailConfig {
    #[serde(default = "default_thumbnail_timeout")]
    pub timeout_secs: u64,
    /// Covers larger than this (either side, in pixels) are downscaled.
    #[serde(default = "default_max_dimension")]
    pub max_dimension: u32,
}

fn default_thumbnail_timeout() -> u64 {
    10
}
fn default_max_dimension() -> u32 {
    128
}

impl Default for ThumbnailConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_thumbnail_timeout(),
            max_dimension: default_max_dimension(),
        }
    }
}

impl AppConfig {
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var(SEARCH_URL_ENV) {
            if !url.trim().is_empty() {
                self.search.base_url = url;
            }
        }
        self
    }
}

/// Load config from the default path, falling back to defaults when the file
/// is missing or unreadable.
pub fn load_config() -> AppConfig {
    let Some(path) = config_path() else {
        return AppConfig::default();
    };

    let content = match std::fs::read_to_string(&path) {
        Ok(c) => c,
        Err(_) => return AppConfig::default(),
    };

    match AppConfig::from_toml(&content) {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::warn!(path = %path.display(), "ignoring unreadable config: {e}");
            AppConfig::default()
        }
    }
}

/// Return the default config file path (for init and show).
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|mut p| {
        p.push("booklistings");
        p.push("config.toml");
        p
    })
}

/// Write the default config to `path`, creating parent directories.
pub fn write_default_config(path: &std::path::Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, AppConfig::default().to_toml()?)?;
    Ok(())
}
