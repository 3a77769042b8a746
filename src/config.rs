/// Client configuration loader - parses airmon.toml
///
/// Keeps the API location, cache directory and worker count out of the
/// code. Every field has a default, so an empty or missing file is a valid
/// configuration. Environment variables (a `.env` file is honoured) take
/// precedence over the file:
///
///   AIRMON_API_BASE_URL — API base URL
///   AIRMON_CACHE_DIR    — historical cache directory

use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::history::default_cache_dir;
use crate::ingest::gios::API_BASE_URL;

pub const DEFAULT_CONFIG_PATH: &str = "airmon.toml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Base URL every endpoint path is appended to.
    pub api_base_url: String,

    /// Historical cache directory; platform data dir when unset.
    pub cache_dir: Option<PathBuf>,

    /// Worker threads used to run fetches.
    pub fetch_workers: usize,

    /// `tracing` filter used when RUST_LOG is not set.
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: API_BASE_URL.to_string(),
            cache_dir: None,
            fetch_workers: 4,
            log_filter: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Resolved cache directory.
    pub fn cache_dir(&self) -> PathBuf {
        self.cache_dir.clone().unwrap_or_else(default_cache_dir)
    }

    /// At least one worker, whatever the file says.
    pub fn workers(&self) -> usize {
        self.fetch_workers.max(1)
    }

    /// Applies `AIRMON_*` environment overrides.
    pub fn with_env_overrides(mut self) -> Self {
        dotenv::dotenv().ok();

        if let Ok(url) = env::var("AIRMON_API_BASE_URL") {
            if !url.trim().is_empty() {
                self.api_base_url = url;
            }
        }
        if let Ok(dir) = env::var("AIRMON_CACHE_DIR") {
            if !dir.trim().is_empty() {
                self.cache_dir = Some(PathBuf::from(dir));
            }
        }
        self
    }
}

/// Parses configuration from TOML text.
pub fn parse_config(contents: &str, path: &Path) -> Result<AppConfig, ConfigError> {
    toml::from_str(contents).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Loads configuration from `path`.
///
/// # Errors
/// `ConfigError::Read` when the file cannot be read, `ConfigError::Parse`
/// when it is not valid TOML for [`AppConfig`].
pub fn load_config(path: impl AsRef<Path>) -> Result<AppConfig, ConfigError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|e| ConfigError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;
    parse_config(&contents, path)
}

/// Like [`load_config`], but a missing file yields the defaults.
pub fn load_config_or_default(path: impl AsRef<Path>) -> Result<AppConfig, ConfigError> {
    let path = path.as_ref();
    if !path.exists() {
        tracing::debug!("{} not found, using default configuration", path.display());
        return Ok(AppConfig::default());
    }
    load_config(path)
}
