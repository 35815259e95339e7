//! Configuration loading and management
//!
//! Configuration is loaded from `~/.config/kekahours/config.toml`
//!
//! This module follows the XDG Base Directory Specification:
//! - Config: `$XDG_CONFIG_HOME/kekahours/` (~/.config/kekahours/)
//! - Data: `$XDG_DATA_HOME/kekahours/` (~/.local/share/kekahours/)
//! - State/Logs: `$XDG_STATE_HOME/kekahours/` (~/.local/state/kekahours/)

use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::PathBuf;

/// Returns a best-effort home directory path.
fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Returns XDG_CONFIG_HOME or ~/.config
fn xdg_config_home() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"))
}

/// Returns XDG_DATA_HOME or ~/.local/share
fn xdg_data_home() -> PathBuf {
    std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/share"))
}

/// Returns XDG_STATE_HOME or ~/.local/state
fn xdg_state_home() -> PathBuf {
    std::env::var("XDG_STATE_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/state"))
}

/// Main configuration struct
#[derive(Debug, Deserialize, Default, Clone)]
pub struct Config {
    /// Attendance API configuration
    #[serde(default)]
    pub api: ApiConfig,

    /// Access token configuration
    #[serde(default)]
    pub auth: AuthConfig,

    /// Widget behavior configuration
    #[serde(default)]
    pub widget: WidgetConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Attendance API configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    /// Base URL of the Keka tenant
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// HTTP request timeout in seconds
    #[serde(default = "default_api_timeout")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_api_timeout(),
        }
    }
}

fn default_base_url() -> String {
    "https://techahead.keka.com".to_string()
}

fn default_api_timeout() -> u64 {
    15
}

/// Access token configuration
///
/// The token is resolved from the `KEKA_ACCESS_TOKEN` environment variable
/// first, then from `token_file` (default `~/.config/kekahours/access_token`).
#[derive(Debug, Deserialize, Default, Clone)]
pub struct AuthConfig {
    /// Override path for the access token file
    pub token_file: Option<PathBuf>,
}

/// Widget behavior configuration
#[derive(Debug, Deserialize, Clone)]
pub struct WidgetConfig {
    /// Seconds between automatic refreshes while the dashboard is visible
    #[serde(default = "default_refresh_secs")]
    pub refresh_secs: u64,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            refresh_secs: default_refresh_secs(),
        }
    }
}

fn default_refresh_secs() -> u64 {
    20
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            return Ok(Config::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read config file {:?}: {}", path, e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;

        Ok(config)
    }

    /// Returns the default config file path
    ///
    /// `$XDG_CONFIG_HOME/kekahours/config.toml` (~/.config/kekahours/config.toml)
    pub fn config_path() -> PathBuf {
        xdg_config_home().join("kekahours").join("config.toml")
    }

    /// Returns the data directory path (for the snapshot database)
    ///
    /// `$XDG_DATA_HOME/kekahours/` (~/.local/share/kekahours/)
    pub fn data_dir() -> PathBuf {
        xdg_data_home().join("kekahours")
    }

    /// Returns the state directory path (for logs)
    ///
    /// `$XDG_STATE_HOME/kekahours/` (~/.local/state/kekahours/)
    pub fn state_dir() -> PathBuf {
        xdg_state_home().join("kekahours")
    }

    /// Returns the snapshot database file path
    ///
    /// `$XDG_DATA_HOME/kekahours/snapshots.db` (~/.local/share/kekahours/snapshots.db)
    pub fn snapshot_db_path() -> PathBuf {
        Self::data_dir().join("snapshots.db")
    }

    /// Returns the default access token file path
    ///
    /// `$XDG_CONFIG_HOME/kekahours/access_token` (~/.config/kekahours/access_token)
    pub fn token_path() -> PathBuf {
        xdg_config_home().join("kekahours").join("access_token")
    }

    /// Returns the log file path
    ///
    /// `$XDG_STATE_HOME/kekahours/kekahours.log` (~/.local/state/kekahours/kekahours.log)
    pub fn log_path() -> PathBuf {
        Self::state_dir().join("kekahours.log")
    }

    /// Ensure XDG base directory environment variables are set.
    ///
    /// This is mainly for CLI binaries that want explicit, stable path behavior
    /// before invoking other components that read these env vars.
    pub fn ensure_xdg_env() {
        let home = home_dir();

        if std::env::var("XDG_DATA_HOME").is_err() {
            std::env::set_var("XDG_DATA_HOME", home.join(".local/share"));
        }

        if std::env::var("XDG_STATE_HOME").is_err() {
            std::env::set_var("XDG_STATE_HOME", home.join(".local/state"));
        }

        if std::env::var("XDG_CONFIG_HOME").is_err() {
            std::env::set_var("XDG_CONFIG_HOME", home.join(".config"));
        }
    }
}
