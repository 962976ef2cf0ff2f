//! Global configuration for remoteapp
//!
//! Located at `~/.config/remoteapp/config.toml`

use crate::{ConfigError, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable overriding `server.api_token`
pub const API_TOKEN_ENV: &str = "REMOTEAPP_API_TOKEN";

/// Global remoteapp configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalConfig {
    pub server: ServerConfig,
    pub view: ViewConfig,
}

/// Application manager location
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Base URL of the user's application manager session,
    /// e.g. `https://hub.example.com/user/alice`
    pub base_url: String,
    /// Timeout applied to every backend request
    pub request_timeout_secs: u64,
    /// Username shown in the header (informational only)
    pub username: Option<String>,
    /// Hub API token sent as `Authorization: token ...`.
    /// `REMOTEAPP_API_TOKEN` overrides it when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_token: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000/user/remoteapp".to_string(),
            request_timeout_secs: 30,
            username: None,
            api_token: None,
        }
    }
}

/// Viewport used to size the application frame when the shell cannot
/// measure one itself
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    pub viewport_width: u32,
    pub viewport_height: u32,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            viewport_width: 1280,
            viewport_height: 800,
        }
    }
}

impl GlobalConfig {
    /// Load global configuration from the default path
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        Self::load_from(&path)
    }

    /// Load global configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("Config file not found at {:?}, using defaults", path);
            let mut config = Self::default();
            config.apply_env();
            return Ok(config);
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let mut config: Self = toml::from_str(&content).map_err(|e| ConfigError::TomlParseError {
            path: path.to_path_buf(),
            source: e,
        })?;
        config.validate()?;
        config.apply_env();

        tracing::debug!(
            "Loaded config from {:?}: base_url={}",
            path,
            config.server.base_url
        );

        Ok(config)
    }

    /// Save configuration to the default path
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        self.save_to(&path)
    }

    /// Save configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::WriteError {
                path: path.to_path_buf(),
                source: e,
            })?;
        }

        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigError::Invalid(e.to_string()))?;

        std::fs::write(path, content).map_err(|e| ConfigError::WriteError {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Get the default config file path
    pub fn config_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("", "", "remoteapp").ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Check the values that cannot be expressed through serde defaults
    pub fn validate(&self) -> Result<()> {
        let url = self.server.base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::Invalid(format!(
                "server.base_url must be an http(s) URL, got '{}'",
                self.server.base_url
            )));
        }
        if self.server.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "server.request_timeout_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Take the API token from the environment when one is exported
    pub fn apply_env(&mut self) {
        if let Ok(token) = std::env::var(API_TOKEN_ENV) {
            if !token.trim().is_empty() {
                self.server.api_token = Some(token);
            }
        }
    }

    /// Override the server location (command line flag)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Result<Self> {
        self.server.base_url = base_url.into();
        self.validate()?;
        Ok(self)
    }
}
