//! Configuration management for debugmate
//!
//! One small TOML file holds the persisted theme flag and the client
//! settings (service URL, anti-forgery token, speech program override).
//!
//! Config file location: ~/.config/debugmate/config.toml
//! (override with the DEBUGMATE_CONFIG environment variable)

use crate::types::Mode;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_ENV: &str = "DEBUGMATE_CONFIG";

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub theme: ThemeMode,

    // Debugging service
    #[serde(default = "default_server_url")]
    pub server_url: String,
    #[serde(default)]
    pub csrf_token: Option<String>,
    #[serde(default)]
    pub default_mode: Mode,
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,

    // Speech program (auto-detected when unset)
    #[serde(default)]
    pub speech_command: Option<String>,
}

fn default_server_url() -> String {
    "http://127.0.0.1:8000".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: ThemeMode::Dark,
            server_url: default_server_url(),
            csrf_token: None,
            default_mode: Mode::Full,
            request_timeout_secs: None,
            speech_command: None,
        }
    }
}

impl Config {
    /// Get the config file path
    pub fn path() -> Result<PathBuf> {
        if let Some(custom) = std::env::var_os(CONFIG_ENV) {
            return Ok(PathBuf::from(custom));
        }
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join("debugmate");
        Ok(config_dir.join("config.toml"))
    }

    /// Load config from the default location, creating it if missing
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            let config = Config::default();
            config.save_to(path)?;
            return Ok(config);
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config from {:?}", path))
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory {:?}", parent))?;
        }

        let content = toml::to_string_pretty(self)
            .context("Failed to serialize config")?;

        fs::write(path, content)
            .with_context(|| format!("Failed to write config to {:?}", path))?;

        // Restrict config file permissions (may contain a CSRF token)
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = fs::metadata(path)?.permissions();
            perms.set_mode(0o600);
            fs::set_permissions(path, perms)?;
        }

        Ok(())
    }

    /// Full URL of the debug endpoint
    pub fn debug_url(&self) -> String {
        format!("{}/debug/", self.server_url.trim_end_matches('/'))
    }

    /// Page that carries the anti-forgery token
    pub fn page_url(&self) -> String {
        format!("{}/", self.server_url.trim_end_matches('/'))
    }

    pub fn has_csrf_token(&self) -> bool {
        self.csrf_token.as_ref().map_or(false, |t| !t.is_empty())
    }
}

/// Persisted light/dark preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    Light,
    #[default]
    Dark,
}

impl ThemeMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
        }
    }

    /// Label of the theme button, reflecting the active theme
    pub fn label(&self) -> &'static str {
        match self {
            ThemeMode::Light => "☀️ Light Mode",
            ThemeMode::Dark => "🌙 Dark Mode",
        }
    }

    pub fn toggle(&self) -> Self {
        match self {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
        }
    }
}
