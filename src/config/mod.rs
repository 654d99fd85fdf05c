// ABOUTME: Settings for the admin tool itself: which backend to talk to and how
// Loaded from ~/.homescreen-hero-admin/config.toml, then environment variables, then CLI flags

use anyhow::{Context, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

pub const ENV_SERVER_URL: &str = "HSH_ADMIN_URL";
pub const ENV_TIMEOUT_SECS: &str = "HSH_ADMIN_TIMEOUT_SECS";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Base URL of the Homescreen Hero backend
    #[serde(default = "default_server_url")]
    pub server_url: String,

    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Quiet period before a library search is sent
    #[serde(default = "default_debounce_ms")]
    pub search_debounce_ms: u64,

    /// Login for backends with auth enabled
    #[serde(default)]
    pub username: Option<String>,

    #[serde(default)]
    pub password: Option<String>,

    /// When the setup wizard last saved a configuration (RFC 3339)
    #[serde(default)]
    pub setup_completed_at: Option<String>,
}

fn default_server_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_debounce_ms() -> u64 {
    300
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            request_timeout_secs: default_timeout_secs(),
            search_debounce_ms: default_debounce_ms(),
            username: None,
            password: None,
            setup_completed_at: None,
        }
    }
}

impl AppConfig {
    /// Get the base admin tool directory
    pub fn base_dir() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Could not determine home directory")?;
        Ok(home.join(".homescreen-hero-admin"))
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::base_dir()?.join("config.toml"))
    }

    /// Load from the default location and apply environment overrides
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::config_path()?)?;
        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Load from `path`; a missing file gives the defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write config to {}", path.display()))?;

        Ok(())
    }

    /// Apply `HSH_ADMIN_*` overrides using `lookup` to read variables
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(ENV_SERVER_URL).filter(|u| !u.trim().is_empty()) {
            self.server_url = url.trim().to_string();
        }

        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => self.request_timeout_secs = secs,
                _ => warn!("Ignoring invalid {}={:?}", ENV_TIMEOUT_SECS, raw),
            }
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    /// Credentials to log in with, if both parts are configured
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (self.username.as_deref(), self.password.as_deref()) {
            (Some(user), Some(pass)) if !user.is_empty() => Some((user, pass)),
            _ => None,
        }
    }

    pub fn mark_setup_completed(&mut self) {
        self.setup_completed_at = Some(Utc::now().to_rfc3339());
    }

    pub fn needs_setup(&self) -> bool {
        self.setup_completed_at.is_none()
    }
}
