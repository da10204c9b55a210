//! Client configuration.
//!
//! Layered lookup: built-in defaults, then `~/.pokedeck/config.toml`,
//! then a project-local `.pokedeck/config.toml`. The server URL can
//! also come from `POKEDECK_SERVER_URL` or `--server` (applied by the
//! binary, later wins).

use anyhow::{Context as _, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default game server address.
pub const DEFAULT_SERVER_URL: &str = "http://localhost:8000";

fn default_server_url() -> String {
    DEFAULT_SERVER_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the game server.
    #[serde(default = "default_server_url")]
    pub server_url: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Where session transcripts are written.
    /// Defaults to `~/.pokedeck/sessions`.
    #[serde(default)]
    pub transcripts_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            request_timeout_secs: default_timeout_secs(),
            transcripts_dir: None,
        }
    }
}

impl Config {
    /// Load configuration, project-local file winning over the home one.
    pub fn load() -> Result<Self> {
        let mut cfg = Config::default();
        if let Some(home) = dirs::home_dir() {
            let path = home.join(".pokedeck").join("config.toml");
            if path.exists() {
                cfg = Self::load_from(&path)?;
            }
        }
        let local = PathBuf::from(".pokedeck").join("config.toml");
        if local.exists() {
            cfg = Self::load_from(&local)?;
        }
        Ok(cfg)
    }

    /// Load configuration from a specific file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let cfg = toml::from_str(&content)
            .with_context(|| format!("parsing config {}", path.display()))?;
        Ok(cfg)
    }

    /// Validate the configuration, collecting every problem.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();
        if !self.server_url.starts_with("http://")
            && !self.server_url.starts_with("https://")
        {
            errors.push(format!(
                "server_url must be an http(s) URL, got '{}'",
                self.server_url
            ));
        }
        if self.request_timeout_secs == 0 {
            errors.push("request_timeout_secs must be nonzero".to_string());
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
