//! Configuration management for the BLIS bot
//!
//! Stores service credentials, the default app and the template directory
//! in ~/.config/blis/config.toml

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::adapters::ServiceConfig;

const CONFIG_DIR: &str = "blis";
const CONFIG_FILE: &str = "config.toml";

/// Bot Configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_service_url")]
    pub service_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,
    /// App loaded when the session starts
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_id: Option<String>,
    #[serde(default = "default_template_dir")]
    pub template_dir: PathBuf,
    /// Use the in-memory dialog service instead of HTTP
    #[serde(default)]
    pub offline: bool,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_service_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_template_dir() -> PathBuf {
    PathBuf::from("cards")
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service_url: default_service_url(),
            user: None,
            secret: None,
            app_id: None,
            template_dir: default_template_dir(),
            offline: false,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join(CONFIG_DIR);
        Ok(config_dir)
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE))
    }

    /// Load config from the given file (or the default location), or use defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => Self::config_path()?,
        };

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;

        let config: Config =
            toml::from_str(&content).with_context(|| "Failed to parse config file")?;

        Ok(config)
    }

    /// Connection settings for the HTTP dialog service
    pub fn service_config(&self) -> Result<ServiceConfig> {
        let (Some(user), Some(secret)) = (&self.user, &self.secret) else {
            bail!("Dialog service credentials missing. Set BLIS_USER and BLIS_SECRET, or run with --offline.");
        };

        let mut service = ServiceConfig::new(&self.service_url, user, secret);
        service.timeout_secs = self.timeout_secs;
        Ok(service)
    }
}
