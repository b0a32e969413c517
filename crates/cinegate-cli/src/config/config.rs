//! `AppConfig` struct and TOML loading.

use std::path::Path;

use anyhow::{Context, Result};
use cinegate_store::client::DEFAULT_GATEWAY_URL;
use serde::Deserialize;
use url::Url;

/// Top-level application configuration.
#[derive(Debug, Deserialize, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// Client-side browsing settings.
    #[serde(default)]
    pub browse: BrowseConfig,
}

/// Settings for `browse` and `search`.
#[derive(Debug, Deserialize, PartialEq, Eq)]
pub struct BrowseConfig {
    /// Gateway root URL.
    #[serde(default = "default_gateway_url")]
    pub gateway_url: String,
}

impl Default for BrowseConfig {
    fn default() -> Self {
        Self {
            gateway_url: default_gateway_url(),
        }
    }
}

fn default_gateway_url() -> String {
    String::from(DEFAULT_GATEWAY_URL)
}

impl BrowseConfig {
    /// Parses `gateway_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not an absolute URL.
    pub fn gateway_url(&self) -> Result<Url> {
        Url::parse(&self.gateway_url)
            .with_context(|| format!("invalid browse.gateway_url: {}", self.gateway_url))
    }
}

impl AppConfig {
    /// Loads config from a TOML file. Returns default if file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
    }
}
