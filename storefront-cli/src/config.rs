//! CLI configuration

use serde::Deserialize;
use std::path::{Path, PathBuf};
use storefront_client::{GatewayConfig, RouteGuard};
use tracing::info;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Routes exempt from the login redirect
    #[serde(default)]
    pub routes: RouteGuard,

    #[serde(default)]
    pub session: SessionConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Where the access token is kept between invocations
    #[serde(default = "default_session_file")]
    pub file: PathBuf,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            file: default_session_file(),
        }
    }
}

fn default_session_file() -> PathBuf {
    PathBuf::from(".storefront-session.json")
}

impl Config {
    /// Read `path` if it exists, otherwise fall back to defaults
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            info!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }
}
