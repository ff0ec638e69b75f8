//! Gateway configuration

use serde::{Deserialize, Serialize};

/// Default refresh endpoint of the storefront backend
pub const DEFAULT_REFRESH_PATH: &str = "/api/v1/auth/refresh";

/// Transport settings for the gateway
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Base URL every request path is resolved against
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Keep and send cookies, which carry the refresh credential
    #[serde(default = "default_true")]
    pub with_credentials: bool,

    /// Request timeout in seconds (default: 30); 0 disables it
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Endpoint that mints a new access token from the refresh cookie
    #[serde(default = "default_refresh_path")]
    pub refresh_path: String,

    /// Share one refresh call between concurrent 401s
    ///
    /// When disabled, every failing request runs its own refresh.
    #[serde(default = "default_true")]
    pub coalesce_refresh: bool,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            with_credentials: true,
            timeout_secs: default_timeout_secs(),
            refresh_path: default_refresh_path(),
            coalesce_refresh: true,
        }
    }
}

impl GatewayConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_refresh_path() -> String {
    DEFAULT_REFRESH_PATH.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_true() -> bool {
    true
}
