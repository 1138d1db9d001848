//! Hub configuration.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::CoreError;

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default device discovery window, in milliseconds.
pub const DEFAULT_DISCOVERY_TIMEOUT_MS: u64 = 2000;

/// TLS verification policy for the gateway connection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TlsVerification {
    /// Verify against the system trust store.
    System,
    /// Verify against a custom CA bundle.
    CustomCa(PathBuf),
    /// Skip verification. Local gateways commonly run with self-signed
    /// certificates, so this is the default.
    #[default]
    Insecure,
}

/// Connection settings for one gateway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HubConfig {
    /// Gateway base URL, e.g. `https://127.0.0.1:8080`.
    pub url: Url,

    #[serde(default)]
    pub tls: TlsVerification,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Device discovery window in milliseconds.
    #[serde(default = "default_discovery_timeout_ms")]
    pub discovery_timeout_ms: u64,

    /// Whether to run the WebSocket event pump after connecting.
    #[serde(default = "default_true")]
    pub websocket: bool,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT.as_secs()
}

fn default_discovery_timeout_ms() -> u64 {
    DEFAULT_DISCOVERY_TIMEOUT_MS
}

fn default_true() -> bool {
    true
}

impl HubConfig {
    /// Config for a gateway URL with all defaults.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::ValidationFailed`] when the URL does not
    /// parse or uses a scheme other than http/https.
    pub fn new(url: &str) -> Result<Self, CoreError> {
        let url: Url = url.parse().map_err(|e| CoreError::ValidationFailed {
            message: format!("invalid gateway URL {url:?}: {e}"),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(CoreError::ValidationFailed {
                message: format!("unsupported gateway URL scheme {:?}", url.scheme()),
            });
        }
        Ok(Self {
            url,
            tls: TlsVerification::default(),
            timeout_secs: default_timeout_secs(),
            discovery_timeout_ms: default_discovery_timeout_ms(),
            websocket: true,
        })
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
