// Gateway HTTP client
//
// Wraps `reqwest::Client` with gateway-specific URL construction and
// error-envelope handling. Endpoint modules (devices, resources) are
// implemented as inherent methods in separate files to keep this module
// focused on transport mechanics.

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

/// JSON error envelope the gateway returns on failures.
#[derive(Debug, serde::Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    message: Option<String>,

    #[serde(default)]
    error: Option<String>,
}

/// Raw HTTP client for the device gateway's REST API.
///
/// Handles URL construction for the `/api/v1/devices` tree and translates
/// non-success responses into [`Error::Gateway`] with the parsed message.
pub struct GatewayClient {
    http: reqwest::Client,
    base_url: Url,
}

impl GatewayClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// `base_url` is the gateway root (e.g. `https://127.0.0.1:8080`).
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self { http, base_url })
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    /// The gateway base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build `{base}/api/v1/devices{suffix}`.
    ///
    /// `suffix` must be empty or start with `/`.
    pub(crate) fn devices_url(&self, suffix: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}/api/v1/devices{suffix}"))?)
    }

    /// The WebSocket event stream URL: `{base}/api/v1/ws/devices` with the
    /// scheme switched to `ws`/`wss`.
    pub fn events_url(&self) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let mut url = Url::parse(&format!("{base}/api/v1/ws/devices"))?;
        let scheme = match url.scheme() {
            "https" | "wss" => "wss",
            _ => "ws",
        };
        // set_scheme only rejects invalid transitions; ws/wss are always valid here
        let _ = url.set_scheme(scheme);
        Ok(url)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a GET request and parse the JSON response.
    pub(crate) async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("GET {}", url);
        let resp = self.http.get(url).send().await.map_err(Error::Transport)?;
        self.parse_response(resp).await
    }

    /// Send a POST request (optional JSON body) and parse the JSON response.
    pub(crate) async fn post<T: DeserializeOwned>(
        &self,
        url: Url,
        body: Option<&impl Serialize>,
    ) -> Result<T, Error> {
        debug!("POST {}", url);
        let mut req = self.http.post(url);
        if let Some(body) = body {
            req = req.json(body);
        }
        let resp = req.send().await.map_err(Error::Transport)?;
        self.parse_response(resp).await
    }

    /// Send a PUT request with a JSON body and parse the JSON response.
    pub(crate) async fn put<T: DeserializeOwned>(
        &self,
        url: Url,
        body: &impl Serialize,
    ) -> Result<T, Error> {
        debug!("PUT {}", url);
        let resp = self
            .http
            .put(url)
            .json(body)
            .send()
            .await
            .map_err(Error::Transport)?;
        self.parse_response(resp).await
    }

    /// Send a DELETE request and parse the JSON response.
    pub(crate) async fn delete<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("DELETE {}", url);
        let resp = self
            .http
            .delete(url)
            .send()
            .await
            .map_err(Error::Transport)?;
        self.parse_response(resp).await
    }

    /// Parse a response body as JSON, or surface the gateway error envelope.
    ///
    /// Empty success bodies deserialize as JSON `null`, so callers that
    /// expect no payload should ask for `serde_json::Value`.
    async fn parse_response<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, Error> {
        let status = resp.status();
        let body = resp.text().await.map_err(Error::Transport)?;

        if !status.is_success() {
            return Err(Error::Gateway {
                message: parse_error_message(&body),
                status: status.as_u16(),
            });
        }

        let text = if body.trim().is_empty() { "null" } else { &body };
        serde_json::from_str(text).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body,
        })
    }
}

/// Extract a human-readable message from the gateway's error envelope,
/// falling back to the raw body.
fn parse_error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(env) => env
            .message
            .or(env.error)
            .unwrap_or_else(|| body.to_owned()),
        Err(_) => body.to_owned(),
    }
}
