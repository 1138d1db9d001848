use thiserror::Error;

/// Command-level error codes the gateway embeds in error messages.
///
/// The gateway fronts a command bus whose failures surface as text inside
/// the HTTP error envelope rather than as distinct status codes. Consumers
/// route on these to decide between "applied later", "expired", and
/// "rejected" outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayCode {
    /// The write was accepted but the device is offline; it will be applied
    /// once the device reconnects.
    DeadlineExceeded,
    /// The command's time-to-live elapsed before the device confirmed it.
    CommandExpired,
    /// The request payload failed validation on the gateway or device.
    InvalidArgument,
}

impl GatewayCode {
    /// Scan an error message for a known command code.
    pub fn from_message(message: &str) -> Option<Self> {
        if message.contains("DeadlineExceeded") {
            Some(Self::DeadlineExceeded)
        } else if message.contains("CommandExpired") {
            Some(Self::CommandExpired)
        } else if message.contains("InvalidArgument") {
            Some(Self::InvalidArgument)
        } else {
            None
        }
    }
}

/// Top-level error type for the `thingly-api` crate.
///
/// Covers every failure mode across the REST and WebSocket surfaces.
/// `thingly-core` maps these into user-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Request timed out.
    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// TLS configuration or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Gateway ─────────────────────────────────────────────────────
    /// Structured error parsed from the gateway's JSON error envelope.
    #[error("Gateway error (HTTP {status}): {message}")]
    Gateway { message: String, status: u16 },

    // ── WebSocket ───────────────────────────────────────────────────
    /// WebSocket connection failed.
    #[error("WebSocket connection failed: {0}")]
    WebSocketConnect(String),

    /// WebSocket closed unexpectedly.
    #[error("WebSocket closed (code {code}): {reason}")]
    WebSocketClosed { code: u16, reason: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if this is a transient error worth retrying.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Timeout { .. } | Self::WebSocketConnect(_) => true,
            _ => false,
        }
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            Self::Gateway { status: 404, .. } => true,
            _ => false,
        }
    }

    /// Extract the command-level code embedded in a gateway error message.
    pub fn gateway_code(&self) -> Option<GatewayCode> {
        match self {
            Self::Gateway { message, .. } => GatewayCode::from_message(message),
            _ => None,
        }
    }
}
