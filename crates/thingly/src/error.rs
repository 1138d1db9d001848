//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` variants into user-facing errors with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use thingly_core::CoreError;

/// Exit codes.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────

    #[error("Could not connect to gateway at {url}")]
    #[diagnostic(
        code(thingly::connection_failed),
        help(
            "Check that the gateway is running and accessible.\n\
             URL: {url}\n\
             Try: thingly devices list --insecure"
        )
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Request timed out after {seconds}s")]
    #[diagnostic(
        code(thingly::timeout),
        help("Increase timeout with --timeout or check gateway responsiveness.")
    )]
    Timeout { seconds: u64 },

    // ── Resources ────────────────────────────────────────────────────

    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(thingly::not_found),
        help("Run: thingly {list_command} to see what's available")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    #[error("Device '{device_id}' has no {resource_type} resource")]
    #[diagnostic(
        code(thingly::missing_resource),
        help("Run: thingly resources list {device_id} to inspect the device.")
    )]
    MissingWellKnownResource {
        device_id: String,
        resource_type: String,
    },

    // ── API ──────────────────────────────────────────────────────────

    #[error("Gateway error ({status}): {message}")]
    #[diagnostic(code(thingly::gateway_error))]
    Gateway { message: String, status: u16 },

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(thingly::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(thingly::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: thingly config init --gateway <URL>"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No gateway configured")]
    #[diagnostic(
        code(thingly::no_config),
        help(
            "Pass --gateway <URL>, or create a profile with: thingly config init --gateway <URL>\n\
             Config expected at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(thingly::config))]
    Config(#[from] thingly_config::ConfigError),

    // ── Interactive ──────────────────────────────────────────────────

    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(thingly::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO / Serialization ────────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON payload: {0}")]
    #[diagnostic(code(thingly::json), help("Check the JSON contents and try again."))]
    Json(#[from] serde_json::Error),

    #[error("{message}")]
    #[diagnostic(code(thingly::internal))]
    Internal { message: String },
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::NotFound { .. } | Self::MissingWellKnownResource { .. } => exit_code::NOT_FOUND,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::Validation { .. } | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => Self::ConnectionFailed {
                url,
                source: reason.into(),
            },

            CoreError::Timeout { timeout_secs } => Self::Timeout {
                seconds: timeout_secs,
            },

            CoreError::DeviceNotFound { identifier } => Self::NotFound {
                resource_type: "device".into(),
                identifier,
                list_command: "devices list".into(),
            },

            CoreError::ResourceNotFound { device_id, href } => Self::NotFound {
                resource_type: "resource".into(),
                identifier: href,
                list_command: format!("resources list {device_id}"),
            },

            CoreError::MissingWellKnownResource {
                device_id,
                resource_type,
            } => Self::MissingWellKnownResource {
                device_id,
                resource_type: resource_type.into(),
            },

            CoreError::ValidationFailed { message } => Self::Validation {
                field: "input".into(),
                reason: message,
            },

            CoreError::Gateway { message, status } => Self::Gateway { message, status },

            CoreError::Tree(e) => Self::Internal {
                message: e.to_string(),
            },

            CoreError::Api(e) => Self::Internal {
                message: e.to_string(),
            },
        }
    }
}
