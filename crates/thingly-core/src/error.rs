//! Core error types.

use thiserror::Error;

use crate::tree::TreeError;

/// Errors surfaced by the hub and data layer.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("failed to connect to gateway at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("device not found: {identifier}")]
    DeviceNotFound { identifier: String },

    #[error("resource {href} not found on device {device_id}")]
    ResourceNotFound { device_id: String, href: String },

    #[error("device {device_id} has no {resource_type} resource")]
    MissingWellKnownResource {
        device_id: String,
        resource_type: &'static str,
    },

    #[error("invalid input: {message}")]
    ValidationFailed { message: String },

    #[error("gateway rejected the request: {message} (HTTP {status})")]
    Gateway { message: String, status: u16 },

    #[error(transparent)]
    Tree(#[from] TreeError),

    #[error(transparent)]
    Api(thingly_api::Error),
}

impl From<thingly_api::Error> for CoreError {
    fn from(err: thingly_api::Error) -> Self {
        match err {
            thingly_api::Error::Timeout { timeout_secs } => Self::Timeout { timeout_secs },
            thingly_api::Error::Gateway { message, status } => Self::Gateway { message, status },
            other => Self::Api(other),
        }
    }
}

impl CoreError {
    /// Whether retrying the same call later could succeed.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Timeout { .. } | Self::ConnectionFailed { .. } => true,
            Self::Api(e) => e.is_transient(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_errors_map_to_core_variants() {
        let err = CoreError::from(thingly_api::Error::Timeout { timeout_secs: 30 });
        assert!(matches!(err, CoreError::Timeout { timeout_secs: 30 }));
        assert!(err.is_transient());

        let err = CoreError::from(thingly_api::Error::Gateway {
            message: "nope".into(),
            status: 500,
        });
        assert!(matches!(err, CoreError::Gateway { status: 500, .. }));
        assert!(!err.is_transient());
    }
}
