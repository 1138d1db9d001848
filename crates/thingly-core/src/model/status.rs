//! Device lifecycle, ownership, and provisioning status enums.
//!
//! Every enum here is total over arbitrary gateway strings: values the
//! gateway may add later fold into an `Unknown` variant instead of
//! failing deserialization, and the severity mapping gives `Unknown` a
//! neutral color.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

// ── Connection status ────────────────────────────────────────────────

/// Connection state of a device as reported by the gateway.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeviceStatus {
    Online,
    Offline,
    Registered,
    Unregistered,
    #[default]
    #[serde(other)]
    Unknown,
}

impl DeviceStatus {
    /// Parse a gateway status string, folding unrecognized values into
    /// [`DeviceStatus::Unknown`].
    #[must_use]
    pub fn parse(value: &str) -> Self {
        value.parse().unwrap_or(Self::Unknown)
    }

    #[must_use]
    pub fn is_online(self) -> bool {
        self == Self::Online
    }
}

// ── Ownership ────────────────────────────────────────────────────────

/// Whether the local client owns the device.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OwnershipStatus {
    Owned,
    Unowned,
    /// The device does not support the ownership transfer methods the
    /// gateway is configured with.
    Unsupported,
    #[default]
    #[serde(other)]
    Unknown,
}

impl OwnershipStatus {
    #[must_use]
    pub fn parse(value: &str) -> Self {
        value.parse().unwrap_or(Self::Unknown)
    }

    #[must_use]
    pub fn is_owned(self) -> bool {
        self == Self::Owned
    }
}

// ── Shadow synchronization ───────────────────────────────────────────

/// Twin/shadow synchronization setting from device metadata.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShadowSynchronization {
    #[default]
    Unset,
    Enabled,
    Disabled,
}

impl ShadowSynchronization {
    #[must_use]
    pub fn parse(value: &str) -> Self {
        value.parse().unwrap_or(Self::Unset)
    }
}

// ── Cloud onboarding ─────────────────────────────────────────────────

/// Cloud onboarding state derived from the `oic.r.coapcloudconf`
/// resource's provisioning status field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display)]
pub enum OnboardingStatus {
    #[default]
    #[strum(serialize = "n/a")]
    #[serde(rename = "n/a")]
    NotAvailable,
    #[strum(serialize = "uninitialized")]
    #[serde(rename = "uninitialized")]
    Uninitialized,
    #[strum(serialize = "registered")]
    #[serde(rename = "registered")]
    Registered,
    #[strum(serialize = "failed")]
    #[serde(rename = "failed")]
    Failed,
}

impl OnboardingStatus {
    /// Parse the cloud configuration `cps` field. Anything unrecognized
    /// means the device never reported an onboarding state.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value {
            "uninitialized" => Self::Uninitialized,
            "registered" => Self::Registered,
            "failed" => Self::Failed,
            _ => Self::NotAvailable,
        }
    }
}

// ── Device provisioning ──────────────────────────────────────────────

/// Provisioning state reported by the device provisioning service
/// configuration resource (`x.plgd.dps.conf`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display)]
pub enum ProvisionStatus {
    #[strum(serialize = "uninitialized")]
    #[serde(rename = "uninitialized")]
    Uninitialized,
    #[strum(serialize = "initialized")]
    #[serde(rename = "initialized")]
    Initialized,
    #[strum(serialize = "provisioning credentials")]
    #[serde(rename = "provisioning credentials")]
    ProvisioningCredentials,
    #[strum(serialize = "provisioned credentials")]
    #[serde(rename = "provisioned credentials")]
    ProvisionedCredentials,
    #[strum(serialize = "provisioning acls")]
    #[serde(rename = "provisioning acls")]
    ProvisioningAcls,
    #[strum(serialize = "provisioned acls")]
    #[serde(rename = "provisioned acls")]
    ProvisionedAcls,
    #[strum(serialize = "provisioning cloud")]
    #[serde(rename = "provisioning cloud")]
    ProvisioningCloud,
    #[strum(serialize = "provisioned cloud")]
    #[serde(rename = "provisioned cloud")]
    ProvisionedCloud,
    #[strum(serialize = "provisioned")]
    #[serde(rename = "provisioned")]
    Provisioned,
    #[strum(serialize = "transient failure")]
    #[serde(rename = "transient failure")]
    TransientFailure,
    #[strum(serialize = "failure")]
    #[serde(rename = "failure")]
    Failure,
    /// Anything the device reports that this client does not model.
    #[default]
    #[strum(serialize = "unknown")]
    #[serde(other)]
    Unknown,
}

impl ProvisionStatus {
    /// Parse a provisioning status string, folding unrecognized values
    /// into [`ProvisionStatus::Unknown`].
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value {
            "uninitialized" => Self::Uninitialized,
            "initialized" => Self::Initialized,
            "provisioning credentials" => Self::ProvisioningCredentials,
            "provisioned credentials" => Self::ProvisionedCredentials,
            "provisioning acls" => Self::ProvisioningAcls,
            "provisioned acls" => Self::ProvisionedAcls,
            "provisioning cloud" => Self::ProvisioningCloud,
            "provisioned cloud" => Self::ProvisionedCloud,
            "provisioned" => Self::Provisioned,
            "transient failure" => Self::TransientFailure,
            "failure" => Self::Failure,
            _ => Self::Unknown,
        }
    }

    /// Map a provisioning state to a display severity.
    ///
    /// Every state from `initialized` onward renders `Success` as long
    /// as provisioning is making progress; `transient failure` is
    /// `Warning`, a hard `failure` is `Error`, and `uninitialized` or
    /// anything unrecognized renders neutral.
    #[must_use]
    pub fn severity(self) -> Severity {
        match self {
            Self::Initialized
            | Self::ProvisioningCredentials
            | Self::ProvisionedCredentials
            | Self::ProvisioningAcls
            | Self::ProvisionedAcls
            | Self::ProvisioningCloud
            | Self::ProvisionedCloud
            | Self::Provisioned => Severity::Success,
            Self::TransientFailure => Severity::Warning,
            Self::Failure => Severity::Error,
            Self::Uninitialized | Self::Unknown => Severity::Grey,
        }
    }
}

// ── Severity ─────────────────────────────────────────────────────────

/// Display severity used for status badges and notices.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Grey,
    Success,
    Warning,
    Error,
}

/// Severity for an arbitrary provisioning status string.
///
/// Total over all inputs: strings that don't name a known provisioning
/// state come back [`Severity::Grey`].
#[must_use]
pub fn provision_status_severity(status: &str) -> Severity {
    ProvisionStatus::parse(status).severity()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn device_status_parses_known_and_unknown() {
        assert_eq!(DeviceStatus::parse("ONLINE"), DeviceStatus::Online);
        assert_eq!(DeviceStatus::parse("UNREGISTERED"), DeviceStatus::Unregistered);
        assert_eq!(DeviceStatus::parse("SLEEPING"), DeviceStatus::Unknown);
        assert_eq!(DeviceStatus::Online.to_string(), "ONLINE");
    }

    #[test]
    fn ownership_round_trips() {
        assert_eq!(OwnershipStatus::parse("OWNED"), OwnershipStatus::Owned);
        assert_eq!(
            OwnershipStatus::parse("UNSUPPORTED"),
            OwnershipStatus::Unsupported
        );
        assert_eq!(OwnershipStatus::Unowned.to_string(), "UNOWNED");
        assert!(!OwnershipStatus::Unknown.is_owned());
    }

    #[test]
    fn provision_status_severity_mapping() {
        // Every in-progress and completed state is success.
        for status in [
            "initialized",
            "provisioning credentials",
            "provisioned credentials",
            "provisioning acls",
            "provisioned acls",
            "provisioning cloud",
            "provisioned cloud",
            "provisioned",
        ] {
            assert_eq!(
                provision_status_severity(status),
                Severity::Success,
                "status {status:?}"
            );
        }
        assert_eq!(
            provision_status_severity("transient failure"),
            Severity::Warning
        );
        assert_eq!(provision_status_severity("failure"), Severity::Error);
        assert_eq!(provision_status_severity("uninitialized"), Severity::Grey);
    }

    #[test]
    fn provision_status_severity_is_total() {
        // Never panics, never errors: arbitrary strings map to grey.
        assert_eq!(provision_status_severity("bogus"), Severity::Grey);
        assert_eq!(provision_status_severity(""), Severity::Grey);
        assert_eq!(provision_status_severity("PROVISIONED"), Severity::Grey);
    }

    #[test]
    fn severity_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&Severity::Success).unwrap(),
            "\"success\""
        );
        assert_eq!(Severity::Grey.to_string(), "grey");
    }

    #[test]
    fn onboarding_status_parse() {
        assert_eq!(OnboardingStatus::parse("registered"), OnboardingStatus::Registered);
        assert_eq!(OnboardingStatus::parse("failed"), OnboardingStatus::Failed);
        assert_eq!(OnboardingStatus::parse("???"), OnboardingStatus::NotAvailable);
        assert_eq!(OnboardingStatus::NotAvailable.to_string(), "n/a");
    }
}
