//! Domain device model.

use serde::{Deserialize, Serialize};

use super::status::{DeviceStatus, OwnershipStatus, ShadowSynchronization};

/// Placeholder shown for devices that never published a name.
pub const NO_DEVICE_NAME: &str = "<no-name>";

/// A device known to the gateway, in domain form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub id: String,

    #[serde(default)]
    pub name: Option<String>,

    /// Device types, e.g. `["oic.d.light", "oic.wk.d"]`.
    #[serde(default)]
    pub types: Vec<String>,

    #[serde(default)]
    pub ownership: OwnershipStatus,

    #[serde(default)]
    pub status: DeviceStatus,

    #[serde(default)]
    pub shadow_synchronization: ShadowSynchronization,
}

impl Device {
    #[must_use]
    pub fn is_online(&self) -> bool {
        self.status.is_online()
    }

    #[must_use]
    pub fn is_owned(&self) -> bool {
        self.ownership.is_owned()
    }

    /// Name for display, with a placeholder for unnamed devices.
    #[must_use]
    pub fn display_name(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => NO_DEVICE_NAME,
        }
    }

    #[must_use]
    pub fn has_type(&self, device_type: &str) -> bool {
        self.types.iter().any(|t| t == device_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_falls_back_for_missing_or_empty() {
        let mut device = Device {
            id: "d1".into(),
            ..Device::default()
        };
        assert_eq!(device.display_name(), NO_DEVICE_NAME);

        device.name = Some(String::new());
        assert_eq!(device.display_name(), NO_DEVICE_NAME);

        device.name = Some("Lamp".into());
        assert_eq!(device.display_name(), "Lamp");
    }

    #[test]
    fn status_helpers() {
        let device = Device {
            id: "d1".into(),
            status: DeviceStatus::Online,
            ownership: OwnershipStatus::Owned,
            ..Device::default()
        };
        assert!(device.is_online());
        assert!(device.is_owned());
    }
}
