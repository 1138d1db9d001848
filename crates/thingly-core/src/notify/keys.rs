//! Notification key composition.
//!
//! Keys form a dotted hierarchy under `devices`: a global key gates a
//! whole event class, per-device and per-resource keys gate single
//! subjects. Key functions are pure string composition; they never
//! validate the id or href.

/// Gates all device status notices.
pub const DEVICES_STATUS_KEY: &str = "devices.status";

/// Prefix for per-device resource registration topics.
pub const DEVICES_RESOURCE_REGISTRATION_KEY: &str = "devices.resource.registration";

/// Prefix for per-resource update topics.
pub const DEVICES_RESOURCE_UPDATE_KEY: &str = "devices.resource.update";

/// Topic carrying the running count of registered/unregistered events.
pub const REGISTERED_UNREGISTERED_COUNT_KEY: &str = "devices-registered-unregistered-count";

/// Key gating all notices for a single device.
#[must_use]
pub fn device_key(device_id: &str) -> String {
    format!("devices.{device_id}")
}

/// Topic for a single device's status changes.
#[must_use]
pub fn device_status_key(device_id: &str) -> String {
    format!("{DEVICES_STATUS_KEY}.{device_id}")
}

/// Topic for a single device's resource publish/unpublish events.
#[must_use]
pub fn resource_registration_key(device_id: &str) -> String {
    format!("{DEVICES_RESOURCE_REGISTRATION_KEY}.{device_id}")
}

/// Registration topic narrowed to one event direction (`added` or
/// `removed`).
#[must_use]
pub fn resource_registration_event_key(device_id: &str, event: &str) -> String {
    format!("{DEVICES_RESOURCE_REGISTRATION_KEY}.{device_id}.{event}")
}

/// Topic for updates to one resource on one device. The href is
/// embedded verbatim, slashes included.
#[must_use]
pub fn resource_update_key(device_id: &str, href: &str) -> String {
    format!("{DEVICES_RESOURCE_UPDATE_KEY}.{device_id}.{href}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_compose_verbatim() {
        assert_eq!(device_key("abc"), "devices.abc");
        assert_eq!(device_status_key("abc"), "devices.status.abc");
        assert_eq!(
            resource_registration_key("abc"),
            "devices.resource.registration.abc"
        );
        assert_eq!(
            resource_registration_event_key("abc", "added"),
            "devices.resource.registration.abc.added"
        );
        assert_eq!(
            resource_update_key("abc", "/light/1"),
            "devices.resource.update.abc./light/1"
        );
    }

    #[test]
    fn hrefs_are_not_escaped() {
        // Raw hrefs keep keys greppable; distinctness comes from the
        // device id prefix, not from escaping.
        let key = resource_update_key("d", "/a.b/c");
        assert_eq!(key, "devices.resource.update.d./a.b/c");
    }
}
