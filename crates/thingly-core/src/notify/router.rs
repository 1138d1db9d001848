//! Routing of gateway events onto notification topics and notices.
//!
//! Every event unconditionally produces its topics — subscribers like
//! the data store always see them. Notices (user-facing toasts) are
//! additionally gated by the [`ActiveNotifications`] set, so routing an
//! event with nothing toggled on is silent but never lossy.

use serde_json::json;

use thingly_api::types::GatewayEvent;

use crate::model::{DeviceStatus, Severity};
use crate::notify::active::ActiveNotifications;
use crate::notify::keys::{
    DEVICES_STATUS_KEY, REGISTERED_UNREGISTERED_COUNT_KEY, device_key, device_status_key,
    resource_registration_event_key, resource_update_key,
};

/// Direction of a resource registration change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceEventType {
    Added,
    Removed,
}

impl ResourceEventType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Added => "added",
            Self::Removed => "removed",
        }
    }
}

/// A keyed payload emitted for every consumer of a notification key.
#[derive(Debug, Clone, PartialEq)]
pub struct Topic {
    pub key: String,
    pub payload: serde_json::Value,
}

/// A user-facing notice, emitted only when its gate key is active.
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub severity: Severity,
    pub title: String,
    pub body: String,
    pub device_id: Option<String>,
}

/// Result of routing one gateway event.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Routed {
    pub topics: Vec<Topic>,
    pub notices: Vec<Notice>,
}

/// Route one gateway event onto topics, gating notices by the active
/// notification set.
#[must_use]
pub fn route_event(event: &GatewayEvent, active: &ActiveNotifications) -> Routed {
    let mut routed = Routed::default();

    match event {
        GatewayEvent::DeviceMetadataUpdated(e) => {
            let status = e
                .status
                .as_ref()
                .map_or(DeviceStatus::Unknown, |s| DeviceStatus::parse(&s.value));
            push_status_change(&mut routed, active, &e.device_id, status);
        }
        GatewayEvent::DeviceRegistered(e) => {
            for id in &e.device_ids {
                push_status_change(&mut routed, active, id, DeviceStatus::Registered);
            }
            push_registration_count(&mut routed, e.device_ids.len());
        }
        GatewayEvent::DeviceUnregistered(e) => {
            for id in &e.device_ids {
                push_status_change(&mut routed, active, id, DeviceStatus::Unregistered);
            }
            push_registration_count(&mut routed, e.device_ids.len());
        }
        GatewayEvent::ResourcePublished(e) => {
            if let Some(id) = e.device_id.as_deref() {
                let hrefs: Vec<&str> = e.resources.iter().map(|r| r.href.as_str()).collect();
                push_registration_change(&mut routed, active, id, ResourceEventType::Added, &hrefs);
            }
        }
        GatewayEvent::ResourceUnpublished(e) => {
            if let Some(id) = e.device_id.as_deref() {
                let hrefs: Vec<&str> = e.hrefs.iter().map(String::as_str).collect();
                push_registration_change(
                    &mut routed,
                    active,
                    id,
                    ResourceEventType::Removed,
                    &hrefs,
                );
            }
        }
        GatewayEvent::ResourceChanged(e) => {
            if let (Some(id), Some(href)) = (e.device_id.as_deref(), e.href.as_deref()) {
                let key = resource_update_key(id, href);
                let gated = active.is_active(&key);
                routed.topics.push(Topic {
                    key,
                    payload: e.content.clone(),
                });
                if gated {
                    routed.notices.push(Notice {
                        severity: Severity::Grey,
                        title: "Resource updated".to_owned(),
                        body: format!("{href} on device {id} changed"),
                        device_id: Some(id.to_owned()),
                    });
                }
            }
        }
    }

    routed
}

fn push_status_change(
    routed: &mut Routed,
    active: &ActiveNotifications,
    device_id: &str,
    status: DeviceStatus,
) {
    routed.topics.push(Topic {
        key: device_status_key(device_id),
        payload: json!({ "deviceId": device_id, "status": status }),
    });

    // Unregistration is deliberately quiet: the device is gone and a
    // toast about it right after a disown/delete is just noise.
    let gate = active.is_active(DEVICES_STATUS_KEY) || active.is_active(&device_key(device_id));
    if gate && status != DeviceStatus::Unregistered {
        let (severity, verb) = match status {
            DeviceStatus::Online => (Severity::Success, "went online"),
            DeviceStatus::Offline => (Severity::Warning, "went offline"),
            DeviceStatus::Registered => (Severity::Grey, "registered"),
            DeviceStatus::Unregistered | DeviceStatus::Unknown => {
                (Severity::Grey, "changed status")
            }
        };
        routed.notices.push(Notice {
            severity,
            title: "Device status change".to_owned(),
            body: format!("Device {device_id} {verb}"),
            device_id: Some(device_id.to_owned()),
        });
    }
}

fn push_registration_count(routed: &mut Routed, count: usize) {
    routed.topics.push(Topic {
        key: REGISTERED_UNREGISTERED_COUNT_KEY.to_owned(),
        payload: json!(count),
    });
}

fn push_registration_change(
    routed: &mut Routed,
    active: &ActiveNotifications,
    device_id: &str,
    event: ResourceEventType,
    hrefs: &[&str],
) {
    routed.topics.push(Topic {
        key: resource_registration_event_key(device_id, event.as_str()),
        payload: json!({ "event": event.as_str(), "hrefs": hrefs }),
    });

    if active.is_active(&device_key(device_id)) {
        let verb = match event {
            ResourceEventType::Added => "published",
            ResourceEventType::Removed => "unpublished",
        };
        routed.notices.push(Notice {
            severity: Severity::Grey,
            title: format!("Resources {verb}"),
            body: format!("Device {device_id} {verb} {} resource(s)", hrefs.len()),
            device_id: Some(device_id.to_owned()),
        });
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;
    use thingly_api::types::{
        DeviceIds, DeviceMetadataUpdated, GatewayEvent, ResourceChanged, StatusValue,
    };

    use super::*;

    fn metadata_event(device_id: &str, status: &str) -> GatewayEvent {
        GatewayEvent::DeviceMetadataUpdated(DeviceMetadataUpdated {
            device_id: device_id.to_owned(),
            status: Some(StatusValue {
                value: status.to_owned(),
            }),
            shadow_synchronization: None,
        })
    }

    #[test]
    fn status_topic_always_emitted_notice_gated() {
        let active = ActiveNotifications::new();
        let event = metadata_event("d1", "ONLINE");

        let quiet = route_event(&event, &active);
        assert_eq!(quiet.topics.len(), 1);
        assert_eq!(quiet.topics[0].key, "devices.status.d1");
        assert!(quiet.notices.is_empty());

        active.toggle(device_key("d1"));
        let noisy = route_event(&event, &active);
        assert_eq!(noisy.notices.len(), 1);
        assert_eq!(noisy.notices[0].severity, Severity::Success);
    }

    #[test]
    fn global_status_key_gates_all_devices() {
        let active = ActiveNotifications::new();
        active.toggle(DEVICES_STATUS_KEY);

        let routed = route_event(&metadata_event("other", "OFFLINE"), &active);
        assert_eq!(routed.notices.len(), 1);
        assert_eq!(routed.notices[0].severity, Severity::Warning);
    }

    #[test]
    fn unregistered_never_produces_a_notice() {
        let active = ActiveNotifications::new();
        active.toggle(DEVICES_STATUS_KEY);

        let event = GatewayEvent::DeviceUnregistered(DeviceIds {
            device_ids: vec!["d1".into(), "d2".into()],
        });
        let routed = route_event(&event, &active);

        assert!(routed.notices.is_empty());
        // Per-device status topics plus the count topic.
        assert_eq!(routed.topics.len(), 3);
        let count = routed
            .topics
            .iter()
            .find(|t| t.key == REGISTERED_UNREGISTERED_COUNT_KEY)
            .unwrap();
        assert_eq!(count.payload, json!(2));
    }

    #[test]
    fn registration_emits_count_topic_and_gated_notice() {
        let active = ActiveNotifications::new();
        active.toggle(device_key("d1"));

        let event = GatewayEvent::DeviceRegistered(DeviceIds {
            device_ids: vec!["d1".into()],
        });
        let routed = route_event(&event, &active);

        assert_eq!(routed.notices.len(), 1);
        assert!(routed
            .topics
            .iter()
            .any(|t| t.key == REGISTERED_UNREGISTERED_COUNT_KEY));
    }

    #[test]
    fn resource_change_routes_to_per_resource_key() {
        let active = ActiveNotifications::new();
        let event = GatewayEvent::ResourceChanged(ResourceChanged {
            device_id: Some("d1".into()),
            href: Some("/light/1".into()),
            content: json!({ "state": true }),
        });

        let quiet = route_event(&event, &active);
        assert_eq!(quiet.topics[0].key, "devices.resource.update.d1./light/1");
        assert!(quiet.notices.is_empty());

        active.toggle(resource_update_key("d1", "/light/1"));
        let noisy = route_event(&event, &active);
        assert_eq!(noisy.notices.len(), 1);
    }

    #[test]
    fn events_without_device_id_route_nowhere() {
        let active = ActiveNotifications::new();
        let event = GatewayEvent::ResourceChanged(ResourceChanged {
            device_id: None,
            href: Some("/light/1".into()),
            content: json!({}),
        });
        let routed = route_event(&event, &active);
        assert!(routed.topics.is_empty());
        assert!(routed.notices.is_empty());
    }
}
