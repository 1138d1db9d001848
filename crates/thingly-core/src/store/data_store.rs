// ── Reactive device/resource store ──
//
// Holds the client's view of the gateway: the device list from the
// last refresh, plus resource links, kept current by applying
// WebSocket events. All reads are lock-free snapshots.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tracing::debug;

use thingly_api::types::GatewayEvent;

use crate::model::status::{DeviceStatus, ShadowSynchronization};
use crate::model::{Device, Resource};

use super::collection::EntityCollection;

/// A resource link tied to the device that published it.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceResource {
    pub device_id: String,
    pub resource: Resource,
}

/// Storage key for one device's resource link. The href is
/// slash-prefixed, so the concatenation is unambiguous.
fn link_key(device_id: &str, href: &str) -> String {
    format!("{device_id}{href}")
}

/// Central reactive store for everything the client knows about the
/// gateway's devices.
pub struct DataStore {
    devices: EntityCollection<Device>,
    links: EntityCollection<DeviceResource>,

    /// When the device list was last replaced from a REST refresh.
    last_refresh: watch::Sender<Option<DateTime<Utc>>>,

    /// When the last WebSocket event was applied.
    last_event: watch::Sender<Option<DateTime<Utc>>>,
}

impl Default for DataStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DataStore {
    #[must_use]
    pub fn new() -> Self {
        let (last_refresh, _) = watch::channel(None);
        let (last_event, _) = watch::channel(None);
        Self {
            devices: EntityCollection::new(),
            links: EntityCollection::new(),
            last_refresh,
            last_event,
        }
    }

    // ── Devices ──────────────────────────────────────────────────────

    /// Replace the whole device list from a REST refresh.
    pub fn apply_devices(&self, devices: Vec<Device>) {
        self.devices.clear();
        for device in devices {
            self.devices.upsert(device.id.clone(), device);
        }
        self.last_refresh.send_modify(|t| *t = Some(Utc::now()));
    }

    pub fn upsert_device(&self, device: Device) -> bool {
        self.devices.upsert(device.id.clone(), device)
    }

    /// Drop a device and all its resource links.
    pub fn remove_device(&self, device_id: &str) -> Option<Arc<Device>> {
        self.links
            .remove_where(|key| key.starts_with(device_id) && key[device_id.len()..].starts_with('/'));
        self.devices.remove(device_id)
    }

    #[must_use]
    pub fn device(&self, device_id: &str) -> Option<Arc<Device>> {
        self.devices.get(device_id)
    }

    #[must_use]
    pub fn devices(&self) -> Arc<Vec<Arc<Device>>> {
        self.devices.snapshot()
    }

    #[must_use]
    pub fn device_count(&self) -> usize {
        self.devices.len()
    }

    /// Subscribe to device list changes.
    #[must_use]
    pub fn subscribe_devices(&self) -> watch::Receiver<Arc<Vec<Arc<Device>>>> {
        self.devices.subscribe()
    }

    /// Apply a closure to a stored device, if present. Returns whether
    /// the device existed.
    pub fn update_device(&self, device_id: &str, f: impl FnOnce(&mut Device)) -> bool {
        let Some(current) = self.devices.get(device_id) else {
            return false;
        };
        let mut updated = (*current).clone();
        f(&mut updated);
        self.devices.upsert(device_id.to_owned(), updated);
        true
    }

    // ── Resource links ───────────────────────────────────────────────

    /// Replace one device's resource links.
    pub fn apply_resource_links(&self, device_id: &str, resources: Vec<Resource>) {
        self.links
            .remove_where(|key| key.starts_with(device_id) && key[device_id.len()..].starts_with('/'));
        for resource in resources {
            self.links.upsert(
                link_key(device_id, &resource.href),
                DeviceResource {
                    device_id: device_id.to_owned(),
                    resource,
                },
            );
        }
    }

    pub fn add_resource_links(&self, device_id: &str, resources: Vec<Resource>) {
        for resource in resources {
            self.links.upsert(
                link_key(device_id, &resource.href),
                DeviceResource {
                    device_id: device_id.to_owned(),
                    resource,
                },
            );
        }
    }

    pub fn remove_resource_links(&self, device_id: &str, hrefs: &[String]) {
        for href in hrefs {
            self.links.remove(&link_key(device_id, href));
        }
    }

    /// One device's resource links, sorted by href.
    #[must_use]
    pub fn resource_links(&self, device_id: &str) -> Vec<Resource> {
        self.links
            .snapshot()
            .iter()
            .filter(|l| l.device_id == device_id)
            .map(|l| l.resource.clone())
            .collect()
    }

    #[must_use]
    pub fn resource_link(&self, device_id: &str, href: &str) -> Option<Resource> {
        self.links
            .get(&link_key(device_id, href))
            .map(|l| l.resource.clone())
    }

    // ── Watermarks ───────────────────────────────────────────────────

    #[must_use]
    pub fn last_refresh(&self) -> Option<DateTime<Utc>> {
        *self.last_refresh.borrow()
    }

    #[must_use]
    pub fn last_event(&self) -> Option<DateTime<Utc>> {
        *self.last_event.borrow()
    }

    // ── Event application ────────────────────────────────────────────

    /// Fold one WebSocket event into the stored view.
    ///
    /// Registration events only touch devices the store already knows;
    /// the hub refetches full records for genuinely new devices.
    pub fn apply_event(&self, event: &GatewayEvent) {
        match event {
            GatewayEvent::DeviceMetadataUpdated(e) => {
                let status = e
                    .status
                    .as_ref()
                    .map(|s| DeviceStatus::parse(&s.value));
                let shadow = e
                    .shadow_synchronization
                    .as_deref()
                    .map(ShadowSynchronization::parse);
                self.update_device(&e.device_id, |d| {
                    if let Some(status) = status {
                        d.status = status;
                    }
                    if let Some(shadow) = shadow {
                        d.shadow_synchronization = shadow;
                    }
                });
            }
            GatewayEvent::DeviceRegistered(e) => {
                for id in &e.device_ids {
                    self.update_device(id, |d| d.status = DeviceStatus::Registered);
                }
            }
            GatewayEvent::DeviceUnregistered(e) => {
                for id in &e.device_ids {
                    self.update_device(id, |d| d.status = DeviceStatus::Unregistered);
                }
            }
            GatewayEvent::ResourcePublished(e) => {
                if let Some(id) = e.device_id.as_deref() {
                    let resources = e.resources.iter().cloned().map(Resource::from).collect();
                    self.add_resource_links(id, resources);
                }
            }
            GatewayEvent::ResourceUnpublished(e) => {
                if let Some(id) = e.device_id.as_deref() {
                    self.remove_resource_links(id, &e.hrefs);
                }
            }
            GatewayEvent::ResourceChanged(e) => {
                // Content is not cached; subscribers read it off the topic.
                debug!(device_id = ?e.device_id, href = ?e.href, "resource changed");
            }
        }
        self.last_event.send_modify(|t| *t = Some(Utc::now()));
    }

    /// Drop everything, e.g. after flushing the gateway's device cache.
    pub fn clear(&self) {
        self.devices.clear();
        self.links.clear();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;
    use thingly_api::types::{DeviceIds, DeviceMetadataUpdated, StatusValue};

    use crate::model::status::OwnershipStatus;

    use super::*;

    fn device(id: &str, status: DeviceStatus) -> Device {
        Device {
            id: id.to_owned(),
            name: Some(format!("device {id}")),
            types: vec!["oic.wk.d".into()],
            ownership: OwnershipStatus::Unowned,
            status,
            shadow_synchronization: ShadowSynchronization::Unset,
        }
    }

    fn resource(href: &str) -> Resource {
        Resource {
            href: href.to_owned(),
            ..Resource::default()
        }
    }

    #[test]
    fn refresh_replaces_the_device_list() {
        let store = DataStore::new();
        store.apply_devices(vec![device("a", DeviceStatus::Online)]);
        store.apply_devices(vec![device("b", DeviceStatus::Offline)]);

        assert!(store.device("a").is_none());
        assert_eq!(store.device("b").unwrap().status, DeviceStatus::Offline);
        assert!(store.last_refresh().is_some());
    }

    #[test]
    fn metadata_event_updates_status() {
        let store = DataStore::new();
        store.apply_devices(vec![device("a", DeviceStatus::Offline)]);

        store.apply_event(&GatewayEvent::DeviceMetadataUpdated(DeviceMetadataUpdated {
            device_id: "a".into(),
            status: Some(StatusValue {
                value: "ONLINE".into(),
            }),
            shadow_synchronization: Some("ENABLED".into()),
        }));

        let updated = store.device("a").unwrap();
        assert_eq!(updated.status, DeviceStatus::Online);
        assert_eq!(
            updated.shadow_synchronization,
            ShadowSynchronization::Enabled
        );
        assert!(store.last_event().is_some());
    }

    #[test]
    fn registration_events_only_touch_known_devices() {
        let store = DataStore::new();
        store.apply_devices(vec![device("a", DeviceStatus::Online)]);

        store.apply_event(&GatewayEvent::DeviceUnregistered(DeviceIds {
            device_ids: vec!["a".into(), "ghost".into()],
        }));

        assert_eq!(store.device("a").unwrap().status, DeviceStatus::Unregistered);
        assert!(store.device("ghost").is_none());
        assert_eq!(store.device_count(), 1);
    }

    #[test]
    fn resource_links_are_scoped_per_device() {
        let store = DataStore::new();
        store.apply_resource_links("a", vec![resource("/light/1"), resource("/oic/d")]);
        store.apply_resource_links("b", vec![resource("/light/1")]);

        assert_eq!(store.resource_links("a").len(), 2);
        assert_eq!(store.resource_links("b").len(), 1);
        assert!(store.resource_link("a", "/light/1").is_some());

        // Replacement drops stale links.
        store.apply_resource_links("a", vec![resource("/oic/d")]);
        assert!(store.resource_link("a", "/light/1").is_none());
        assert_eq!(store.resource_links("b").len(), 1);
    }

    #[test]
    fn publish_and_unpublish_events_maintain_links() {
        let store = DataStore::new();

        let published: GatewayEvent = serde_json::from_value(json!({
            "resourcePublished": {
                "deviceId": "a",
                "resources": [{ "href": "/light/1", "resourceTypes": [], "interfaces": [] }]
            }
        }))
        .unwrap();
        store.apply_event(&published);
        assert_eq!(store.resource_links("a").len(), 1);

        let unpublished: GatewayEvent = serde_json::from_value(json!({
            "resourceUnpublished": { "deviceId": "a", "hrefs": ["/light/1"] }
        }))
        .unwrap();
        store.apply_event(&unpublished);
        assert!(store.resource_links("a").is_empty());
    }

    #[test]
    fn removing_a_device_drops_its_links() {
        let store = DataStore::new();
        store.apply_devices(vec![device("a", DeviceStatus::Online)]);
        store.apply_resource_links("a", vec![resource("/light/1")]);

        store.remove_device("a");
        assert!(store.device("a").is_none());
        assert!(store.resource_links("a").is_empty());
    }
}
