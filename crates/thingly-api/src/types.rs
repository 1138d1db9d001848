//! Wire types for the device gateway's REST and WebSocket surfaces.
//!
//! All field names follow the gateway's camelCase JSON. These are transport
//! shapes only — `thingly-core` converts them into domain models.

use serde::{Deserialize, Serialize};

// ── Devices ──────────────────────────────────────────────────────────

/// A device record as returned by `GET /api/v1/devices`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceSummary {
    pub id: String,

    #[serde(default)]
    pub name: Option<String>,

    /// Device types, e.g. `["oic.d.light", "oic.wk.d"]`.
    #[serde(default)]
    pub types: Vec<String>,

    /// `OWNED`, `UNOWNED`, or `UNSUPPORTED`.
    #[serde(default)]
    pub ownership_status: Option<String>,

    #[serde(default)]
    pub metadata: Option<DeviceMetadata>,

    /// Everything else the gateway sends.
    #[serde(flatten)]
    pub extra: serde_json::Value,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceMetadata {
    #[serde(default)]
    pub status: Option<StatusValue>,

    /// `UNSET`, `ENABLED`, or `DISABLED`.
    #[serde(default)]
    pub shadow_synchronization: Option<String>,
}

/// Wrapper the gateway uses for status fields: `{"value": "ONLINE"}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatusValue {
    #[serde(default)]
    pub value: String,
}

// ── Resources ────────────────────────────────────────────────────────

/// A resource link from `GET /api/v1/devices/{id}/resource-links`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceLink {
    pub href: String,

    #[serde(default)]
    pub resource_types: Vec<String>,

    #[serde(default)]
    pub interfaces: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint_informations: Option<Vec<EndpointInformation>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointInformation {
    pub endpoint: String,
}

/// Representation returned when reading a resource.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResourceContent {
    #[serde(default)]
    pub content: serde_json::Value,

    #[serde(flatten)]
    pub extra: serde_json::Value,
}

// ── WebSocket events ─────────────────────────────────────────────────

/// A parsed event from the gateway WebSocket stream.
///
/// The gateway tags each frame with exactly one of these keys, so the
/// externally-tagged serde representation matches the wire format directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GatewayEvent {
    DeviceMetadataUpdated(DeviceMetadataUpdated),
    DeviceRegistered(DeviceIds),
    DeviceUnregistered(DeviceIds),
    ResourcePublished(ResourcePublished),
    ResourceUnpublished(ResourceUnpublished),
    ResourceChanged(ResourceChanged),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceMetadataUpdated {
    pub device_id: String,

    #[serde(default)]
    pub status: Option<StatusValue>,

    #[serde(default)]
    pub shadow_synchronization: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceIds {
    #[serde(default)]
    pub device_ids: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourcePublished {
    #[serde(default)]
    pub device_id: Option<String>,

    #[serde(default)]
    pub resources: Vec<ResourceLink>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceUnpublished {
    #[serde(default)]
    pub device_id: Option<String>,

    #[serde(default)]
    pub hrefs: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceChanged {
    #[serde(default)]
    pub device_id: Option<String>,

    #[serde(default)]
    pub href: Option<String>,

    #[serde(default)]
    pub content: serde_json::Value,
}

impl GatewayEvent {
    /// The device id the event concerns, when the payload carries one.
    pub fn device_id(&self) -> Option<&str> {
        match self {
            Self::DeviceMetadataUpdated(e) => Some(&e.device_id),
            Self::DeviceRegistered(e) | Self::DeviceUnregistered(e) => {
                e.device_ids.first().map(String::as_str)
            }
            Self::ResourcePublished(e) => e.device_id.as_deref(),
            Self::ResourceUnpublished(e) => e.device_id.as_deref(),
            Self::ResourceChanged(e) => e.device_id.as_deref(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_device_metadata_updated() {
        let frame = json!({
            "deviceMetadataUpdated": {
                "deviceId": "d1",
                "status": { "value": "ONLINE" },
                "shadowSynchronization": "ENABLED"
            }
        });

        let event: GatewayEvent = serde_json::from_value(frame).unwrap();
        match event {
            GatewayEvent::DeviceMetadataUpdated(e) => {
                assert_eq!(e.device_id, "d1");
                assert_eq!(e.status.unwrap().value, "ONLINE");
                assert_eq!(e.shadow_synchronization.as_deref(), Some("ENABLED"));
            }
            other => panic!("wrong variant: {other:?}"),
        }
    }

    #[test]
    fn parses_resource_published_and_unpublished() {
        let published: GatewayEvent = serde_json::from_value(json!({
            "resourcePublished": {
                "deviceId": "d1",
                "resources": [
                    { "href": "/light/1", "resourceTypes": ["oic.r.light"], "interfaces": [] }
                ]
            }
        }))
        .unwrap();
        match &published {
            GatewayEvent::ResourcePublished(e) => {
                assert_eq!(e.resources.len(), 1);
                assert_eq!(e.resources[0].href, "/light/1");
            }
            other => panic!("wrong variant: {other:?}"),
        }

        let unpublished: GatewayEvent = serde_json::from_value(json!({
            "resourceUnpublished": { "deviceId": "d1", "hrefs": ["/light/1"] }
        }))
        .unwrap();
        assert_eq!(unpublished.device_id(), Some("d1"));
    }

    #[test]
    fn parses_registration_events() {
        let event: GatewayEvent = serde_json::from_value(json!({
            "deviceRegistered": { "deviceIds": ["a", "b"] }
        }))
        .unwrap();
        match event {
            GatewayEvent::DeviceRegistered(e) => assert_eq!(e.device_ids, vec!["a", "b"]),
            other => panic!("wrong variant: {other:?}"),
        }
    }

    #[test]
    fn device_summary_keeps_unknown_fields() {
        let device: DeviceSummary = serde_json::from_value(json!({
            "id": "d1",
            "name": "Lamp",
            "types": ["oic.wk.d"],
            "ownershipStatus": "OWNED",
            "metadata": { "status": { "value": "OFFLINE" } },
            "endpoints": ["coap://10.0.0.2:5683"]
        }))
        .unwrap();

        assert_eq!(device.id, "d1");
        assert_eq!(device.ownership_status.as_deref(), Some("OWNED"));
        assert!(device.extra.get("endpoints").is_some());
    }
}
