//! Wire-to-domain conversions.
//!
//! The api crate deserializes the gateway's loose JSON shapes; these
//! conversions pin them down to the typed domain models, folding any
//! strings the gateway invents later into the `Unknown` variants.

use thingly_api::types::{DeviceSummary, ResourceLink};

use crate::model::status::{DeviceStatus, OwnershipStatus, ShadowSynchronization};
use crate::model::{Device, Resource};

impl From<DeviceSummary> for Device {
    fn from(summary: DeviceSummary) -> Self {
        let (status, shadow) = summary.metadata.map_or(
            (DeviceStatus::Unknown, ShadowSynchronization::Unset),
            |m| {
                (
                    m.status
                        .map_or(DeviceStatus::Unknown, |s| DeviceStatus::parse(&s.value)),
                    m.shadow_synchronization
                        .map_or(ShadowSynchronization::Unset, |s| {
                            ShadowSynchronization::parse(&s)
                        }),
                )
            },
        );

        Self {
            id: summary.id,
            name: summary.name,
            types: summary.types,
            ownership: summary
                .ownership_status
                .map_or(OwnershipStatus::Unknown, |s| OwnershipStatus::parse(&s)),
            status,
            shadow_synchronization: shadow,
        }
    }
}

impl From<ResourceLink> for Resource {
    fn from(link: ResourceLink) -> Self {
        Self {
            href: link.href,
            resource_types: link.resource_types,
            interfaces: link.interfaces,
            endpoints: link
                .endpoint_informations
                .unwrap_or_default()
                .into_iter()
                .map(|e| e.endpoint)
                .collect(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;
    use thingly_api::types::{DeviceSummary, ResourceLink};

    use super::*;

    #[test]
    fn device_conversion_parses_statuses() {
        let summary: DeviceSummary = serde_json::from_value(json!({
            "id": "d1",
            "name": "Lamp",
            "types": ["oic.d.light"],
            "ownershipStatus": "OWNED",
            "metadata": {
                "status": { "value": "ONLINE" },
                "shadowSynchronization": "ENABLED"
            }
        }))
        .unwrap();

        let device = Device::from(summary);
        assert_eq!(device.status, DeviceStatus::Online);
        assert_eq!(device.ownership, OwnershipStatus::Owned);
        assert_eq!(
            device.shadow_synchronization,
            ShadowSynchronization::Enabled
        );
    }

    #[test]
    fn device_conversion_tolerates_sparse_records() {
        let summary: DeviceSummary = serde_json::from_value(json!({ "id": "d2" })).unwrap();
        let device = Device::from(summary);
        assert_eq!(device.status, DeviceStatus::Unknown);
        assert_eq!(device.ownership, OwnershipStatus::Unknown);
        assert!(device.name.is_none());
    }

    #[test]
    fn resource_conversion_flattens_endpoints() {
        let link: ResourceLink = serde_json::from_value(json!({
            "href": "/light/1",
            "resourceTypes": ["oic.r.light"],
            "interfaces": ["oic.if.a"],
            "endpointInformations": [
                { "endpoint": "coap://10.0.0.2:5683" },
                { "endpoint": "coaps://10.0.0.2:5684" }
            ]
        }))
        .unwrap();

        let resource = Resource::from(link);
        assert_eq!(
            resource.endpoints,
            vec!["coap://10.0.0.2:5683", "coaps://10.0.0.2:5684"]
        );
        assert!(resource.is_editable());
    }
}
