//! Domain resource model and capability helpers.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// OCF interfaces this client makes decisions on.
pub mod known_interfaces {
    pub const OIC_IF_A: &str = "oic.if.a";
    pub const OIC_IF_BASELINE: &str = "oic.if.baseline";
    pub const OIC_IF_CREATE: &str = "oic.if.create";
}

/// Resource types this client makes decisions on.
pub mod known_resource_types {
    /// Device configuration, carries the writable device name.
    pub const OIC_WK_CON: &str = "oic.wk.con";
    /// Device provisioning service configuration.
    pub const X_PLGD_DPS_CONF: &str = "x.plgd.dps.conf";
    /// CoAP cloud configuration, written during onboarding.
    pub const OIC_R_COAP_CLOUD_CONF: &str = "oic.r.coapcloudconf";
    /// The device resource itself.
    pub const OIC_WK_D: &str = "oic.wk.d";
}

/// A device resource link in domain form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    /// Slash-prefixed path, e.g. `/light/1`.
    pub href: String,

    #[serde(default)]
    pub resource_types: Vec<String>,

    #[serde(default)]
    pub interfaces: Vec<String>,

    /// Endpoints the resource is reachable on, e.g. `coap://10.0.0.2:5683`.
    #[serde(default)]
    pub endpoints: Vec<String>,
}

impl Resource {
    /// Whether new resources can be created under this one.
    #[must_use]
    pub fn can_create_resource(&self) -> bool {
        self.interfaces
            .iter()
            .any(|i| i == known_interfaces::OIC_IF_CREATE)
    }

    /// Whether the resource is reachable over a plain CoAP endpoint and
    /// therefore directly editable by this client.
    #[must_use]
    pub fn is_editable(&self) -> bool {
        self.endpoints
            .iter()
            .any(|e| e.starts_with("coap://") || e.starts_with("coap+tcp://"))
    }

    #[must_use]
    pub fn has_resource_type(&self, resource_type: &str) -> bool {
        self.resource_types.iter().any(|t| t == resource_type)
    }

    /// The last path segment of the href, used as a short display label.
    #[must_use]
    pub fn last_href_segment(&self) -> &str {
        last_segment(&self.href)
    }
}

/// The last non-empty segment of a slash path. Hrefs with no segments
/// fall back to the whole input.
#[must_use]
pub fn last_segment(href: &str) -> &str {
    href.rsplit('/').find(|s| !s.is_empty()).unwrap_or(href)
}

/// Find the device configuration resource that carries the writable
/// device name.
#[must_use]
pub fn device_name_resource(resources: &[Resource]) -> Option<&Resource> {
    resources
        .iter()
        .find(|r| r.has_resource_type(known_resource_types::OIC_WK_CON))
}

/// Whether the device exposes a writable device name.
#[must_use]
pub fn supports_device_name(resources: &[Resource]) -> bool {
    device_name_resource(resources).is_some()
}

/// Find the device provisioning service configuration resource.
#[must_use]
pub fn dps_config(resources: &[Resource]) -> Option<&Resource> {
    resources
        .iter()
        .find(|r| r.has_resource_type(known_resource_types::X_PLGD_DPS_CONF))
}

/// Find the CoAP cloud configuration resource used for onboarding.
#[must_use]
pub fn cloud_config(resources: &[Resource]) -> Option<&Resource> {
    resources
        .iter()
        .find(|r| r.has_resource_type(known_resource_types::OIC_R_COAP_CLOUD_CONF))
}

/// Validate a provisioning service endpoint address.
///
/// Accepts scheme/host/port characters only; rejects whitespace and
/// anything that could smuggle extra URL components.
#[must_use]
pub fn is_valid_dps_endpoint(endpoint: &str) -> bool {
    !endpoint.is_empty()
        && endpoint
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '+' | ':' | '.' | '/'))
}

/// Skeleton representation for creating a new resource when the caller
/// provides no explicit body.
#[must_use]
pub fn new_resource_template() -> Value {
    json!({
        "rt": [],
        "if": [known_interfaces::OIC_IF_A, known_interfaces::OIC_IF_BASELINE],
        "rep": {},
        "p": { "bm": 3 }
    })
}
