// Resource endpoints
//
// Resource-link listing and per-resource read/update/create/delete.
// Hrefs are slash-prefixed paths and are appended to the URL verbatim;
// the optional `resourceInterface` query selects an OCF interface.

use tracing::debug;

use crate::client::GatewayClient;
use crate::error::Error;
use crate::types::{ResourceContent, ResourceLink};

/// Render the `resourceInterface` query suffix, empty when no interface
/// is selected.
fn interface_query(resource_interface: Option<&str>) -> String {
    match resource_interface {
        Some(iface) if !iface.is_empty() => format!("?resourceInterface={iface}"),
        _ => String::new(),
    }
}

/// Render the query suffix for commands: an optional `timeToLive` in
/// nanoseconds plus the optional `resourceInterface`.
fn command_query(resource_interface: Option<&str>, ttl: Option<u64>) -> String {
    let mut params = Vec::new();
    if let Some(ttl) = ttl {
        params.push(format!("timeToLive={ttl}"));
    }
    if let Some(iface) = resource_interface {
        if !iface.is_empty() {
            params.push(format!("resourceInterface={iface}"));
        }
    }
    if params.is_empty() {
        String::new()
    } else {
        format!("?{}", params.join("&"))
    }
}

impl GatewayClient {
    /// List the resource links a device exposes.
    ///
    /// `GET /api/v1/devices/{id}/resource-links`
    pub async fn list_resource_links(&self, device_id: &str) -> Result<Vec<ResourceLink>, Error> {
        let url = self.devices_url(&format!("/{device_id}/resource-links"))?;
        debug!(device_id, "listing resource links");
        self.get(url).await
    }

    /// Read a resource representation.
    ///
    /// `GET /api/v1/devices/{id}/resources{href}?resourceInterface=`
    pub async fn get_resource(
        &self,
        device_id: &str,
        href: &str,
        resource_interface: Option<&str>,
    ) -> Result<ResourceContent, Error> {
        let url = self.devices_url(&format!(
            "/{device_id}/resources{href}{}",
            interface_query(resource_interface)
        ))?;
        self.get(url).await
    }

    /// Update a resource. `ttl` is the command time-to-live in
    /// nanoseconds.
    ///
    /// `PUT /api/v1/devices/{id}/resources{href}?timeToLive=&resourceInterface=`
    pub async fn update_resource(
        &self,
        device_id: &str,
        href: &str,
        resource_interface: Option<&str>,
        ttl: Option<u64>,
        data: &serde_json::Value,
    ) -> Result<serde_json::Value, Error> {
        let url = self.devices_url(&format!(
            "/{device_id}/resources{href}{}",
            command_query(resource_interface, ttl)
        ))?;
        debug!(device_id, href, "updating resource");
        self.put(url, data).await
    }

    /// Create a new resource under a collection resource.
    ///
    /// `POST /api/v1/devices/{id}/resource-links{href}?timeToLive=`
    pub async fn create_resource(
        &self,
        device_id: &str,
        href: &str,
        ttl: Option<u64>,
        data: &serde_json::Value,
    ) -> Result<serde_json::Value, Error> {
        let url = self.devices_url(&format!(
            "/{device_id}/resource-links{href}{}",
            command_query(None, ttl)
        ))?;
        debug!(device_id, href, "creating resource");
        self.post(url, Some(data)).await
    }

    /// Delete a resource.
    ///
    /// `DELETE /api/v1/devices/{id}/resource-links{href}?timeToLive=`
    pub async fn delete_resource(
        &self,
        device_id: &str,
        href: &str,
        ttl: Option<u64>,
    ) -> Result<serde_json::Value, Error> {
        let url = self.devices_url(&format!(
            "/{device_id}/resource-links{href}{}",
            command_query(None, ttl)
        ))?;
        debug!(device_id, href, "deleting resource");
        self.delete(url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interface_query_rendering() {
        assert_eq!(interface_query(None), "");
        assert_eq!(interface_query(Some("")), "");
        assert_eq!(
            interface_query(Some("oic.if.baseline")),
            "?resourceInterface=oic.if.baseline"
        );
    }

    #[test]
    fn command_query_rendering() {
        assert_eq!(command_query(None, None), "");
        assert_eq!(command_query(None, Some(500_000_000)), "?timeToLive=500000000");
        assert_eq!(
            command_query(Some("oic.if.baseline"), Some(1_000_000_000)),
            "?timeToLive=1000000000&resourceInterface=oic.if.baseline"
        );
        assert_eq!(
            command_query(Some("oic.if.a"), None),
            "?resourceInterface=oic.if.a"
        );
    }
}
