// Device endpoints
//
// Listing, detail, deletion, discovery by IP, and ownership transfer.

use tracing::debug;

use crate::client::GatewayClient;
use crate::error::Error;
use crate::types::DeviceSummary;

impl GatewayClient {
    /// List all devices known to the gateway.
    ///
    /// `GET /api/v1/devices` — `discovery_timeout_ms` bounds how long the
    /// gateway spends discovering devices on the local network.
    pub async fn list_devices(
        &self,
        discovery_timeout_ms: Option<u64>,
    ) -> Result<Vec<DeviceSummary>, Error> {
        let suffix = match discovery_timeout_ms {
            Some(ms) => format!("?timeout={ms}"),
            None => String::new(),
        };
        let url = self.devices_url(&suffix)?;
        debug!("listing devices");
        self.get(url).await
    }

    /// Get a single device by id.
    ///
    /// `GET /api/v1/devices/{id}`
    pub async fn get_device(&self, device_id: &str) -> Result<DeviceSummary, Error> {
        let url = self.devices_url(&format!("/{device_id}"))?;
        self.get(url).await
    }

    /// Flush the gateway's device cache.
    ///
    /// `DELETE /api/v1/devices`
    pub async fn delete_devices(&self) -> Result<(), Error> {
        let url = self.devices_url("")?;
        debug!("deleting device cache");
        let _: serde_json::Value = self.delete(url).await?;
        Ok(())
    }

    /// Discover a device directly by IP address, bypassing multicast.
    ///
    /// `GET /api/v1/devices?useEndpoints={ip}`
    pub async fn find_device_by_ip(&self, ip: &str) -> Result<Vec<DeviceSummary>, Error> {
        let url = self.devices_url(&format!("?useEndpoints={ip}"))?;
        debug!(ip, "discovering device by IP");
        self.get(url).await
    }

    /// Take ownership of an unowned device.
    ///
    /// `POST /api/v1/devices/{id}/own`
    pub async fn own_device(&self, device_id: &str) -> Result<(), Error> {
        let url = self.devices_url(&format!("/{device_id}/own"))?;
        debug!(device_id, "owning device");
        let _: serde_json::Value = self.post(url, None::<&serde_json::Value>).await?;
        Ok(())
    }

    /// Release ownership of a device.
    ///
    /// `POST /api/v1/devices/{id}/disown`
    pub async fn disown_device(&self, device_id: &str) -> Result<(), Error> {
        let url = self.devices_url(&format!("/{device_id}/disown"))?;
        debug!(device_id, "disowning device");
        let _: serde_json::Value = self.post(url, None::<&serde_json::Value>).await?;
        Ok(())
    }
}
