//! Gateway hub: connection lifecycle, device/resource operations, and
//! the WebSocket event pump.
//!
//! The [`Hub`] owns the REST client, the reactive [`DataStore`], the
//! active-notification set, and (when enabled) a background task that
//! folds WebSocket events into the store and routes them onto topics
//! and notices.

use std::sync::Arc;

use serde_json::{Value, json};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use thingly_api::websocket::{EventStreamHandle, ReconnectConfig};
use thingly_api::{GatewayClient, GatewayCode, TlsMode, TransportConfig};

use crate::config::{HubConfig, TlsVerification};
use crate::error::CoreError;
use crate::model::resource::{cloud_config, dps_config, is_valid_dps_endpoint};
use crate::model::status::{OnboardingStatus, ProvisionStatus};
use crate::model::{Device, Resource, known_resource_types};
use crate::notify::{ActiveNotifications, Notice, Topic, route_event};
use crate::store::DataStore;
use crate::stream::DeviceStream;
use crate::tree::{ResourceTreeNode, build_resource_tree};

const NOTICE_CHANNEL_CAPACITY: usize = 256;
const TOPIC_CHANNEL_CAPACITY: usize = 1024;

/// How a resource write landed.
///
/// Writes to sleeping or slow devices don't fail outright: the gateway
/// queues them and reports a deadline or expiry, which callers usually
/// want to surface as a warning rather than an error.
#[derive(Debug, Clone, PartialEq)]
pub enum WriteOutcome {
    /// The device applied the write; its response is attached.
    Applied(Value),
    /// The device is offline; the gateway queued the write for when it
    /// comes back.
    PendingOnline,
    /// The command's time-to-live ran out before the device confirmed.
    Expired,
}

/// Fields written to the cloud configuration resource when onboarding
/// a device.
#[derive(Debug, Clone, Default)]
pub struct OnboardRequest {
    /// Cloud CoAP gateway address (`cis`).
    pub coap_gateway: String,
    /// Cloud authority identifier (`sid`).
    pub cloud_id: String,
    /// Authorization code (`at`).
    pub authorization_code: String,
    /// Authorization provider name (`apn`).
    pub authorization_provider: Option<String>,
}

struct HubInner {
    config: HubConfig,
    client: GatewayClient,
    store: DataStore,
    active: ActiveNotifications,
    notice_tx: broadcast::Sender<Notice>,
    topic_tx: broadcast::Sender<Topic>,
    cancel: CancellationToken,
    pump: std::sync::Mutex<Option<JoinHandle<()>>>,
}

/// Handle to one gateway. Cheap to clone; all clones share state.
#[derive(Clone)]
pub struct Hub {
    inner: Arc<HubInner>,
}

impl Hub {
    /// Build a hub for the configured gateway. No network traffic
    /// happens until [`connect`](Self::connect) or an operation runs.
    ///
    /// # Errors
    ///
    /// Fails when the HTTP client cannot be built, e.g. an unreadable
    /// custom CA bundle.
    pub fn new(config: HubConfig) -> Result<Self, CoreError> {
        let transport = TransportConfig {
            tls: match &config.tls {
                TlsVerification::System => TlsMode::System,
                TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
                TlsVerification::Insecure => TlsMode::DangerAcceptInvalid,
            },
            timeout: config.timeout(),
        };
        let client = GatewayClient::new(config.url.clone(), &transport)?;

        let (notice_tx, _) = broadcast::channel(NOTICE_CHANNEL_CAPACITY);
        let (topic_tx, _) = broadcast::channel(TOPIC_CHANNEL_CAPACITY);

        Ok(Self {
            inner: Arc::new(HubInner {
                config,
                client,
                store: DataStore::new(),
                active: ActiveNotifications::new(),
                notice_tx,
                topic_tx,
                cancel: CancellationToken::new(),
                pump: std::sync::Mutex::new(None),
            }),
        })
    }

    #[must_use]
    pub fn store(&self) -> &DataStore {
        &self.inner.store
    }

    #[must_use]
    pub fn notifications(&self) -> &ActiveNotifications {
        &self.inner.active
    }

    #[must_use]
    pub fn config(&self) -> &HubConfig {
        &self.inner.config
    }

    /// Subscribe to user-facing notices from the event pump.
    #[must_use]
    pub fn subscribe_notices(&self) -> broadcast::Receiver<Notice> {
        self.inner.notice_tx.subscribe()
    }

    /// Subscribe to keyed topics from the event pump.
    #[must_use]
    pub fn subscribe_topics(&self) -> broadcast::Receiver<Topic> {
        self.inner.topic_tx.subscribe()
    }

    /// Subscribe to device list changes.
    #[must_use]
    pub fn device_stream(&self) -> DeviceStream {
        DeviceStream::new(self.inner.store.subscribe_devices())
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Connect: load the device list and, when configured, start the
    /// WebSocket event pump.
    ///
    /// # Errors
    ///
    /// Fails when the initial device refresh fails; the pump is not
    /// started in that case.
    pub async fn connect(&self) -> Result<(), CoreError> {
        self.refresh_devices().await?;

        if self.inner.config.websocket {
            self.start_event_pump()?;
        }

        info!(
            url = %self.inner.config.url,
            devices = self.inner.store.device_count(),
            "connected to gateway"
        );
        Ok(())
    }

    /// Stop the event pump and drop the WebSocket.
    pub fn shutdown(&self) {
        self.inner.cancel.cancel();
        if let Ok(mut pump) = self.inner.pump.lock() {
            if let Some(handle) = pump.take() {
                handle.abort();
            }
        }
    }

    fn start_event_pump(&self) -> Result<(), CoreError> {
        let ws_url = self.inner.client.events_url()?;
        let events = EventStreamHandle::connect(
            ws_url,
            ReconnectConfig::default(),
            self.inner.cancel.child_token(),
        );

        let inner = Arc::clone(&self.inner);
        let handle = tokio::spawn(async move {
            let mut rx = events.subscribe();
            loop {
                tokio::select! {
                    biased;
                    () = inner.cancel.cancelled() => break,
                    event = rx.recv() => match event {
                        Ok(event) => {
                            inner.store.apply_event(&event);
                            let routed = route_event(&event, &inner.active);
                            for topic in routed.topics {
                                let _ = inner.topic_tx.send(topic);
                            }
                            for notice in routed.notices {
                                let _ = inner.notice_tx.send(notice);
                            }
                        }
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            warn!(skipped, "event pump lagged, events dropped");
                        }
                        Err(broadcast::error::RecvError::Closed) => break,
                    }
                }
            }
            debug!("event pump stopped");
        });

        if let Ok(mut pump) = self.inner.pump.lock() {
            *pump = Some(handle);
        }
        Ok(())
    }

    // ── Device operations ────────────────────────────────────────────

    /// Refresh the device list from the gateway, replacing the store.
    pub async fn refresh_devices(&self) -> Result<Arc<Vec<Arc<Device>>>, CoreError> {
        let summaries = self
            .inner
            .client
            .list_devices(Some(self.inner.config.discovery_timeout_ms))
            .await?;
        let devices: Vec<Device> = summaries.into_iter().map(Device::from).collect();
        debug!(count = devices.len(), "device refresh");
        self.inner.store.apply_devices(devices);
        Ok(self.inner.store.devices())
    }

    /// A single device, from the store or fetched on miss.
    pub async fn device(&self, device_id: &str) -> Result<Arc<Device>, CoreError> {
        if let Some(device) = self.inner.store.device(device_id) {
            return Ok(device);
        }
        let summary = self.inner.client.get_device(device_id).await.map_err(|e| {
            if e.is_not_found() {
                CoreError::DeviceNotFound {
                    identifier: device_id.to_owned(),
                }
            } else {
                e.into()
            }
        })?;
        self.inner.store.upsert_device(Device::from(summary));
        self.inner
            .store
            .device(device_id)
            .ok_or_else(|| CoreError::DeviceNotFound {
                identifier: device_id.to_owned(),
            })
    }

    /// Find a device by probing an IP address directly. The gateway
    /// answers with a list; an empty one means nothing at that address.
    pub async fn find_device_by_ip(&self, ip: &str) -> Result<Device, CoreError> {
        let mut summaries = self.inner.client.find_device_by_ip(ip).await?;
        if summaries.is_empty() {
            return Err(CoreError::DeviceNotFound {
                identifier: ip.to_owned(),
            });
        }
        let device = Device::from(summaries.remove(0));
        self.inner.store.upsert_device(device.clone());
        Ok(device)
    }

    /// Take ownership of an unowned device.
    pub async fn own_device(&self, device_id: &str) -> Result<(), CoreError> {
        self.inner.client.own_device(device_id).await?;
        self.inner.store.update_device(device_id, |d| {
            d.ownership = crate::model::status::OwnershipStatus::Owned;
        });
        Ok(())
    }

    /// Release ownership. The gateway forgets the device, so the store
    /// drops it too.
    pub async fn disown_device(&self, device_id: &str) -> Result<(), CoreError> {
        self.inner.client.disown_device(device_id).await?;
        self.inner.store.remove_device(device_id);
        Ok(())
    }

    /// Flush the gateway's device cache and this client's store.
    pub async fn flush_devices(&self) -> Result<(), CoreError> {
        self.inner.client.delete_devices().await?;
        self.inner.store.clear();
        Ok(())
    }

    // ── Resource operations ──────────────────────────────────────────

    /// Fetch a device's resource links, updating the store.
    pub async fn resource_links(&self, device_id: &str) -> Result<Vec<Resource>, CoreError> {
        let links = self.inner.client.list_resource_links(device_id).await?;
        let resources: Vec<Resource> = links.into_iter().map(Resource::from).collect();
        self.inner
            .store
            .apply_resource_links(device_id, resources.clone());
        Ok(resources)
    }

    /// Fetch a device's resource links and materialize them as a tree.
    pub async fn resource_tree(&self, device_id: &str) -> Result<Vec<ResourceTreeNode>, CoreError> {
        let resources = self.resource_links(device_id).await?;
        Ok(build_resource_tree(&resources)?)
    }

    /// Read one resource's representation.
    pub async fn read_resource(
        &self,
        device_id: &str,
        href: &str,
        resource_interface: Option<&str>,
    ) -> Result<Value, CoreError> {
        let rep = self
            .inner
            .client
            .get_resource(device_id, href, resource_interface)
            .await
            .map_err(|e| classify_resource_error(e, device_id, href))?;
        Ok(rep.content)
    }

    /// Write a resource representation. `ttl` is the command
    /// time-to-live in nanoseconds; `None` leaves the gateway default.
    pub async fn write_resource(
        &self,
        device_id: &str,
        href: &str,
        resource_interface: Option<&str>,
        ttl: Option<u64>,
        data: &Value,
    ) -> Result<WriteOutcome, CoreError> {
        let result = self
            .inner
            .client
            .update_resource(device_id, href, resource_interface, ttl, data)
            .await;
        classify_write(result, device_id, href)
    }

    /// Create a resource under a collection.
    pub async fn create_resource(
        &self,
        device_id: &str,
        href: &str,
        ttl: Option<u64>,
        data: &Value,
    ) -> Result<WriteOutcome, CoreError> {
        let result = self
            .inner
            .client
            .create_resource(device_id, href, ttl, data)
            .await;
        classify_write(result, device_id, href)
    }

    /// Delete a resource.
    pub async fn delete_resource(
        &self,
        device_id: &str,
        href: &str,
        ttl: Option<u64>,
    ) -> Result<WriteOutcome, CoreError> {
        let result = self.inner.client.delete_resource(device_id, href, ttl).await;
        classify_write(result, device_id, href)
    }

    // ── Cloud onboarding and provisioning ────────────────────────────

    /// Onboard a device by writing its cloud configuration resource.
    pub async fn onboard_device(
        &self,
        device_id: &str,
        request: &OnboardRequest,
    ) -> Result<WriteOutcome, CoreError> {
        let href = self
            .well_known_href(device_id, known_resource_types::OIC_R_COAP_CLOUD_CONF, cloud_config)
            .await?;
        let data = json!({
            "cis": request.coap_gateway,
            "sid": request.cloud_id,
            "at": request.authorization_code,
            "apn": request.authorization_provider.as_deref().unwrap_or(""),
        });
        self.write_resource(device_id, &href, None, None, &data).await
    }

    /// Offboard: blank out the cloud configuration.
    pub async fn offboard_device(&self, device_id: &str) -> Result<WriteOutcome, CoreError> {
        let href = self
            .well_known_href(device_id, known_resource_types::OIC_R_COAP_CLOUD_CONF, cloud_config)
            .await?;
        let data = json!({ "cis": "", "sid": "", "at": "", "apn": "" });
        self.write_resource(device_id, &href, None, None, &data).await
    }

    /// The device's cloud onboarding state, read from its cloud
    /// configuration resource.
    pub async fn onboarding_status(&self, device_id: &str) -> Result<OnboardingStatus, CoreError> {
        let href = self
            .well_known_href(device_id, known_resource_types::OIC_R_COAP_CLOUD_CONF, cloud_config)
            .await?;
        let content = self.read_resource(device_id, &href, None).await?;
        Ok(content
            .get("cps")
            .and_then(Value::as_str)
            .map_or(OnboardingStatus::NotAvailable, OnboardingStatus::parse))
    }

    /// Point the device's provisioning service configuration at a new
    /// endpoint.
    pub async fn set_dps_endpoint(
        &self,
        device_id: &str,
        endpoint: &str,
        ttl: Option<u64>,
    ) -> Result<WriteOutcome, CoreError> {
        if !is_valid_dps_endpoint(endpoint) {
            return Err(CoreError::ValidationFailed {
                message: format!("invalid provisioning endpoint {endpoint:?}"),
            });
        }
        let href = self
            .well_known_href(device_id, known_resource_types::X_PLGD_DPS_CONF, dps_config)
            .await?;
        self.write_resource(device_id, &href, None, ttl, &json!({ "endpoint": endpoint }))
            .await
    }

    /// The device's provisioning state, read from its provisioning
    /// service configuration resource.
    pub async fn provision_status(&self, device_id: &str) -> Result<ProvisionStatus, CoreError> {
        let href = self
            .well_known_href(device_id, known_resource_types::X_PLGD_DPS_CONF, dps_config)
            .await?;
        let content = self.read_resource(device_id, &href, None).await?;
        Ok(content
            .get("provisionStatus")
            .and_then(Value::as_str)
            .map_or(ProvisionStatus::Unknown, ProvisionStatus::parse))
    }

    /// Rename a device by writing its configuration resource.
    pub async fn rename_device(
        &self,
        device_id: &str,
        name: &str,
    ) -> Result<WriteOutcome, CoreError> {
        if name.trim().is_empty() {
            return Err(CoreError::ValidationFailed {
                message: "device name must not be empty".to_owned(),
            });
        }
        let href = self
            .well_known_href(
                device_id,
                known_resource_types::OIC_WK_CON,
                crate::model::resource::device_name_resource,
            )
            .await?;
        let outcome = self
            .write_resource(device_id, &href, None, None, &json!({ "n": name }))
            .await?;
        if matches!(outcome, WriteOutcome::Applied(_)) {
            self.inner
                .store
                .update_device(device_id, |d| d.name = Some(name.to_owned()));
        }
        Ok(outcome)
    }

    /// Find the href of a well-known resource, using cached links first
    /// and falling back to a fresh fetch.
    async fn well_known_href(
        &self,
        device_id: &str,
        resource_type: &'static str,
        find: impl Fn(&[Resource]) -> Option<&Resource>,
    ) -> Result<String, CoreError> {
        let cached = self.inner.store.resource_links(device_id);
        if let Some(resource) = find(&cached) {
            return Ok(resource.href.clone());
        }
        let fresh = self.resource_links(device_id).await?;
        find(&fresh)
            .map(|r| r.href.clone())
            .ok_or(CoreError::MissingWellKnownResource {
                device_id: device_id.to_owned(),
                resource_type,
            })
    }
}

/// Map gateway command errors onto write outcomes: deadline and expiry
/// are soft outcomes, invalid argument is the caller's mistake,
/// everything else propagates.
fn classify_write(
    result: Result<Value, thingly_api::Error>,
    device_id: &str,
    href: &str,
) -> Result<WriteOutcome, CoreError> {
    match result {
        Ok(value) => Ok(WriteOutcome::Applied(value)),
        Err(e) => match e.gateway_code() {
            Some(GatewayCode::DeadlineExceeded) => Ok(WriteOutcome::PendingOnline),
            Some(GatewayCode::CommandExpired) => Ok(WriteOutcome::Expired),
            Some(GatewayCode::InvalidArgument) => Err(CoreError::ValidationFailed {
                message: format!("gateway rejected data for {href}: {e}"),
            }),
            None => Err(classify_resource_error(e, device_id, href)),
        },
    }
}

fn classify_resource_error(e: thingly_api::Error, device_id: &str, href: &str) -> CoreError {
    if e.is_not_found() {
        CoreError::ResourceNotFound {
            device_id: device_id.to_owned(),
            href: href.to_owned(),
        }
    } else {
        e.into()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn hub() -> Hub {
        let mut config = HubConfig::new("https://127.0.0.1:8080").unwrap();
        config.websocket = false;
        Hub::new(config).unwrap()
    }

    #[test]
    fn write_outcome_classification() {
        let ok = classify_write(Ok(json!({"ok": true})), "d", "/r").unwrap();
        assert_eq!(ok, WriteOutcome::Applied(json!({"ok": true})));

        let pending = classify_write(
            Err(thingly_api::Error::Gateway {
                message: "rpc error: code = DeadlineExceeded".into(),
                status: 500,
            }),
            "d",
            "/r",
        )
        .unwrap();
        assert_eq!(pending, WriteOutcome::PendingOnline);

        let expired = classify_write(
            Err(thingly_api::Error::Gateway {
                message: "CommandExpired: ttl ran out".into(),
                status: 500,
            }),
            "d",
            "/r",
        )
        .unwrap();
        assert_eq!(expired, WriteOutcome::Expired);

        let invalid = classify_write(
            Err(thingly_api::Error::Gateway {
                message: "rpc error: code = InvalidArgument".into(),
                status: 400,
            }),
            "d",
            "/r",
        );
        assert!(matches!(invalid, Err(CoreError::ValidationFailed { .. })));
    }

    #[tokio::test]
    async fn rename_rejects_blank_names() {
        let hub = hub();
        let err = hub.rename_device("d", "   ").await.unwrap_err();
        assert!(matches!(err, CoreError::ValidationFailed { .. }));
    }

    #[tokio::test]
    async fn dps_endpoint_is_validated_before_any_io() {
        let hub = hub();
        let err = hub
            .set_dps_endpoint("d", "coaps://bad host", None)
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::ValidationFailed { .. }));
    }
}
