// thingly-api: Async Rust client for the device gateway (REST + WebSocket)

pub mod client;
pub mod devices;
pub mod error;
pub mod resources;
pub mod transport;
pub mod types;
pub mod websocket;

pub use client::GatewayClient;
pub use error::{Error, GatewayCode};
pub use transport::{TlsMode, TransportConfig};
pub use types::{
    DeviceMetadata, DeviceMetadataUpdated, DeviceIds, DeviceSummary, EndpointInformation,
    GatewayEvent, ResourceChanged, ResourceContent, ResourceLink, ResourcePublished,
    ResourceUnpublished, StatusValue,
};
pub use websocket::{EventStreamHandle, ReconnectConfig};
