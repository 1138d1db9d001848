//! # thingly-core
//!
//! Domain layer for the thingly device client: typed models, the
//! resource tree, notification routing, a reactive store, and the
//! [`Hub`] that ties them to a gateway connection.
//!
//! ```rust,ignore
//! use thingly_core::{Hub, HubConfig};
//!
//! let hub = Hub::new(HubConfig::new("https://127.0.0.1:8080")?)?;
//! hub.connect().await?;
//!
//! for device in hub.store().devices().iter() {
//!     println!("{} {}", device.id, device.display_name());
//! }
//!
//! let tree = hub.resource_tree("some-device-id").await?;
//! ```

pub mod config;
pub mod convert;
pub mod error;
pub mod hub;
pub mod model;
pub mod notify;
pub mod store;
pub mod stream;
pub mod tree;
pub mod ttl;

pub use config::{HubConfig, TlsVerification};
pub use error::CoreError;
pub use hub::{Hub, OnboardRequest, WriteOutcome};
pub use model::{
    Device, DeviceStatus, OnboardingStatus, OwnershipStatus, ProvisionStatus, Resource, Severity,
    ShadowSynchronization, provision_status_severity,
};
pub use notify::{ActiveNotifications, Notice, Topic};
pub use store::DataStore;
pub use stream::{DeviceSnapshot, DeviceStream};
pub use tree::{ResourceTreeNode, TreeError, build_resource_tree};
