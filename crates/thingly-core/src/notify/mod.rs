//! Notification keys, the active-key set, and event routing.

pub mod active;
pub mod keys;
pub mod router;

pub use active::ActiveNotifications;
pub use keys::{
    DEVICES_RESOURCE_REGISTRATION_KEY, DEVICES_RESOURCE_UPDATE_KEY, DEVICES_STATUS_KEY,
    REGISTERED_UNREGISTERED_COUNT_KEY, device_key, device_status_key,
    resource_registration_event_key, resource_registration_key, resource_update_key,
};
pub use router::{Notice, ResourceEventType, Routed, Topic, route_event};
