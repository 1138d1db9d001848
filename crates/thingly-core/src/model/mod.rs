//! Domain models shared across the crate.

pub mod device;
pub mod resource;
pub mod status;

pub use device::{Device, NO_DEVICE_NAME};
pub use resource::{Resource, known_interfaces, known_resource_types};
pub use status::{
    DeviceStatus, OnboardingStatus, OwnershipStatus, ProvisionStatus, Severity,
    ShadowSynchronization, provision_status_severity,
};
