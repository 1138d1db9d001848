//! Reactive storage for the client's view of the gateway.

mod collection;
mod data_store;

pub use data_store::{DataStore, DeviceResource};
