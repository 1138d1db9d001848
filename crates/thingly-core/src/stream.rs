//! Reactive device-list subscription.
//!
//! The store publishes whole-list snapshots through a watch channel;
//! [`DeviceStream`] wraps a receiver so a consumer can await changes or
//! drive the snapshots with `Stream` combinators.

use std::sync::Arc;

use futures_core::Stream;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use crate::model::Device;

/// One published state of the device list, sorted by device id.
pub type DeviceSnapshot = Arc<Vec<Arc<Device>>>;

/// Subscription to device-list changes.
pub struct DeviceStream {
    receiver: watch::Receiver<DeviceSnapshot>,
}

impl DeviceStream {
    pub(crate) fn new(receiver: watch::Receiver<DeviceSnapshot>) -> Self {
        Self { receiver }
    }

    /// The most recent snapshot, without waiting.
    #[must_use]
    pub fn latest(&self) -> DeviceSnapshot {
        self.receiver.borrow().clone()
    }

    /// Wait for the next change and return the new snapshot. Returns
    /// `None` once the store has been dropped.
    pub async fn changed(&mut self) -> Option<DeviceSnapshot> {
        self.receiver.changed().await.ok()?;
        Some(self.receiver.borrow_and_update().clone())
    }

    /// Adapt into a `Stream` of snapshots. The current snapshot is
    /// yielded first, then one item per store mutation.
    #[must_use]
    pub fn into_stream(self) -> impl Stream<Item = DeviceSnapshot> {
        WatchStream::new(self.receiver)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tokio_stream::StreamExt;

    use super::*;
    use crate::store::DataStore;

    fn device(id: &str) -> Device {
        Device {
            id: id.into(),
            ..Device::default()
        }
    }

    #[tokio::test]
    async fn changed_yields_store_mutations() {
        let store = DataStore::new();
        let mut stream = DeviceStream::new(store.subscribe_devices());
        assert!(stream.latest().is_empty());

        store.upsert_device(device("d1"));
        let snap = stream.changed().await.unwrap();
        assert_eq!(snap.len(), 1);
        assert_eq!(snap[0].id, "d1");

        store.remove_device("d1");
        let snap = stream.changed().await.unwrap();
        assert!(snap.is_empty());

        drop(store);
        assert!(stream.changed().await.is_none());
    }

    #[tokio::test]
    async fn stream_adapter_starts_with_current_snapshot() {
        let store = DataStore::new();
        store.upsert_device(device("d1"));

        let stream = DeviceStream::new(store.subscribe_devices());
        let mut stream = std::pin::pin!(stream.into_stream());

        let first = stream.next().await.unwrap();
        assert_eq!(first[0].id, "d1");

        store.upsert_device(device("d2"));
        let second = stream.next().await.unwrap();
        assert_eq!(second.len(), 2);
    }
}
