//! The set of notification keys the user has switched on.

use dashmap::DashSet;

/// Concurrent set of active notification keys.
///
/// Shared between the event pump (reads) and whatever surface lets the
/// user toggle notifications (writes). Cloning is cheap-ish and all
/// methods take `&self`.
#[derive(Debug, Default)]
pub struct ActiveNotifications {
    keys: DashSet<String>,
}

impl ActiveNotifications {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether notices for this key should be surfaced.
    #[must_use]
    pub fn is_active(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    /// Flip a key's membership. Returns the new state.
    pub fn toggle(&self, key: impl Into<String>) -> bool {
        let key = key.into();
        if self.keys.remove(&key).is_some() {
            false
        } else {
            self.keys.insert(key);
            true
        }
    }

    /// Switch a key on or off explicitly.
    pub fn set(&self, key: impl Into<String>, active: bool) {
        let key = key.into();
        if active {
            self.keys.insert(key);
        } else {
            self.keys.remove(&key);
        }
    }

    pub fn clear(&self) {
        self.keys.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Snapshot of the active keys, sorted for stable output.
    #[must_use]
    pub fn snapshot(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.keys.iter().map(|k| k.clone()).collect();
        keys.sort();
        keys
    }
}
