//! Snapshot subscribers
//!
//! Listeners are called synchronously, in registration order, with every
//! published snapshot. A panicking listener is logged and skipped; the
//! remaining listeners still see the snapshot.

use crate::types::PlaybackSnapshot;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Mutex, PoisonError, Weak};
use tracing::warn;

/// Snapshot callback
pub type Listener = Arc<dyn Fn(&PlaybackSnapshot) + Send + Sync>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    entries: Vec<(u64, Listener)>,
}

/// Ordered listener list shared with outstanding subscriptions
#[derive(Default)]
pub struct ListenerRegistry {
    inner: Arc<Mutex<Registry>>,
}

impl ListenerRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener
    pub fn add<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&PlaybackSnapshot) + Send + Sync + 'static,
    {
        let mut registry = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        let id = registry.next_id;
        registry.next_id += 1;
        registry.entries.push((id, Arc::new(listener)));

        Subscription {
            id,
            registry: Arc::downgrade(&self.inner),
        }
    }

    /// Number of registered listeners
    pub fn len(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .len()
    }

    /// Check if no listener is registered
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Deliver a snapshot to every listener
    ///
    /// The list is copied first so listeners may subscribe or unsubscribe from
    /// inside the callback.
    pub fn notify(&self, snapshot: &PlaybackSnapshot) {
        let listeners: Vec<Listener> = self
            .inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .iter()
            .map(|(_, l)| Arc::clone(l))
            .collect();

        for (position, listener) in listeners.iter().enumerate() {
            if catch_unwind(AssertUnwindSafe(|| listener(snapshot))).is_err() {
                warn!(listener = position, "Playback listener panicked");
            }
        }
    }
}

/// Handle returned by [`ListenerRegistry::add`]
///
/// Dropping the handle keeps the listener registered; call
/// [`Subscription::unsubscribe`] to remove it.
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    registry: Weak<Mutex<Registry>>,
}

impl Subscription {
    /// Remove the listener
    ///
    /// Returns false if it was already gone (or the engine was dropped)
    pub fn unsubscribe(self) -> bool {
        let Some(registry) = self.registry.upgrade() else {
            return false;
        };
        let mut registry = registry.lock().unwrap_or_else(PoisonError::into_inner);
        let before = registry.entries.len();
        registry.entries.retain(|(id, _)| *id != self.id);
        registry.entries.len() != before
    }
}
