use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use dashmap::DashMap;

use crate::transport::InboundEvent;

/// Receives every decoded inbound envelope after the session applied it.
///
/// Listeners must ignore message types they do not handle.
pub trait EnvelopeListener: Send + Sync {
    fn on_inbound(&self, event: &InboundEvent);
}

/// Registry of inbound listeners, keyed by registration order.
#[derive(Default)]
pub struct ListenerRegistry {
    listeners: DashMap<u64, Arc<dyn EnvelopeListener>>,
    seq: AtomicU64,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self {
            listeners: DashMap::new(),
            seq: AtomicU64::new(1),
        }
    }

    /// Register a listener. Dropping the returned `Subscription` removes it.
    pub fn subscribe(self: &Arc<Self>, listener: Arc<dyn EnvelopeListener>) -> Subscription {
        let id = self.seq.fetch_add(1, Ordering::Relaxed);
        self.listeners.insert(id, listener);
        tracing::trace!(listener_id = id, "listener subscribed");
        Subscription {
            id,
            registry: Arc::downgrade(self),
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Deliver to a snapshot of listeners, oldest first. No shard lock is
    /// held while listeners run, so they may subscribe or unsubscribe.
    pub fn deliver(&self, event: &InboundEvent) {
        let mut snapshot: Vec<(u64, Arc<dyn EnvelopeListener>)> = self
            .listeners
            .iter()
            .map(|e| (*e.key(), Arc::clone(e.value())))
            .collect();
        snapshot.sort_by_key(|(id, _)| *id);

        for (_, listener) in snapshot {
            listener.on_inbound(event);
        }
    }

    fn remove(&self, id: u64) {
        if self.listeners.remove(&id).is_some() {
            tracing::trace!(listener_id = id, "listener unsubscribed");
        }
    }
}

/// Unsubscribe handle returned by `ListenerRegistry::subscribe`.
pub struct Subscription {
    id: u64,
    registry: Weak<ListenerRegistry>,
}

impl Subscription {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Explicit unsubscribe; same as dropping the handle.
    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.remove(self.id);
        }
    }
}
