//! Observer lists used by the stat and flag stores.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Handle returned when subscribing to a store's change notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubscriptionId(pub Uuid);

impl SubscriptionId {
    /// Create a new random subscription ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SubscriptionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

type Callback<E> = Box<dyn FnMut(&E)>;

/// Ordered list of change callbacks.
///
/// Callbacks run synchronously in subscription order. A callback only sees the
/// change value, never the store that emitted it, so it cannot mutate the store
/// or the list while a notification is in flight.
pub struct ObserverList<E> {
    observers: Vec<(SubscriptionId, Callback<E>)>,
}

impl<E> ObserverList<E> {
    /// Create an empty observer list.
    pub fn new() -> Self {
        Self {
            observers: Vec::new(),
        }
    }

    /// Register a callback; it will be notified after every earlier subscriber.
    pub fn subscribe(&mut self, callback: impl FnMut(&E) + 'static) -> SubscriptionId {
        let id = SubscriptionId::new();
        self.observers.push((id, Box::new(callback)));
        id
    }

    /// Remove a callback. Returns false if the handle was unknown.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(existing, _)| *existing != id);
        self.observers.len() != before
    }

    /// Deliver a change to every subscriber.
    pub fn notify(&mut self, change: &E) {
        for (_, callback) in self.observers.iter_mut() {
            callback(change);
        }
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

impl<E> Default for ObserverList<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> std::fmt::Debug for ObserverList<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObserverList")
            .field("subscribers", &self.observers.len())
            .finish()
    }
}
