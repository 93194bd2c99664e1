//! Named, bounded integer stats.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::observer::{ObserverList, SubscriptionId};

/// Inclusive bounds a stat value is clamped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatBounds {
    pub min: i64,
    pub max: i64,
}

impl StatBounds {
    /// Bounds for a stat that was registered without explicit limits.
    pub const UNBOUNDED: StatBounds = StatBounds {
        min: i64::MIN,
        max: i64::MAX,
    };

    /// Create bounds, swapping the ends if they were given in the wrong order.
    pub fn new(min: i64, max: i64) -> Self {
        if min > max {
            Self { min: max, max: min }
        } else {
            Self { min, max }
        }
    }

    /// Clamp a value into these bounds.
    pub fn clamp(&self, value: i64) -> i64 {
        value.clamp(self.min, self.max)
    }
}

impl Default for StatBounds {
    fn default() -> Self {
        Self::UNBOUNDED
    }
}

/// A registered stat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stat {
    pub name: String,
    pub value: i64,
    pub bounds: StatBounds,
}

/// Notification emitted whenever a stat is registered or set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatChange {
    pub name: String,
    /// None when the stat was just registered.
    pub old: Option<i64>,
    pub new: i64,
}

impl StatChange {
    /// Did the value go up?
    pub fn increased(&self) -> bool {
        self.old.is_some_and(|old| self.new > old)
    }
}

/// Store of named integer stats with clamping and change notification.
#[derive(Debug, Default)]
pub struct StatStore {
    stats: HashMap<String, Stat>,
    observers: ObserverList<StatChange>,
}

impl StatStore {
    /// Create an empty stat store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a stat. Does nothing if the name is already registered.
    ///
    /// Returns true if the stat was inserted.
    pub fn register(&mut self, name: impl Into<String>, initial: i64, bounds: StatBounds) -> bool {
        let name = name.into();
        if self.stats.contains_key(&name) {
            return false;
        }

        let value = bounds.clamp(initial);
        self.stats.insert(
            name.clone(),
            Stat {
                name: name.clone(),
                value,
                bounds,
            },
        );

        tracing::debug!(stat = %name, value, "Registered stat");
        self.observers.notify(&StatChange {
            name,
            old: None,
            new: value,
        });
        true
    }

    /// Register an unbounded stat starting at zero.
    pub fn register_default(&mut self, name: impl Into<String>) -> bool {
        self.register(name, 0, StatBounds::UNBOUNDED)
    }

    /// Remove a single stat.
    pub fn unregister(&mut self, name: &str) -> Option<Stat> {
        self.stats.remove(name)
    }

    /// Remove every stat. Observers stay subscribed.
    pub fn unregister_all(&mut self) {
        self.stats.clear();
    }

    /// Get a stat's value, or zero if it is not registered.
    pub fn get(&self, name: &str) -> i64 {
        self.try_get(name).unwrap_or(0)
    }

    /// Get a stat's value, distinguishing "not registered" from a stored zero.
    pub fn try_get(&self, name: &str) -> Option<i64> {
        self.stats.get(name).map(|stat| stat.value)
    }

    /// Get the full stat record.
    pub fn stat(&self, name: &str) -> Option<&Stat> {
        self.stats.get(name)
    }

    /// Is the name registered?
    pub fn contains(&self, name: &str) -> bool {
        self.stats.contains_key(name)
    }

    /// Set a stat's value, clamped to its bounds.
    ///
    /// Returns false without notifying if the stat is not registered.
    pub fn set(&mut self, name: &str, value: i64) -> bool {
        let Some(stat) = self.stats.get_mut(name) else {
            return false;
        };

        let old = stat.value;
        stat.value = stat.bounds.clamp(value);
        let new = stat.value;

        tracing::debug!(stat = %name, old, new, "Stat changed");
        self.observers.notify(&StatChange {
            name: name.to_string(),
            old: Some(old),
            new,
        });
        true
    }

    /// Names of all registered stats, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.stats.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.stats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stats.is_empty()
    }

    /// Subscribe to change notifications.
    pub fn subscribe(&mut self, callback: impl FnMut(&StatChange) + 'static) -> SubscriptionId {
        self.observers.subscribe(callback)
    }

    /// Remove a change subscription.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }
}
