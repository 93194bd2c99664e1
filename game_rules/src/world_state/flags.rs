//! Named boolean flags. A flag that was never set reads as false.

use std::collections::HashSet;

use super::observer::{ObserverList, SubscriptionId};

/// Notification emitted on every flag write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagChange {
    pub name: String,
    pub value: bool,
}

/// Store of flags, kept as the set of names that are currently true.
#[derive(Debug, Default)]
pub struct FlagStore {
    raised: HashSet<String>,
    observers: ObserverList<FlagChange>,
}

impl FlagStore {
    /// Create an empty flag store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a flag. Observers are notified even when the value does not change.
    pub fn set(&mut self, name: &str, value: bool) {
        if value {
            self.raised.insert(name.to_string());
        } else {
            self.raised.remove(name);
        }

        tracing::debug!(flag = %name, value, "Flag set");
        self.observers.notify(&FlagChange {
            name: name.to_string(),
            value,
        });
    }

    /// Read a flag; absent flags are false.
    pub fn get(&self, name: &str) -> bool {
        self.raised.contains(name)
    }

    /// Names of all flags that are currently true, sorted.
    pub fn raised(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.raised.iter().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Drop every flag without notifying.
    pub fn clear(&mut self) {
        self.raised.clear();
    }

    /// Subscribe to change notifications.
    pub fn subscribe(&mut self, callback: impl FnMut(&FlagChange) + 'static) -> SubscriptionId {
        self.observers.subscribe(callback)
    }

    /// Remove a change subscription.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_absent_flag_is_false() {
        let flags = FlagStore::new();
        assert!(!flags.get("hasMask"));
    }

    #[test]
    fn test_set_and_unset() {
        let mut flags = FlagStore::new();
        flags.set("hasMask", true);
        assert!(flags.get("hasMask"));

        flags.set("hasMask", false);
        assert!(!flags.get("hasMask"));
        assert!(flags.raised().is_empty());
    }

    #[test]
    fn test_notifies_on_every_set() {
        let changes = Rc::new(RefCell::new(Vec::new()));
        let mut flags = FlagStore::new();
        let sink = changes.clone();
        flags.subscribe(move |change: &FlagChange| sink.borrow_mut().push(change.clone()));

        flags.set("hasCar", true);
        flags.set("hasCar", true);
        flags.set("neverSet", false);

        assert_eq!(changes.borrow().len(), 3);
        assert_eq!(
            changes.borrow()[2],
            FlagChange {
                name: "neverSet".to_string(),
                value: false
            }
        );
    }
}
