//! Listener registry
//!
//! Maps an event type to an ordered list of callbacks. Dispatch takes a
//! snapshot of the callbacks and releases the lock before invoking them, so
//! a callback may register or unregister listeners (including itself)
//! without deadlocking.

use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, Weak};

/// Callback invoked with a frame's `data`
pub type Callback = Arc<dyn Fn(&Value) + Send + Sync>;

struct Entry {
    id: u64,
    callback: Callback,
}

/// Event type -> callbacks, in registration order
#[derive(Default)]
pub struct ListenerRegistry {
    next_id: AtomicU64,
    slots: Mutex<HashMap<String, Vec<Entry>>>,
}

impl ListenerRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    fn slots(&self) -> MutexGuard<'_, HashMap<String, Vec<Entry>>> {
        // Callbacks never run under this lock, so poisoning only means a
        // panic inside one of our own short critical sections
        self.slots.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Append a callback for `event_type`, returning its id
    pub fn add(&self, event_type: &str, callback: Callback) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.slots()
            .entry(event_type.to_string())
            .or_default()
            .push(Entry { id, callback });
        id
    }

    /// Make `callback` the only listener for `event_type`, returning its id
    pub fn replace(&self, event_type: &str, callback: Callback) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.slots()
            .insert(event_type.to_string(), vec![Entry { id, callback }]);
        id
    }

    /// Remove one callback; returns false if it was already gone
    pub fn remove(&self, event_type: &str, id: u64) -> bool {
        let mut slots = self.slots();
        let Some(entries) = slots.get_mut(event_type) else {
            return false;
        };
        let before = entries.len();
        entries.retain(|entry| entry.id != id);
        let removed = entries.len() != before;
        if entries.is_empty() {
            slots.remove(event_type);
        }
        removed
    }

    /// Remove every callback for `event_type`
    pub fn remove_all(&self, event_type: &str) {
        self.slots().remove(event_type);
    }

    /// Remove every callback for every event type
    pub fn clear(&self) {
        self.slots().clear();
    }

    /// Number of callbacks registered for `event_type`
    pub fn count(&self, event_type: &str) -> usize {
        self.slots().get(event_type).map_or(0, Vec::len)
    }

    /// Invoke every callback for `event_type` with `data`, in registration
    /// order. Returns how many callbacks ran.
    pub fn dispatch(&self, event_type: &str, data: &Value) -> usize {
        let callbacks: Vec<Callback> = match self.slots().get(event_type) {
            Some(entries) => entries.iter().map(|e| e.callback.clone()).collect(),
            None => return 0,
        };
        for callback in &callbacks {
            callback(data);
        }
        callbacks.len()
    }
}

/// Handle to one registered callback
///
/// Dropping the handle leaves the callback registered; call
/// [`Subscription::unsubscribe`] to remove it.
pub struct Subscription {
    event_type: String,
    id: u64,
    registry: Weak<ListenerRegistry>,
}

impl Subscription {
    pub(crate) fn new(event_type: &str, id: u64, registry: &Arc<ListenerRegistry>) -> Self {
        Self {
            event_type: event_type.to_string(),
            id,
            registry: Arc::downgrade(registry),
        }
    }

    /// Event type this subscription listens to
    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    /// Remove this callback
    ///
    /// Returns false if it had already been removed (by `off`, by a
    /// replacing `on`, or because the stream was dropped).
    pub fn unsubscribe(&self) -> bool {
        match self.registry.upgrade() {
            Some(registry) => registry.remove(&self.event_type, self.id),
            None => false,
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("event_type", &self.event_type)
            .field("id", &self.id)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::AtomicUsize;

    fn recorder(log: &Arc<Mutex<Vec<String>>>, name: &'static str) -> Callback {
        let log = log.clone();
        Arc::new(move |data: &Value| log.lock().unwrap().push(format!("{}:{}", name, data)))
    }

    #[test]
    fn test_dispatch_in_registration_order() {
        let registry = ListenerRegistry::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        registry.add("message", recorder(&log, "a"));
        registry.add("message", recorder(&log, "b"));
        registry.add("heartbeat", recorder(&log, "h"));

        assert_eq!(registry.dispatch("message", &json!(1)), 2);
        assert_eq!(*log.lock().unwrap(), vec!["a:1", "b:1"]);
    }

    #[test]
    fn test_replace_drops_previous_callbacks() {
        let registry = ListenerRegistry::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        registry.add("message", recorder(&log, "a"));
        registry.replace("message", recorder(&log, "b"));

        registry.dispatch("message", &json!("x"));
        assert_eq!(*log.lock().unwrap(), vec![r#"b:"x""#]);
    }

    #[test]
    fn test_remove_single_callback() {
        let registry = ListenerRegistry::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        let a = registry.add("message", recorder(&log, "a"));
        registry.add("message", recorder(&log, "b"));

        assert!(registry.remove("message", a));
        assert!(!registry.remove("message", a));
        registry.dispatch("message", &json!(2));
        assert_eq!(*log.lock().unwrap(), vec!["b:2"]);
    }

    #[test]
    fn test_unregister_from_inside_callback() {
        let registry = Arc::new(ListenerRegistry::new());
        let calls = Arc::new(AtomicUsize::new(0));
        let id_cell = Arc::new(AtomicU64::new(u64::MAX));

        let callback: Callback = {
            let registry = Arc::downgrade(&registry);
            let calls = calls.clone();
            let id_cell = id_cell.clone();
            Arc::new(move |_: &Value| {
                calls.fetch_add(1, Ordering::SeqCst);
                if let Some(registry) = registry.upgrade() {
                    registry.remove("message", id_cell.load(Ordering::SeqCst));
                }
            })
        };
        id_cell.store(registry.add("message", callback), Ordering::SeqCst);

        registry.dispatch("message", &Value::Null);
        registry.dispatch("message", &Value::Null);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(registry.count("message"), 0);
    }

    #[test]
    fn test_subscription_outliving_registry() {
        let registry = Arc::new(ListenerRegistry::new());
        let id = registry.add("message", Arc::new(|_: &Value| {}));
        let subscription = Subscription::new("message", id, &registry);
        drop(registry);
        assert!(!subscription.unsubscribe());
    }
}
