use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

/// Called with the key that changed.
type Callback = Arc<dyn Fn(&str) + Send + Sync>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    callbacks: BTreeMap<u64, Callback>,
}

struct Entries<V> {
    version: u64,
    values: BTreeMap<String, V>,
}

/// A point-in-time copy of a [`LocalStore`].
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot<V> {
    /// Bumped on every write.
    pub version: u64,
    pub values: BTreeMap<String, V>,
}

/// An observable key-value cache.
///
/// Writes notify every live subscriber with the changed key; subscribers pull
/// whatever they need through [`get`](Self::get) or [`snapshot`](Self::snapshot).
/// Clones share the same entries and subscribers.
pub struct LocalStore<V> {
    entries: Arc<Mutex<Entries<V>>>,
    registry: Arc<Mutex<Registry>>,
}

impl<V> Clone for LocalStore<V> {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
            registry: Arc::clone(&self.registry),
        }
    }
}

impl<V> Default for LocalStore<V> {
    fn default() -> Self {
        Self {
            entries: Arc::new(Mutex::new(Entries {
                version: 0,
                values: BTreeMap::new(),
            })),
            registry: Arc::default(),
        }
    }
}

/// A poisoned lock only means a callback panicked elsewhere; the data is intact.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<V: Clone> LocalStore<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<V> {
        lock(&self.entries).values.get(key).cloned()
    }

    pub fn set(&self, key: impl Into<String>, value: V) {
        let key = key.into();
        {
            let mut entries = lock(&self.entries);
            entries.values.insert(key.clone(), value);
            entries.version += 1;
        }
        self.notify(&key);
    }

    /// Remove a key, returning its value. Subscribers are only notified if
    /// the key was present.
    pub fn remove(&self, key: &str) -> Option<V> {
        let removed = {
            let mut entries = lock(&self.entries);
            let removed = entries.values.remove(key);
            if removed.is_some() {
                entries.version += 1;
            }
            removed
        };
        if removed.is_some() {
            self.notify(key);
        }
        removed
    }

    pub fn snapshot(&self) -> Snapshot<V> {
        let entries = lock(&self.entries);
        Snapshot {
            version: entries.version,
            values: entries.values.clone(),
        }
    }

    /// Register a callback for every subsequent change. It stays registered
    /// until the returned handle is dropped.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe(&self, callback: impl Fn(&str) + Send + Sync + 'static) -> Subscription {
        let mut registry = lock(&self.registry);
        let id = registry.next_id;
        registry.next_id += 1;
        registry.callbacks.insert(id, Arc::new(callback));
        Subscription {
            registry: Arc::downgrade(&self.registry),
            id,
        }
    }

    pub fn subscriber_count(&self) -> usize {
        lock(&self.registry).callbacks.len()
    }

    fn notify(&self, key: &str) {
        // Call outside the lock so callbacks may read the store or subscribe.
        let callbacks: Vec<Callback> = lock(&self.registry).callbacks.values().cloned().collect();
        for callback in callbacks {
            callback(key);
        }
    }
}

/// Keeps a [`LocalStore`] callback registered while alive.
pub struct Subscription {
    registry: Weak<Mutex<Registry>>,
    id: u64,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            lock(&registry).callbacks.remove(&self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn reads_and_writes() {
        let store = LocalStore::new();
        assert_eq!(store.get("a"), None);

        store.set("a", 1);
        store.set("b", 2);
        store.set("a", 3);
        assert_eq!(store.get("a"), Some(3));

        let snapshot = store.snapshot();
        assert_eq!(snapshot.version, 3);
        assert_eq!(snapshot.values.len(), 2);

        assert_eq!(store.remove("b"), Some(2));
        assert_eq!(store.remove("b"), None);
        assert_eq!(store.snapshot().version, 4);
    }

    #[test]
    fn subscribers_hear_changes_until_dropped() {
        let store = LocalStore::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let log = Arc::clone(&seen);
        let subscription = store.subscribe(move |key| log.lock().unwrap().push(key.to_string()));
        let count = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&count);
        let _other = store.subscribe(move |_| {
            counter.fetch_add(1, Ordering::Relaxed);
        });
        assert_eq!(store.subscriber_count(), 2);

        store.set("m1", "yes");
        store.remove("missing");
        store.clone().remove("m1");
        assert_eq!(*seen.lock().unwrap(), vec!["m1", "m1"]);

        drop(subscription);
        assert_eq!(store.subscriber_count(), 1);
        store.set("m2", "no");
        assert_eq!(seen.lock().unwrap().len(), 2);
        assert_eq!(count.load(Ordering::Relaxed), 3);
    }

    #[test]
    fn callbacks_may_read_the_store() {
        let store = LocalStore::new();
        let reader = store.clone();
        let last = Arc::new(Mutex::new(None));
        let sink = Arc::clone(&last);
        let _subscription = store.subscribe(move |key| {
            *sink.lock().unwrap() = reader.get(key);
        });

        store.set("note", "bring ID".to_string());
        assert_eq!(last.lock().unwrap().as_deref(), Some("bring ID"));
    }

    #[test]
    fn subscription_outliving_store() {
        let store: LocalStore<u8> = LocalStore::new();
        let subscription = store.subscribe(|_| {});
        drop(store);
        drop(subscription);
    }
}
