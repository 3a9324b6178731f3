// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde_json::{Map, Value};
use tokio::sync::broadcast;

use crate::config::consts::{LOGGING_KEY, RESERVED_KEYS, TEST_MODE_KEY, WATCH_CHANNEL_CAPACITY};
use crate::config::{load_settings, LoggingSettings};
use crate::errors::ConfigError;
use crate::observability::messages::config::{
    ConfigUpdated, ReservedKeysDropped, SubscriberFailed, SubscribersCleared, UpdateIgnored,
    UpdateReceived,
};
use crate::observability::messages::StructuredLog;

/// A set of changed keys, as passed to `update` and delivered to subscribers.
pub type ConfigDelta = Map<String, Value>;

/// Change callback. Returning an error stops notification of later subscribers.
pub type Subscriber = Arc<dyn Fn(&ConfigDelta) -> anyhow::Result<()> + Send + Sync>;

/// Identifies one subscription on a [`ConfigStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// What an `update` call did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// Nothing survived reserved-key stripping; the store was not touched.
    Ignored,
    /// The keys were merged and `notified` subscribers ran.
    Applied { keys: Vec<String>, notified: usize },
}

/// Shared settings with synchronous change notification.
///
/// Construct one at startup and share it as `Arc<ConfigStore>`.
///
/// # Updates
///
/// `update` drops the reserved keys (`update`, `subscribe`, `unsubscribe`),
/// shallow-merges what is left (nested values are replaced, not merged), and
/// calls every subscriber in registration order with the stripped delta.
///
/// Subscribers are snapshotted when notification starts: subscriptions added
/// or removed from inside a callback take effect on the next update. No lock
/// is held while callbacks run, so a callback may read the store, change
/// subscriptions, or call `update` again (the nested update notifies fully
/// before the outer notification continues).
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use serde_json::json;
/// use the_switchboard::config::{ConfigStore, Subscriber};
///
/// let store = ConfigStore::new();
/// let subscriber: Subscriber = Arc::new(|delta| {
///     println!("changed: {:?}", delta.keys().collect::<Vec<_>>());
///     Ok(())
/// });
/// store.subscribe(subscriber);
///
/// let delta = json!({"testMode": true}).as_object().cloned().unwrap();
/// store.update(delta)?;
/// assert!(store.test_mode());
/// # Ok::<(), the_switchboard::errors::ConfigError>(())
/// ```
pub struct ConfigStore {
    values: RwLock<ConfigDelta>,
    subscribers: Mutex<Vec<(SubscriptionId, Subscriber)>>,
    next_id: AtomicU64,
    changes: broadcast::Sender<ConfigDelta>,
}

impl ConfigStore {
    /// A store holding the defaults: `logging = {}`, `testMode = false`.
    pub fn new() -> Self {
        let mut values = Map::new();
        values.insert(LOGGING_KEY.to_string(), Value::Object(Map::new()));
        values.insert(TEST_MODE_KEY.to_string(), Value::Bool(false));

        let (changes, _) = broadcast::channel(WATCH_CHANNEL_CAPACITY);

        Self {
            values: RwLock::new(values),
            subscribers: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(1),
            changes,
        }
    }

    /// A store with defaults, updated with the settings in a YAML, JSON or TOML file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = load_settings(path)?;
        let store = Self::new();
        store.update(settings)?;
        Ok(store)
    }

    /// Merge `data` into the store and notify subscribers.
    ///
    /// A failing subscriber aborts notification of the ones after it and its
    /// error is returned; the merge itself is kept. `watch` receivers only
    /// see deltas whose notification completed.
    pub fn update(&self, mut data: ConfigDelta) -> Result<UpdateOutcome, ConfigError> {
        let span = UpdateReceived {
            key_count: data.len(),
        }
        .span("update");
        let _guard = span.enter();

        let dropped: Vec<&str> = RESERVED_KEYS
            .iter()
            .copied()
            .filter(|key| data.remove(*key).is_some())
            .collect();
        if !dropped.is_empty() {
            ReservedKeysDropped { keys: &dropped }.log();
        }

        if data.is_empty() {
            UpdateIgnored {
                dropped_keys: dropped.len(),
            }
            .log();
            return Ok(UpdateOutcome::Ignored);
        }

        {
            let mut values = self.write_values();
            for (key, value) in &data {
                values.insert(key.clone(), value.clone());
            }
        }

        let keys: Vec<String> = data.keys().cloned().collect();
        let subscribers = self.snapshot_subscribers();
        let total = subscribers.len();

        for (index, subscriber) in subscribers.iter().enumerate() {
            if let Err(source) = subscriber(&data) {
                SubscriberFailed {
                    index,
                    skipped: total - index - 1,
                    error: &*source,
                }
                .log();
                return Err(ConfigError::SubscriberFailed { index, source });
            }
        }

        // No receivers is not an error.
        let _ = self.changes.send(data);

        ConfigUpdated {
            keys: &keys,
            notified: total,
        }
        .log();

        Ok(UpdateOutcome::Applied {
            keys,
            notified: total,
        })
    }

    /// Append `subscriber`. The same callback may be registered more than once.
    pub fn subscribe(&self, subscriber: Subscriber) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.lock_subscribers().push((id, subscriber));
        id
    }

    /// Remove the first registration of `subscriber` (compared by `Arc` identity).
    ///
    /// Returns `false` when it was not subscribed.
    pub fn unsubscribe(&self, subscriber: &Subscriber) -> bool {
        let mut subscribers = self.lock_subscribers();
        match subscribers
            .iter()
            .position(|(_, existing)| same_subscriber(existing, subscriber))
        {
            Some(index) => {
                subscribers.remove(index);
                true
            }
            None => false,
        }
    }

    /// Remove the registration returned by `subscribe`.
    pub fn unsubscribe_id(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self.lock_subscribers();
        match subscribers.iter().position(|(existing, _)| *existing == id) {
            Some(index) => {
                subscribers.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.lock_subscribers().len()
    }

    /// Receive every applied delta asynchronously.
    ///
    /// Slow receivers lag past `WATCH_CHANNEL_CAPACITY` buffered deltas.
    pub fn watch(&self) -> broadcast::Receiver<ConfigDelta> {
        self.changes.subscribe()
    }

    /// Drop all subscribers. Returns how many were removed.
    pub fn shutdown(&self) -> usize {
        let count = {
            let mut subscribers = self.lock_subscribers();
            let count = subscribers.len();
            subscribers.clear();
            count
        };
        SubscribersCleared { count }.log();
        count
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.read_values().get(key).cloned()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.read_values().contains_key(key)
    }

    /// Copy of every current key and value.
    pub fn snapshot(&self) -> ConfigDelta {
        self.read_values().clone()
    }

    pub fn test_mode(&self) -> bool {
        self.get(TEST_MODE_KEY)
            .and_then(|value| value.as_bool())
            .unwrap_or(false)
    }

    pub fn logging(&self) -> Value {
        self.get(LOGGING_KEY)
            .unwrap_or_else(|| Value::Object(Map::new()))
    }

    /// The `logging` entry parsed as [`LoggingSettings`].
    pub fn logging_settings(&self) -> Result<LoggingSettings, ConfigError> {
        LoggingSettings::from_value(&self.logging())
    }

    fn snapshot_subscribers(&self) -> Vec<Subscriber> {
        self.lock_subscribers()
            .iter()
            .map(|(_, subscriber)| subscriber.clone())
            .collect()
    }

    // Callbacks never run under these locks; a poisoned lock still guards
    // consistent data.
    fn lock_subscribers(&self) -> MutexGuard<'_, Vec<(SubscriptionId, Subscriber)>> {
        self.subscribers.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn read_values(&self) -> RwLockReadGuard<'_, ConfigDelta> {
        self.values.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_values(&self) -> RwLockWriteGuard<'_, ConfigDelta> {
        self.values.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ConfigStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigStore")
            .field("values", &*self.read_values())
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

fn same_subscriber(a: &Subscriber, b: &Subscriber) -> bool {
    Arc::as_ptr(a) as *const () == Arc::as_ptr(b) as *const ()
}
