// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::events::ERROR_EVENT;
use crate::observability::messages::{relay::UnhandledErrorEvent, StructuredLog};
use crate::traits::{Emitter, Listener, ListenerId, Payload};

struct Registration {
    id: ListenerId,
    listener: Listener,
    once: bool,
}

/// In-process [`Emitter`] with per-event listener lists.
///
/// Emission takes a snapshot of the listeners for the event, releases the
/// lock, and then calls them in registration order. Listeners added during an
/// emission are not called for that emission; listeners removed during an
/// emission still are.
pub struct EventEmitter {
    name: String,
    listeners: Mutex<HashMap<String, Vec<Registration>>>,
    next_id: AtomicU64,
}

impl EventEmitter {
    /// Create an emitter. `name` only appears in log output.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            listeners: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Register `listener` for the next emission of `event` only.
    pub fn once(&self, event: &str, listener: Listener) -> ListenerId {
        self.register(event, listener, true)
    }

    /// Remove every listener for `event`, or for all events when `None`.
    ///
    /// Returns the number of registrations removed.
    pub fn remove_all_listeners(&self, event: Option<&str>) -> usize {
        let mut listeners = self.lock();
        match event {
            Some(event) => listeners.remove(event).map(|regs| regs.len()).unwrap_or(0),
            None => listeners.drain().map(|(_, regs)| regs.len()).sum(),
        }
    }

    /// Names of events with at least one listener, sorted.
    pub fn event_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .lock()
            .iter()
            .filter(|(_, regs)| !regs.is_empty())
            .map(|(name, _)| name.clone())
            .collect();
        names.sort();
        names
    }

    fn register(&self, event: &str, listener: Listener, once: bool) -> ListenerId {
        let id = ListenerId::new(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.lock()
            .entry(event.to_string())
            .or_default()
            .push(Registration { id, listener, once });
        id
    }

    // Listeners never run under this lock, so poisoning only means a panic
    // happened mid-bookkeeping; the map itself is still consistent.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, Vec<Registration>>> {
        self.listeners.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn snapshot(&self, event: &str) -> Vec<Listener> {
        let mut listeners = self.lock();
        let Some(regs) = listeners.get_mut(event) else {
            return Vec::new();
        };

        let snapshot = regs.iter().map(|reg| reg.listener.clone()).collect();
        regs.retain(|reg| !reg.once);
        if regs.is_empty() {
            listeners.remove(event);
        }
        snapshot
    }
}

impl Default for EventEmitter {
    fn default() -> Self {
        Self::new("emitter")
    }
}

impl fmt::Debug for EventEmitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventEmitter")
            .field("name", &self.name)
            .field("events", &self.event_names())
            .finish()
    }
}

impl Emitter for EventEmitter {
    fn on(&self, event: &str, listener: Listener) -> ListenerId {
        self.register(event, listener, false)
    }

    fn remove_listener(&self, event: &str, id: ListenerId) -> bool {
        let mut listeners = self.lock();
        let Some(regs) = listeners.get_mut(event) else {
            return false;
        };

        let before = regs.len();
        regs.retain(|reg| reg.id != id);
        let removed = regs.len() != before;
        if regs.is_empty() {
            listeners.remove(event);
        }
        removed
    }

    fn emit(&self, event: &str, args: &[Payload]) -> bool {
        let listeners = self.snapshot(event);

        if listeners.is_empty() {
            if event == ERROR_EVENT {
                UnhandledErrorEvent {
                    emitter: &self.name,
                    error: args.first(),
                }
                .log();
            }
            return false;
        }

        for listener in listeners {
            listener(args);
        }
        true
    }

    fn listener_count(&self, event: &str) -> usize {
        self.lock().get(event).map(Vec::len).unwrap_or(0)
    }
}
