// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt;
use std::sync::Arc;

use crate::events::{ERROR_EVENT, UPDATE_EVENT};
use crate::observability::messages::relay::{RelayCancelled, RelayDefined};
use crate::observability::messages::StructuredLog;
use crate::traits::{Emitter, Listener, ListenerId, Payload};

/// Which event to relay, under what name, and whether to follow it with `"update"`.
///
/// Converts from a bare event name, so host methods accept either form:
///
/// ```rust
/// use the_switchboard::events::EventSpec;
///
/// let plain: EventSpec = "data".into();
/// assert_eq!(plain.target_event_name(), "data");
///
/// let renamed = EventSpec::new("data").rename("reading").send_update(true);
/// assert_eq!(renamed.target_event_name(), "reading");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventSpec {
    pub event_name: String,
    pub target_event_name: Option<String>,
    pub send_update: bool,
}

impl EventSpec {
    pub fn new(event_name: impl Into<String>) -> Self {
        Self {
            event_name: event_name.into(),
            target_event_name: None,
            send_update: false,
        }
    }

    /// Re-emit under `target_event_name` instead of the source event name.
    pub fn rename(mut self, target_event_name: impl Into<String>) -> Self {
        self.target_event_name = Some(target_event_name.into());
        self
    }

    /// Also emit `"update"` with `[target_event_name, ...args]` after each relay.
    pub fn send_update(mut self, send_update: bool) -> Self {
        self.send_update = send_update;
        self
    }

    /// Name the target emits, falling back to the source event name.
    pub fn target_event_name(&self) -> &str {
        self.target_event_name.as_deref().unwrap_or(&self.event_name)
    }
}

impl From<&str> for EventSpec {
    fn from(event_name: &str) -> Self {
        Self::new(event_name)
    }
}

impl From<String> for EventSpec {
    fn from(event_name: String) -> Self {
        Self::new(event_name)
    }
}

/// A complete relay definition: the event spec plus both emitters.
///
/// Source and target are required by the constructor; everything else has a
/// default (no rename, no `"update"`).
#[derive(Clone)]
pub struct RelayOptions {
    pub spec: EventSpec,
    pub source: Arc<dyn Emitter>,
    pub target: Arc<dyn Emitter>,
}

impl RelayOptions {
    pub fn new(
        event_name: impl Into<String>,
        source: Arc<dyn Emitter>,
        target: Arc<dyn Emitter>,
    ) -> Self {
        Self::from_spec(EventSpec::new(event_name), source, target)
    }

    pub fn from_spec(spec: EventSpec, source: Arc<dyn Emitter>, target: Arc<dyn Emitter>) -> Self {
        Self {
            spec,
            source,
            target,
        }
    }

    pub fn rename(mut self, target_event_name: impl Into<String>) -> Self {
        self.spec = self.spec.rename(target_event_name);
        self
    }

    pub fn send_update(mut self, send_update: bool) -> Self {
        self.spec = self.spec.send_update(send_update);
        self
    }
}

impl fmt::Debug for RelayOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RelayOptions")
            .field("spec", &self.spec)
            .finish_non_exhaustive()
    }
}

/// Registration created by [`define_event`].
///
/// The relay stays active until [`RelayHandle::cancel`] is called; dropping
/// the handle leaves it registered for the life of the source.
#[must_use = "dropping the handle keeps the relay registered; call `cancel` to remove it"]
pub struct RelayHandle {
    source: Arc<dyn Emitter>,
    event_name: String,
    target_event_name: String,
    listener: ListenerId,
}

impl RelayHandle {
    /// The emitter being listened to, for chaining further registrations.
    pub fn source(&self) -> &Arc<dyn Emitter> {
        &self.source
    }

    pub fn event_name(&self) -> &str {
        &self.event_name
    }

    pub fn target_event_name(&self) -> &str {
        &self.target_event_name
    }

    pub fn listener_id(&self) -> ListenerId {
        self.listener
    }

    /// Remove the relay listener from its source.
    ///
    /// Returns `false` if the listener had already been removed by other means.
    pub fn cancel(self) -> bool {
        let removed = self.source.remove_listener(&self.event_name, self.listener);
        RelayCancelled {
            source_event: &self.event_name,
            target_event: &self.target_event_name,
            removed,
        }
        .log();
        removed
    }
}

impl fmt::Debug for RelayHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RelayHandle")
            .field("event_name", &self.event_name)
            .field("target_event_name", &self.target_event_name)
            .field("listener", &self.listener)
            .finish_non_exhaustive()
    }
}

/// Relay every firing of `spec.event_name` on the source to the target.
///
/// Each firing re-emits the same arguments from the target under the target
/// event name; with `send_update` a second `"update"` event follows carrying
/// `[target_event_name, ...args]`. Both run inside the source's `emit` call.
///
/// Nothing is de-duplicated: defining the same relay twice relays twice.
///
/// The listener owns the target, so the relay keeps working for as long as
/// it is registered on the source. A target that also owns its source forms
/// a cycle until [`RelayHandle::cancel`] is called.
pub fn define_event(options: RelayOptions) -> RelayHandle {
    let RelayOptions {
        spec,
        source,
        target,
    } = options;

    let target_event_name = spec.target_event_name().to_string();
    let send_update = spec.send_update;
    let relayed_name = target_event_name.clone();

    let listener: Listener = Arc::new(move |args: &[Payload]| {
        target.emit(&relayed_name, args);

        if send_update {
            let mut update_args = Vec::with_capacity(args.len() + 1);
            update_args.push(Payload::String(relayed_name.clone()));
            update_args.extend_from_slice(args);
            target.emit(UPDATE_EVENT, &update_args);
        }
    });

    let listener = source.on(&spec.event_name, listener);

    RelayDefined {
        source_event: &spec.event_name,
        target_event: &target_event_name,
        send_update,
    }
    .log();

    RelayHandle {
        source,
        event_name: spec.event_name,
        target_event_name,
        listener,
    }
}

/// Whether `value` counts as an error when passed to [`EventRelay::respond`].
///
/// `null`, `false`, `0` and `""` do not; everything else does.
pub fn is_truthy(value: &Payload) -> bool {
    match value {
        Payload::Null => false,
        Payload::Bool(flag) => *flag,
        Payload::Number(number) => number.as_f64().map_or(true, |n| n != 0.0 && !n.is_nan()),
        Payload::String(text) => !text.is_empty(),
        Payload::Array(_) | Payload::Object(_) => true,
    }
}

/// Event capability held by an adaptor or driver host.
///
/// Wraps the host's own emitter: `respond` and relays created with
/// [`EventRelay::proxy`] emit from it.
#[derive(Clone)]
pub struct EventRelay {
    emitter: Arc<dyn Emitter>,
}

impl EventRelay {
    pub fn new(emitter: Arc<dyn Emitter>) -> Self {
        Self { emitter }
    }

    /// The host's own emitter; register listeners here to observe the host.
    pub fn emitter(&self) -> &Arc<dyn Emitter> {
        &self.emitter
    }

    pub fn emit(&self, event: &str, args: &[Payload]) -> bool {
        self.emitter.emit(event, args)
    }

    /// Report the completion of an operation through both events and a callback.
    ///
    /// When `error` is truthy the host emits `"error"` with the error as its only
    /// argument and `event` is not emitted. Otherwise the host emits `event`
    /// with `data`. Either way `callback`, if given, is then called with
    /// `(error, data)`.
    pub fn respond(
        &self,
        event: &str,
        callback: Option<&dyn Fn(Option<&Payload>, &[Payload])>,
        error: Option<&Payload>,
        data: &[Payload],
    ) {
        match error {
            Some(err) if is_truthy(err) => {
                self.emitter.emit(ERROR_EVENT, std::slice::from_ref(err));
            }
            _ => {
                self.emitter.emit(event, data);
            }
        }

        if let Some(callback) = callback {
            callback(error, data);
        }
    }

    /// Relay `spec` from `source` onto this host's emitter.
    pub fn proxy(&self, source: Arc<dyn Emitter>, spec: impl Into<EventSpec>) -> RelayHandle {
        define_event(RelayOptions::from_spec(
            spec.into(),
            source,
            self.emitter.clone(),
        ))
    }
}

impl fmt::Debug for EventRelay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventRelay").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventEmitter;
    use serde_json::json;
    use std::sync::Mutex;

    type Calls = Arc<Mutex<Vec<Vec<Payload>>>>;

    fn record(emitter: &EventEmitter, event: &str) -> Calls {
        let calls: Calls = Arc::new(Mutex::new(Vec::new()));
        let sink = calls.clone();
        emitter.on(
            event,
            Arc::new(move |args: &[Payload]| sink.lock().unwrap().push(args.to_vec())),
        );
        calls
    }

    fn pair() -> (Arc<EventEmitter>, Arc<EventEmitter>) {
        (
            Arc::new(EventEmitter::new("source")),
            Arc::new(EventEmitter::new("target")),
        )
    }

    #[test]
    fn test_respond_emits_event_and_calls_callback_without_error() {
        let host = Arc::new(EventEmitter::new("host"));
        let relay = EventRelay::new(host.clone());
        let done = record(&host, "done");
        let errors = record(&host, ERROR_EVENT);

        let seen = Mutex::new(Vec::new());
        let callback = |err: Option<&Payload>, data: &[Payload]| {
            seen.lock().unwrap().push((err.cloned(), data.to_vec()));
        };

        relay.respond("done", Some(&callback), None, &[json!(1), json!("ok")]);

        assert_eq!(*done.lock().unwrap(), vec![vec![json!(1), json!("ok")]]);
        assert!(errors.lock().unwrap().is_empty());
        assert_eq!(
            *seen.lock().unwrap(),
            vec![(None, vec![json!(1), json!("ok")])]
        );
    }

    #[test]
    fn test_respond_with_error_emits_only_error() {
        let host = Arc::new(EventEmitter::new("host"));
        let relay = EventRelay::new(host.clone());
        let done = record(&host, "done");
        let errors = record(&host, ERROR_EVENT);

        let seen = Mutex::new(Vec::new());
        let callback = |err: Option<&Payload>, data: &[Payload]| {
            seen.lock().unwrap().push((err.cloned(), data.to_vec()));
        };

        let error = json!({"code": "EIO"});
        relay.respond("done", Some(&callback), Some(&error), &[json!(7)]);

        assert!(done.lock().unwrap().is_empty());
        assert_eq!(*errors.lock().unwrap(), vec![vec![error.clone()]]);
        assert_eq!(*seen.lock().unwrap(), vec![(Some(error), vec![json!(7)])]);
    }

    #[test]
    fn test_respond_treats_falsy_error_as_success() {
        let host = Arc::new(EventEmitter::new("host"));
        let relay = EventRelay::new(host.clone());
        let done = record(&host, "done");
        let errors = record(&host, ERROR_EVENT);

        let seen = Mutex::new(Vec::new());
        let callback = |err: Option<&Payload>, data: &[Payload]| {
            seen.lock().unwrap().push((err.cloned(), data.to_vec()));
        };

        let falsy = [json!(null), json!(false), json!(0), json!("")];
        for value in &falsy {
            relay.respond("done", Some(&callback), Some(value), &[json!("data")]);
        }

        assert_eq!(done.lock().unwrap().len(), 4);
        assert!(errors.lock().unwrap().is_empty());
        assert_eq!(
            *seen.lock().unwrap(),
            falsy
                .iter()
                .map(|value| (Some(value.clone()), vec![json!("data")]))
                .collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_respond_without_callback() {
        let host = Arc::new(EventEmitter::new("host"));
        let relay = EventRelay::new(host.clone());
        let done = record(&host, "done");

        relay.respond("done", None, None, &[]);

        assert_eq!(*done.lock().unwrap(), vec![Vec::<Payload>::new()]);
    }

    #[test]
    fn test_is_truthy() {
        assert!(!is_truthy(&json!(null)));
        assert!(!is_truthy(&json!(false)));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!(0.0)));
        assert!(!is_truthy(&json!("")));
        assert!(is_truthy(&json!(true)));
        assert!(is_truthy(&json!(-1)));
        assert!(is_truthy(&json!("failed")));
        assert!(is_truthy(&json!([])));
        assert!(is_truthy(&json!({})));
    }

    #[test]
    fn test_relay_without_update_fires_once_per_source_emit() {
        let (source, target) = pair();
        let relayed = record(&target, "data");
        let updates = record(&target, UPDATE_EVENT);

        let _handle = define_event(RelayOptions::new("data", source.clone(), target.clone()));

        for n in 0..3 {
            source.emit("data", &[json!(n)]);
        }

        assert_eq!(
            *relayed.lock().unwrap(),
            vec![vec![json!(0)], vec![json!(1)], vec![json!(2)]]
        );
        assert!(updates.lock().unwrap().is_empty());
    }

    #[test]
    fn test_relay_with_update_prepends_target_event_name() {
        let (source, target) = pair();
        let relayed = record(&target, "reading");
        let updates = record(&target, UPDATE_EVENT);

        let _handle = define_event(
            RelayOptions::new("data", source.clone(), target.clone())
                .rename("reading")
                .send_update(true),
        );

        source.emit("data", &[json!(42), json!("cm")]);
        source.emit("data", &[]);

        assert_eq!(
            *relayed.lock().unwrap(),
            vec![vec![json!(42), json!("cm")], vec![]]
        );
        assert_eq!(
            *updates.lock().unwrap(),
            vec![
                vec![json!("reading"), json!(42), json!("cm")],
                vec![json!("reading")],
            ]
        );
    }

    #[test]
    fn test_relay_target_event_defaults_to_source_event() {
        let (source, target) = pair();
        let relayed = record(&target, "data");

        let handle = define_event(RelayOptions::new("data", source.clone(), target.clone()));

        assert_eq!(handle.event_name(), "data");
        assert_eq!(handle.target_event_name(), "data");
        source.emit("data", &[json!(true)]);
        assert_eq!(relayed.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_duplicate_relays_are_not_deduplicated() {
        let (source, target) = pair();
        let relayed = record(&target, "data");

        let options = RelayOptions::new("data", source.clone(), target.clone());
        let _first = define_event(options.clone());
        let _second = define_event(options);

        source.emit("data", &[json!(1)]);
        assert_eq!(relayed.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_handle_returns_source_and_cancel_removes_listener() {
        let (source, target) = pair();
        let relayed = record(&target, "data");

        let handle = define_event(RelayOptions::new("data", source.clone(), target.clone()));
        assert_eq!(handle.source().listener_count("data"), 1);

        source.emit("data", &[]);
        assert!(handle.cancel());
        source.emit("data", &[]);

        assert_eq!(relayed.lock().unwrap().len(), 1);
        assert_eq!(source.listener_count("data"), 0);
    }

    #[test]
    fn test_cancel_after_external_removal_reports_false() {
        let (source, target) = pair();
        let handle = define_event(RelayOptions::new("data", source.clone(), target.clone()));

        source.remove_all_listeners(Some("data"));
        assert!(!handle.cancel());
    }

    #[test]
    fn test_relay_keeps_target_alive() {
        let source = Arc::new(EventEmitter::new("source"));
        let calls = Arc::new(Mutex::new(0));
        let target = Arc::new(EventEmitter::new("target"));
        let counter = calls.clone();
        target.on(
            "data",
            Arc::new(move |_: &[Payload]| *counter.lock().unwrap() += 1),
        );

        let _handle = define_event(RelayOptions::new("data", source.clone(), target));

        source.emit("data", &[json!(1)]);
        assert_eq!(*calls.lock().unwrap(), 1);
    }

    #[test]
    fn test_chain_survives_dropping_intermediate_emitter_and_handles() {
        let connector = Arc::new(EventEmitter::new("connector"));
        let driver = Arc::new(EventEmitter::new("driver"));
        let seen = record(&driver, "value");

        let hub = Arc::new(EventEmitter::new("hub"));
        let first = define_event(RelayOptions::new("raw", connector.clone(), hub.clone()).rename("data"));
        let second = define_event(RelayOptions::new("data", hub.clone(), driver.clone()).rename("value"));
        drop(hub);
        drop(first);
        drop(second);

        connector.emit("raw", &[json!(1)]);
        assert_eq!(*seen.lock().unwrap(), vec![vec![json!(1)]]);
    }

    #[test]
    fn test_cancel_releases_target() {
        let (source, target) = pair();
        let handle = define_event(RelayOptions::new("data", source.clone(), target.clone()));
        assert_eq!(Arc::strong_count(&target), 2);

        assert!(handle.cancel());
        assert_eq!(Arc::strong_count(&target), 1);
    }

    #[test]
    fn test_proxy_targets_host_emitter() {
        let source = Arc::new(EventEmitter::new("connection"));
        let host = Arc::new(EventEmitter::new("driver"));
        let relay = EventRelay::new(host.clone());
        let relayed = record(&host, "moved");

        let handle = relay.proxy(source.clone(), EventSpec::new("move").rename("moved"));
        source.emit("move", &[json!({"x": 1})]);

        assert_eq!(*relayed.lock().unwrap(), vec![vec![json!({"x": 1})]]);
        assert_eq!(handle.target_event_name(), "moved");
    }

    #[test]
    fn test_relays_chain_across_emitters() {
        let connector = Arc::new(EventEmitter::new("connector"));
        let adaptor = Arc::new(EventEmitter::new("adaptor"));
        let driver = Arc::new(EventEmitter::new("driver"));
        let seen = record(&driver, "value");

        let _a = define_event(RelayOptions::new("raw", connector.clone(), adaptor.clone()).rename("data"));
        let _b = define_event(RelayOptions::new("data", adaptor.clone(), driver.clone()).rename("value"));

        connector.emit("raw", &[json!(3.5)]);
        assert_eq!(*seen.lock().unwrap(), vec![vec![json!(3.5)]]);
    }
}
