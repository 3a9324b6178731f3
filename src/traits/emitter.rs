use std::sync::Arc;

/// A single positional event argument.
pub type Payload = serde_json::Value;

/// Callback invoked with the positional arguments of an emitted event.
pub type Listener = Arc<dyn Fn(&[Payload]) + Send + Sync>;

/// Identifies one listener registration on an emitter.
///
/// Registering the same listener twice yields two distinct ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

impl ListenerId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn get(&self) -> u64 {
        self.0
    }
}

/// Anything that can register named-event listeners and fire named events.
///
/// Implementations must deliver events synchronously: every listener for
/// `event` has run by the time `emit` returns. Listeners must be invoked
/// without holding internal locks so a listener may emit, register, or
/// remove listeners on the same emitter.
pub trait Emitter: Send + Sync {
    /// Register `listener` for every future emission of `event`.
    fn on(&self, event: &str, listener: Listener) -> ListenerId;

    /// Remove the registration `id` for `event`. Returns whether it existed.
    fn remove_listener(&self, event: &str, id: ListenerId) -> bool;

    /// Fire `event` with `args`. Returns whether any listener was invoked.
    fn emit(&self, event: &str, args: &[Payload]) -> bool;

    /// Number of listeners currently registered for `event`.
    fn listener_count(&self, event: &str) -> usize;
}
