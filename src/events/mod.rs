// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Event emission and relaying for adaptor and driver hosts.
//!
//! # Components
//!
//! - [`EventEmitter`]: the stock [`Emitter`](crate::traits::Emitter); listeners are
//!   keyed by event name and invoked synchronously in registration order.
//! - [`EventRelay`]: the capability a host holds to emit its own events, report
//!   completion through [`EventRelay::respond`], and pull events in from other
//!   emitters.
//! - [`define_event`]: wires a [`RelayOptions`] so every firing on the source is
//!   re-emitted from the target, optionally renamed and optionally followed by an
//!   `"update"` event.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use serde_json::json;
//! use the_switchboard::events::{define_event, EventEmitter, RelayOptions};
//! use the_switchboard::traits::Emitter;
//!
//! let connector = Arc::new(EventEmitter::new("connector"));
//! let adaptor = Arc::new(EventEmitter::new("adaptor"));
//!
//! let handle = define_event(
//!     RelayOptions::new("data", connector.clone(), adaptor.clone())
//!         .rename("reading")
//!         .send_update(true),
//! );
//!
//! connector.emit("data", &[json!(42)]);
//! assert!(handle.cancel());
//! ```

mod emitter;
mod relay;

pub use emitter::EventEmitter;
pub use relay::{define_event, is_truthy, EventRelay, EventSpec, RelayHandle, RelayOptions};

/// Event emitted by [`EventRelay::respond`] when an operation failed.
pub const ERROR_EVENT: &str = "error";

/// Generic event a relay emits after the renamed event when `send_update` is set.
pub const UPDATE_EVENT: &str = "update";
