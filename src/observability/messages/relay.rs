// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for emitter and relay events.
//!
//! This module contains message types for logging events related to:
//! * Relay registration and cancellation
//! * `"error"` events that nobody listens for
//! * Adaptor/driver relays that could not find their source

use crate::observability::messages::StructuredLog;
use crate::traits::Payload;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// A relay listener was registered on a source emitter.
///
/// # Log Level
/// `debug!` - Wiring detail
///
/// # Example
/// ```
/// use the_switchboard::observability::messages::relay::RelayDefined;
///
/// let msg = RelayDefined {
///     source_event: "data",
///     target_event: "reading",
///     send_update: false,
/// };
///
/// tracing::debug!("{}", msg);
/// ```
pub struct RelayDefined<'a> {
    pub source_event: &'a str,
    pub target_event: &'a str,
    pub send_update: bool,
}

impl Display for RelayDefined<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Relaying '{}' as '{}' (send_update={})",
            self.source_event, self.target_event, self.send_update
        )
    }
}

impl StructuredLog for RelayDefined<'_> {
    fn log(&self) {
        tracing::debug!(
            source_event = self.source_event,
            target_event = self.target_event,
            send_update = self.send_update,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "relay",
            span_name = name,
            source_event = self.source_event,
            target_event = self.target_event,
            send_update = self.send_update,
        )
    }
}

/// A relay listener was removed through its handle.
///
/// # Log Level
/// `debug!` - Wiring detail
pub struct RelayCancelled<'a> {
    pub source_event: &'a str,
    pub target_event: &'a str,
    pub removed: bool,
}

impl Display for RelayCancelled<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        if self.removed {
            write!(
                f,
                "Cancelled relay '{}' -> '{}'",
                self.source_event, self.target_event
            )
        } else {
            write!(
                f,
                "Relay '{}' -> '{}' was already removed from its source",
                self.source_event, self.target_event
            )
        }
    }
}

impl StructuredLog for RelayCancelled<'_> {
    fn log(&self) {
        tracing::debug!(
            source_event = self.source_event,
            target_event = self.target_event,
            removed = self.removed,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "relay_cancelled",
            span_name = name,
            source_event = self.source_event,
            target_event = self.target_event,
        )
    }
}

/// An `"error"` event was emitted with no listener registered for it.
///
/// # Log Level
/// `warn!` - The error would otherwise go unnoticed
pub struct UnhandledErrorEvent<'a> {
    pub emitter: &'a str,
    pub error: Option<&'a Payload>,
}

impl Display for UnhandledErrorEvent<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self.error {
            Some(error) => write!(f, "Unhandled error event on '{}': {}", self.emitter, error),
            None => write!(f, "Unhandled error event on '{}'", self.emitter),
        }
    }
}

impl StructuredLog for UnhandledErrorEvent<'_> {
    fn log(&self) {
        tracing::warn!(
            emitter = self.emitter,
            error = ?self.error,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "unhandled_error_event",
            span_name = name,
            emitter = self.emitter,
        )
    }
}

/// A host relay could not be defined because its source collaborator is unset.
///
/// # Log Level
/// `warn!` - Caller wired events before attaching the connector/connection
pub struct MissingRelaySource<'a> {
    pub role: &'a str,
    pub event_name: &'a str,
}

impl Display for MissingRelaySource<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Cannot relay '{}': no {} is attached",
            self.event_name, self.role
        )
    }
}

impl StructuredLog for MissingRelaySource<'_> {
    fn log(&self) {
        tracing::warn!(role = self.role, event_name = self.event_name, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "missing_relay_source",
            span_name = name,
            role = self.role,
            event_name = self.event_name,
        )
    }
}
