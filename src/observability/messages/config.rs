// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for the shared config store.
//!
//! This module contains message types for logging events related to:
//! * Update requests and their outcome
//! * Reserved keys stripped from updates
//! * Subscriber failures and teardown
//! * Loading settings from disk

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use std::path::Path;
use tracing::Span;

/// An update request reached the store.
///
/// # Log Level
/// `trace!` - Used mainly for its span
pub struct UpdateReceived {
    pub key_count: usize,
}

impl Display for UpdateReceived {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Config update received with {} keys", self.key_count)
    }
}

impl StructuredLog for UpdateReceived {
    fn log(&self) {
        tracing::trace!(key_count = self.key_count, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!("config_update", span_name = name, key_count = self.key_count)
    }
}

/// Reserved keys were removed from an update payload.
///
/// # Log Level
/// `warn!` - Caller tried to overwrite a control operation
///
/// # Example
/// ```
/// use the_switchboard::observability::messages::config::ReservedKeysDropped;
///
/// let keys = vec!["update"];
/// let msg = ReservedKeysDropped { keys: &keys };
///
/// tracing::warn!("{}", msg);
/// ```
pub struct ReservedKeysDropped<'a> {
    pub keys: &'a [&'a str],
}

impl Display for ReservedKeysDropped<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Dropped reserved config keys from update: {}",
            self.keys.join(", ")
        )
    }
}

impl StructuredLog for ReservedKeysDropped<'_> {
    fn log(&self) {
        tracing::warn!(keys = self.keys.join(","), count = self.keys.len(), "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "reserved_keys_dropped",
            span_name = name,
            keys = self.keys.join(","),
        )
    }
}

/// An update had no keys left after stripping and was ignored.
///
/// # Log Level
/// `debug!` - No-op
pub struct UpdateIgnored {
    pub dropped_keys: usize,
}

impl Display for UpdateIgnored {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Config update ignored: no keys left after dropping {} reserved keys",
            self.dropped_keys
        )
    }
}

impl StructuredLog for UpdateIgnored {
    fn log(&self) {
        tracing::debug!(dropped_keys = self.dropped_keys, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "update_ignored",
            span_name = name,
            dropped_keys = self.dropped_keys,
        )
    }
}

/// An update was merged and all subscribers were notified.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use the_switchboard::observability::messages::config::ConfigUpdated;
///
/// let keys = vec!["testMode".to_string()];
/// let msg = ConfigUpdated {
///     keys: &keys,
///     notified: 2,
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct ConfigUpdated<'a> {
    pub keys: &'a [String],
    pub notified: usize,
}

impl Display for ConfigUpdated<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Config updated ({}), notified {} subscribers",
            self.keys.join(", "),
            self.notified
        )
    }
}

impl StructuredLog for ConfigUpdated<'_> {
    fn log(&self) {
        tracing::info!(
            keys = self.keys.join(","),
            key_count = self.keys.len(),
            notified = self.notified,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "config_updated",
            span_name = name,
            keys = self.keys.join(","),
            notified = self.notified,
        )
    }
}

/// A subscriber returned an error; remaining subscribers were skipped.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct SubscriberFailed<'a> {
    pub index: usize,
    pub skipped: usize,
    pub error: &'a dyn std::error::Error,
}

impl Display for SubscriberFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Config subscriber #{} failed, {} later subscribers not notified: {}",
            self.index, self.skipped, self.error
        )
    }
}

impl StructuredLog for SubscriberFailed<'_> {
    fn log(&self) {
        tracing::error!(
            index = self.index,
            skipped = self.skipped,
            error = %self.error,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "subscriber_failed",
            span_name = name,
            index = self.index,
            error = %self.error,
        )
    }
}

/// All subscribers were removed from the store.
///
/// # Log Level
/// `debug!` - Teardown detail
pub struct SubscribersCleared {
    pub count: usize,
}

impl Display for SubscribersCleared {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Cleared {} config subscribers", self.count)
    }
}

impl StructuredLog for SubscribersCleared {
    fn log(&self) {
        tracing::debug!(count = self.count, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!("subscribers_cleared", span_name = name, count = self.count)
    }
}

/// Settings were read from a file.
///
/// # Log Level
/// `info!` - Important operational event
pub struct ConfigLoaded<'a> {
    pub path: &'a Path,
    pub key_count: usize,
}

impl Display for ConfigLoaded<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Loaded {} config keys from {}",
            self.key_count,
            self.path.display()
        )
    }
}

impl StructuredLog for ConfigLoaded<'_> {
    fn log(&self) {
        tracing::info!(
            path = %self.path.display(),
            key_count = self.key_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "config_loaded",
            span_name = name,
            path = %self.path.display(),
        )
    }
}
