// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Centralized message types for structured logging.
//!
//! Each message type implements `Display` for the human-readable line and
//! [`StructuredLog`] to emit the same information as structured fields.
//!
//! # Organization
//!
//! * `relay` - Emitter and relay wiring events
//! * `config` - Config store updates, subscribers, and loading
//!
//! # Usage Pattern
//!
//! ```rust
//! use the_switchboard::observability::messages::config::UpdateIgnored;
//! use the_switchboard::observability::messages::StructuredLog;
//!
//! let msg = UpdateIgnored { dropped_keys: 1 };
//! msg.log();
//! tracing::debug!("{}", msg);
//! ```

use std::fmt::Display;
use tracing::Span;

pub mod config;
pub mod relay;

/// A log message that knows its own level and structured fields.
pub trait StructuredLog: Display {
    /// Emit this message as a tracing event at its designated level.
    fn log(&self);

    /// Build a span carrying this message's fields.
    fn span(&self, name: &str) -> Span;
}
