// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Observability module for structured logging and tracing.
//!
//! This module provides centralized message types for all diagnostic and operational
//! logging throughout The Switchboard. Message types follow a struct-based pattern
//! with `Display` trait implementation to:
//!
//! * Eliminate magic strings scattered throughout the codebase
//! * Keep field names consistent between log events and spans
//! * Provide consistent, structured logging output
//!
//! # Architecture
//!
//! Messages are organized by subsystem:
//! * `messages::relay` - Emitter and relay wiring events
//! * `messages::config` - Config store updates, subscribers, and loading
//!
//! # Usage
//!
//! ```rust
//! use the_switchboard::observability::messages::relay::RelayDefined;
//! use the_switchboard::observability::messages::StructuredLog;
//!
//! let msg = RelayDefined {
//!     source_event: "data",
//!     target_event: "reading",
//!     send_update: true,
//! };
//!
//! msg.log();
//! ```
//!
//! Installing a subscriber is the binary's job; see `config::logging::init_tracing`.

pub mod messages;
