// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors for wiring event relays onto adaptor and driver hosts.

use thiserror::Error;

/// Errors that can occur while defining a relay through the host sugar methods.
///
/// Relays built from a full `RelayOptions` cannot fail: the source and target
/// are required by construction. Only the adaptor/driver forms look up a
/// collaborator at call time, and that collaborator may not be set yet.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RelayError {
    /// The adaptor has no connector to relay events from.
    #[error("Cannot relay '{event_name}': adaptor has no connector")]
    MissingConnector { event_name: String },

    /// The driver has no connection to relay events from.
    #[error("Cannot relay '{event_name}': driver has no connection")]
    MissingConnection { event_name: String },
}

impl RelayError {
    /// Name of the collaborator that was missing.
    pub fn role(&self) -> &'static str {
        match self {
            RelayError::MissingConnector { .. } => "connector",
            RelayError::MissingConnection { .. } => "connection",
        }
    }
}
