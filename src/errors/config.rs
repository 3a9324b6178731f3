// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors for loading, updating, and observing the shared config store.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the config store and its loaders.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("Failed to read config file '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The config file is not valid YAML (or JSON).
    #[error("Failed to parse config file '{}': {source}", .path.display())]
    Yaml {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    /// The config file is not valid TOML.
    #[error("Failed to parse TOML config file '{}': {source}", .path.display())]
    Toml {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// The config file parsed, but its top level is not a key/value mapping.
    #[error("Config file '{}' must contain a mapping at the top level, found {found}", .path.display())]
    NotAMapping { path: PathBuf, found: &'static str },

    /// The `logging` entry of the store does not describe valid logging settings.
    #[error("Invalid logging settings: {0}")]
    InvalidLogging(#[source] serde_json::Error),

    /// A global tracing subscriber could not be installed.
    #[error("Failed to initialize tracing: {0}")]
    TracingInit(String),

    /// A subscriber returned an error while being notified of an update.
    ///
    /// Subscribers registered after `index` were not notified.
    #[error("Config subscriber #{index} failed: {source}")]
    SubscriberFailed {
        index: usize,
        source: anyhow::Error,
    },
}
