// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Logging settings stored under the `logging` key, and tracing setup from them.
//!
//! ```yaml
//! logging:
//!   enabled: true
//!   level: debug          # EnvFilter directives; RUST_LOG takes precedence
//!   format: compact       # pretty | compact | json
//! ```

use serde::Deserialize;
use serde_json::Value;
use tracing_subscriber::EnvFilter;

use crate::config::consts::DEFAULT_LOG_LEVEL;
use crate::errors::ConfigError;

/// Output format of the tracing subscriber.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Pretty,
    Compact,
    Json,
}

/// Parsed form of the store's `logging` entry. Unknown keys are ignored.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LoggingSettings {
    /// `false` disables tracing output entirely.
    pub enabled: bool,
    /// Filter directives such as `info` or `the_switchboard=debug`.
    pub level: Option<String>,
    pub format: LogFormat,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            level: None,
            format: LogFormat::default(),
        }
    }
}

impl LoggingSettings {
    pub fn from_value(value: &Value) -> Result<Self, ConfigError> {
        serde_json::from_value(value.clone()).map_err(ConfigError::InvalidLogging)
    }

    /// Filter from `RUST_LOG` if set, otherwise from `level`.
    pub fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)))
    }
}

/// Install the global tracing subscriber described by `settings`.
///
/// Does nothing when logging is disabled. Fails if a global subscriber is
/// already installed.
pub fn init_tracing(settings: &LoggingSettings) -> Result<(), ConfigError> {
    if !settings.enabled {
        return Ok(());
    }

    let builder = tracing_subscriber::fmt().with_env_filter(settings.env_filter());
    let result = match settings.format {
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };

    result.map_err(|e| ConfigError::TracingInit(e.to_string()))
}
