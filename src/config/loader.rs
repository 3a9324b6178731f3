// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

use crate::config::ConfigDelta;
use crate::errors::ConfigError;
use crate::observability::messages::{config::ConfigLoaded, StructuredLog};

/// Load settings from a YAML, JSON or TOML file.
///
/// Files ending in `.toml` are parsed as TOML; everything else as YAML, which
/// also accepts JSON. The top level must be a mapping; a document that
/// parses to null yields no settings.
///
/// # Example
/// ```yaml
/// testMode: false
/// logging:
///   level: debug
///   format: compact
/// port: /dev/ttyACM0
/// ```
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<ConfigDelta, ConfigError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let value: Value = if is_toml(path) {
        toml::from_str(&content).map_err(|source| ConfigError::Toml {
            path: path.to_path_buf(),
            source,
        })?
    } else {
        serde_yaml::from_str(&content).map_err(|source| ConfigError::Yaml {
            path: path.to_path_buf(),
            source,
        })?
    };

    let settings = match value {
        Value::Object(map) => map,
        Value::Null => Map::new(),
        other => {
            return Err(ConfigError::NotAMapping {
                path: path.to_path_buf(),
                found: kind_of(&other),
            })
        }
    };

    ConfigLoaded {
        path,
        key_count: settings.len(),
    }
    .log();

    Ok(settings)
}

fn is_toml(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"))
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "a mapping",
    }
}
