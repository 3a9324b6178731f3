// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod config;
mod relay;

pub use config::ConfigError;
pub use relay::RelayError;
