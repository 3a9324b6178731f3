// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod loader;
pub mod logging;
mod store;

pub mod consts;

pub use loader::load_settings;
pub use logging::{init_tracing, LogFormat, LoggingSettings};
pub use store::{ConfigDelta, ConfigStore, Subscriber, SubscriptionId, UpdateOutcome};
