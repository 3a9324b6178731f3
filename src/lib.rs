// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod config;         // shared config store + loading
pub mod errors;         // error handling
pub mod events;         // emitters and relays
pub mod observability;
pub mod traits;         // emitter + host abstractions
