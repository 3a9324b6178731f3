/// Keys that name store operations and are never accepted as data
pub const RESERVED_KEYS: [&str; 3] = ["update", "subscribe", "unsubscribe"];
/// Logging settings, an object (empty by default)
pub const LOGGING_KEY: &str = "logging";
/// Test-mode flag, `false` by default
pub const TEST_MODE_KEY: &str = "testMode";
/// Level used when neither `logging.level` nor `RUST_LOG` is set
pub const DEFAULT_LOG_LEVEL: &str = "info";
/// Buffered deltas per `watch()` receiver before it starts lagging
pub const WATCH_CHANNEL_CAPACITY: usize = 64;
