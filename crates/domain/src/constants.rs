//! Application constants
//!
//! Centralized location for all domain-level constants used throughout the
//! engine.

// Polling cadence defaults (seconds)
pub const DEFAULT_BASE_INTERVAL_SECS: u64 = 300;
pub const DEFAULT_MAX_INTERVAL_SECS: u64 = 600;

// Activity defaults (seconds)
pub const DEFAULT_IDLE_THRESHOLD_SECS: u64 = 180;
pub const DEFAULT_IDLE_CHECK_INTERVAL_SECS: u64 = 30;

// Delivery
pub const MAX_DEVICE_ALERTS: usize = 3;
pub const DEFAULT_FETCH_LIMIT: usize = 25;

// API defaults
pub const DEFAULT_API_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_USER_AGENT: &str = concat!("herald/", env!("CARGO_PKG_VERSION"));

// Settings store
pub const DEFAULT_SETTINGS_PATH: &str = "herald.settings.json";
