//! # Herald Infrastructure
//!
//! Adapters and drivers behind the `herald-core` ports:
//! - HTTP client for the notification API (count probe, list fetch,
//!   mark-seen acknowledgement)
//! - Desktop notifier over the OS notification daemon
//! - File-backed notification settings store
//! - Configuration loader (file + environment overrides)
//! - The poll scheduler actor that drives the whole engine
//!
//! The [`engine::Engine`] facade wires all of it together for hosts that do
//! not want to assemble the pieces themselves.

pub mod api;
pub mod config;
pub mod engine;
pub mod notify;
pub mod scheduling;
pub mod settings;

pub use api::{ApiClient, ApiClientConfig};
pub use engine::Engine;
pub use notify::{DesktopNotifier, NullNotifier};
pub use scheduling::{
    EngineEvent, PollScheduler, SchedulerConfig, SchedulerError, SchedulerHandle, SchedulerResult,
};
pub use settings::FileSettingsStore;
