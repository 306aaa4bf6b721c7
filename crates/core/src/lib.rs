//! # Herald Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - The activity monitor and the poll state machine
//! - Port/adapter interfaces (traits) for the network, settings, and the
//!   OS notification primitive
//! - The per-poll runner and the delivery pipeline
//!
//! ## Architecture Principles
//! - Only depends on `herald-domain`
//! - No HTTP, filesystem, or OS notification code
//! - All external dependencies via traits
//! - Decision logic is clock-parameterized and testable without sleeps

pub mod activity;
pub mod delivery;
pub mod notifications;
pub mod polling;
pub mod prefs;

// Re-export specific items to avoid ambiguity
pub use activity::{ActivityMonitor, EngagementChange};
pub use delivery::ports::DeviceNotifier;
pub use delivery::{DeliveryService, SeenTracker};
pub use notifications::ports::{NotificationFetcher, SeenAcknowledger, UnreadCountClient};
pub use polling::{Backoff, PollDirective, PollPhase, PollReport, PollRunner, PollState};
pub use prefs::ports::SettingsStore;
pub use prefs::PreferenceFilter;
