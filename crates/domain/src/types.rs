//! Domain types and models

pub mod activity;
pub mod delivery;
pub mod notification;
pub mod settings;

// Re-export the working set so callers can use `herald_domain::X` directly.
pub use activity::ActivityState;
pub use delivery::{DeepLink, DeviceAlert};
pub use notification::{NotificationKind, NotificationRecord, UnreadSnapshot};
pub use settings::{DeliveryPrefs, NotificationSettings};
