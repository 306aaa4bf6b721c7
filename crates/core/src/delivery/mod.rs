//! Device notification delivery pipeline
//!
//! Selection ([`planner`]) and rendering ([`alert`]) are pure; dispatch
//! goes through the [`ports::DeviceNotifier`] boundary and is capped and
//! deduplicated by [`DeliveryService`].

pub mod alert;
pub mod planner;
pub mod ports;
mod seen;
mod service;

pub use seen::SeenTracker;
pub use service::DeliveryService;
