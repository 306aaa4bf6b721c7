//! Notification preference resolution

mod filter;
pub mod ports;

pub use filter::PreferenceFilter;
