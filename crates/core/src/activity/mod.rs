//! User activity and visibility monitoring

mod monitor;

pub use monitor::{ActivityMonitor, EngagementChange};
