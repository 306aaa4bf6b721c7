//! Desktop notification adapters

pub mod desktop;
pub mod null;

pub use desktop::DesktopNotifier;
pub use null::NullNotifier;
