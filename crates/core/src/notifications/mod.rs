//! Remote notification API boundary

pub mod ports;
