//! Port interface for the OS notification primitive

use async_trait::async_trait;
use herald_domain::{DeviceAlert, Result};

/// Shows one rendered alert through the platform notification facility.
#[async_trait]
pub trait DeviceNotifier: Send + Sync {
    /// Dispatch a single alert.
    ///
    /// # Errors
    ///
    /// [`HeraldError::Capability`](herald_domain::HeraldError::Capability)
    /// signals that the platform facility is missing entirely; callers
    /// should stop dispatching for the rest of the session. Any other
    /// error is a per-alert failure and safe to skip.
    async fn show(&self, alert: &DeviceAlert) -> Result<()>;
}
