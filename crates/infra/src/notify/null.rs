//! Log-only notifier

use async_trait::async_trait;
use herald_core::DeviceNotifier;
use herald_domain::{DeviceAlert, Result};
use tracing::info;

/// Swallows alerts, logging them instead of popping anything up.
///
/// For headless environments without a notification daemon, and for
/// exercising the full delivery pipeline without OS side effects.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullNotifier;

#[async_trait]
impl DeviceNotifier for NullNotifier {
    async fn show(&self, alert: &DeviceAlert) -> Result<()> {
        info!(title = %alert.title, body = %alert.body, tag = %alert.tag, "Device alert (log only)");
        Ok(())
    }
}
