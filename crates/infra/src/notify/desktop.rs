//! Native desktop notifications using notify-rust

use async_trait::async_trait;
use herald_core::DeviceNotifier;
use herald_domain::{DeviceAlert, HeraldError, Result};
use tracing::debug;

/// How long a popup stays on screen where the desktop honors it.
const ALERT_TIMEOUT_MS: u32 = 5000;

/// Shows device alerts as native desktop notifications.
///
/// On freedesktop platforms the alert tag hashes into the notification
/// replace-id, so a repeat alert for the same underlying notification
/// replaces the earlier popup instead of stacking a duplicate.
pub struct DesktopNotifier {
    app_name: String,
}

impl DesktopNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self::with_app_name("Herald")
    }

    pub fn with_app_name(app_name: impl Into<String>) -> Self {
        Self { app_name: app_name.into() }
    }
}

impl Default for DesktopNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(all(unix, not(target_os = "macos")))]
fn replace_id(tag: &str) -> u32 {
    use std::hash::{Hash, Hasher};

    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    tag.hash(&mut hasher);
    // Truncation is fine; a collision only merges two popups.
    hasher.finish() as u32
}

#[async_trait]
impl DeviceNotifier for DesktopNotifier {
    async fn show(&self, alert: &DeviceAlert) -> Result<()> {
        let mut notification = notify_rust::Notification::new();
        notification
            .appname(&self.app_name)
            .summary(&alert.title)
            .body(&alert.body)
            .timeout(notify_rust::Timeout::Milliseconds(ALERT_TIMEOUT_MS));

        #[cfg(all(unix, not(target_os = "macos")))]
        {
            notification.id(replace_id(&alert.tag));
            // Click handlers read the routing target from this hint.
            if let Ok(target) = serde_json::to_string(&alert.deep_link) {
                notification
                    .hint(notify_rust::Hint::Custom("x-herald-target".to_string(), target));
            }
        }

        let tag = alert.tag.clone();
        // The notification daemon roundtrip is blocking.
        let shown = tokio::task::spawn_blocking(move || notification.show())
            .await
            .map_err(|e| HeraldError::Internal(format!("Notification task failed: {}", e)))?;

        match shown {
            Ok(_handle) => {
                debug!(tag = %tag, "Device alert displayed");
                Ok(())
            }
            Err(e) => Err(HeraldError::Capability(format!(
                "Desktop notifications unavailable: {}",
                e
            ))),
        }
    }
}
