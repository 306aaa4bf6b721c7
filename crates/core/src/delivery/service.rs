//! Capped, deduplicated alert dispatch

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use herald_domain::constants::MAX_DEVICE_ALERTS;
use herald_domain::{HeraldError, NotificationRecord};
use tracing::{debug, warn};

use super::alert;
use super::ports::DeviceNotifier;
use super::seen::SeenTracker;

/// Dispatches rendered alerts through the notifier port.
///
/// Per invocation at most [`MAX_DEVICE_ALERTS`] alerts go out, newest
/// first. A `Capability` error latches delivery off for the rest of the
/// session (the platform facility is gone; polling continues untouched);
/// any other dispatch error skips that one alert. Only alerts that were
/// actually shown are recorded in the seen tracker, so a skipped alert can
/// ride a later increase window.
pub struct DeliveryService {
    notifier: Arc<dyn DeviceNotifier>,
    disabled: AtomicBool,
}

impl DeliveryService {
    pub fn new(notifier: Arc<dyn DeviceNotifier>) -> Self {
        Self { notifier, disabled: AtomicBool::new(false) }
    }

    /// Whether the capability latch has tripped.
    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.disabled.load(Ordering::Relaxed)
    }

    /// Dispatches the delivery window. Returns how many alerts were shown.
    pub async fn deliver(&self, window: &[NotificationRecord], seen: &mut SeenTracker) -> usize {
        let mut shown = 0;
        for record in window.iter().take(MAX_DEVICE_ALERTS) {
            if self.is_disabled() {
                break;
            }
            let alert = alert::render(record);
            match self.notifier.show(&alert).await {
                Ok(()) => {
                    seen.insert(record.dedup_key());
                    shown += 1;
                    debug!(tag = %alert.tag, kind = %record.kind, "device alert shown");
                }
                Err(HeraldError::Capability(reason)) => {
                    debug!(%reason, "device notifications unavailable; disabling for this session");
                    self.disabled.store(true, Ordering::Relaxed);
                }
                Err(err) => {
                    warn!(error = %err, tag = %alert.tag, "device dispatch failed; skipping alert");
                }
            }
        }
        shown
    }
}
