//! Engine facade
//!
//! Wires the HTTP client, settings store, desktop notifier, and poll
//! scheduler into one startable unit. Embedding hosts hand it a validated
//! configuration, start it, and forward UI events through the returned
//! [`SchedulerHandle`].

use std::sync::Arc;

use herald_core::{DeliveryService, DeviceNotifier, PollRunner, PreferenceFilter, SeenAcknowledger};
use herald_domain::{HeraldConfig, Result, UnreadSnapshot};
use tracing::{info, instrument};

use crate::api::ApiClient;
use crate::notify::DesktopNotifier;
use crate::scheduling::{PollScheduler, SchedulerConfig, SchedulerHandle, SchedulerResult};
use crate::settings::FileSettingsStore;

/// The assembled notification engine.
pub struct Engine {
    scheduler: PollScheduler,
    acknowledger: Arc<dyn SeenAcknowledger>,
    handle: Option<SchedulerHandle>,
}

impl Engine {
    /// Assemble the engine with the platform desktop notifier.
    ///
    /// # Errors
    ///
    /// Returns [`herald_domain::HeraldError::Internal`] when the HTTP
    /// client cannot be constructed.
    pub fn build(config: &HeraldConfig, initially_visible: bool) -> Result<Self> {
        Self::with_notifier(config, initially_visible, Arc::new(DesktopNotifier::new()))
    }

    /// Assemble the engine with a custom notifier port (headless hosts,
    /// tests).
    ///
    /// # Errors
    ///
    /// Returns [`herald_domain::HeraldError::Internal`] when the HTTP
    /// client cannot be constructed.
    pub fn with_notifier(
        config: &HeraldConfig,
        initially_visible: bool,
        notifier: Arc<dyn DeviceNotifier>,
    ) -> Result<Self> {
        let api = Arc::new(ApiClient::new((&config.api).into())?);
        let store = Arc::new(FileSettingsStore::new(&config.settings.path));
        let runner = Arc::new(PollRunner::new(
            api.clone(),
            api.clone(),
            PreferenceFilter::new(store),
            DeliveryService::new(notifier),
            config.delivery.fetch_limit,
        ));
        let scheduler =
            PollScheduler::new(runner, SchedulerConfig::from_config(config, initially_visible));
        Ok(Self { scheduler, acknowledger: api, handle: None })
    }

    /// Start polling.
    ///
    /// # Errors
    ///
    /// Returns error if the engine is already running
    pub async fn start(&mut self) -> SchedulerResult<SchedulerHandle> {
        let handle = self.scheduler.start().await?;
        self.handle = Some(handle.clone());
        Ok(handle)
    }

    /// Stop polling.
    ///
    /// # Errors
    ///
    /// Returns error if the engine is not running
    pub async fn stop(&mut self) -> SchedulerResult<()> {
        self.handle = None;
        self.scheduler.stop().await
    }

    /// Check if the poll loop is running
    pub fn is_running(&self) -> bool {
        self.scheduler.is_running()
    }

    /// Latest published unread snapshot.
    #[must_use]
    pub fn unread(&self) -> UnreadSnapshot {
        self.scheduler.unread()
    }

    /// Handle into the running scheduler, when started.
    #[must_use]
    pub fn handle(&self) -> Option<&SchedulerHandle> {
        self.handle.as_ref()
    }

    /// Acknowledge every notification server-side, then rebase the local
    /// snapshot so the resulting drop can never read as an increase.
    ///
    /// # Errors
    ///
    /// Propagates the API error when the acknowledgement call fails; the
    /// local snapshot is left untouched in that case.
    #[instrument(skip(self))]
    pub async fn mark_all_seen(&self) -> Result<()> {
        self.acknowledger.mark_all_seen().await?;
        info!("All notifications marked seen");
        if let Some(handle) = &self.handle {
            handle.marked_seen();
        }
        Ok(())
    }
}
