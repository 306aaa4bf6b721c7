//! Port interface for persisted notification settings

use async_trait::async_trait;
use herald_domain::{NotificationSettings, Result};

/// Read-only access to the host's persisted notification settings.
///
/// The engine never writes settings; the host UI owns them. `load` is
/// called once per poll so changes take effect without a restart.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    async fn load(&self) -> Result<NotificationSettings>;
}
