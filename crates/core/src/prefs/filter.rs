//! Fail-open preference filter

use std::sync::Arc;

use herald_domain::DeliveryPrefs;
use tracing::warn;

use super::ports::SettingsStore;

/// Resolves persisted settings into effective delivery preferences.
///
/// Resolution never fails: an unreadable settings store fails open to
/// permissive preferences (all kinds enabled), so a broken settings file
/// can degrade filtering but can never silence delivery or stop polling.
/// Explicit opt-outs are honored whenever the store is readable.
pub struct PreferenceFilter {
    store: Arc<dyn SettingsStore>,
}

impl PreferenceFilter {
    pub fn new(store: Arc<dyn SettingsStore>) -> Self {
        Self { store }
    }

    pub async fn resolve(&self) -> DeliveryPrefs {
        match self.store.load().await {
            Ok(settings) => DeliveryPrefs::from_settings(&settings),
            Err(err) => {
                warn!(error = %err, "settings read failed; failing open to all kinds");
                DeliveryPrefs::permissive()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use herald_domain::{HeraldError, NotificationKind, NotificationSettings, Result};

    use super::*;

    struct StaticStore {
        settings: NotificationSettings,
        loads: AtomicUsize,
    }

    #[async_trait]
    impl SettingsStore for StaticStore {
        async fn load(&self) -> Result<NotificationSettings> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            Ok(self.settings.clone())
        }
    }

    struct BrokenStore;

    #[async_trait]
    impl SettingsStore for BrokenStore {
        async fn load(&self) -> Result<NotificationSettings> {
            Err(HeraldError::Preferences("corrupt settings file".into()))
        }
    }

    #[tokio::test]
    async fn resolves_explicit_opt_outs() {
        let settings: NotificationSettings =
            serde_json::from_str(r#"{ "kinds": { "like": false, "recast": false } }"#).unwrap();
        let store = Arc::new(StaticStore { settings, loads: AtomicUsize::new(0) });
        let filter = PreferenceFilter::new(store.clone());

        let prefs = filter.resolve().await;
        assert!(!prefs.kind_enabled(NotificationKind::Like));
        assert!(!prefs.kind_enabled(NotificationKind::Recast));
        assert!(prefs.kind_enabled(NotificationKind::Reply));
        assert_eq!(store.loads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn read_failure_fails_open() {
        let filter = PreferenceFilter::new(Arc::new(BrokenStore));
        let prefs = filter.resolve().await;
        assert_eq!(prefs, DeliveryPrefs::permissive());
    }

    #[tokio::test]
    async fn each_resolve_reloads_the_store() {
        let store = Arc::new(StaticStore {
            settings: NotificationSettings::default(),
            loads: AtomicUsize::new(0),
        });
        let filter = PreferenceFilter::new(store.clone());
        filter.resolve().await;
        filter.resolve().await;
        assert_eq!(store.loads.load(Ordering::SeqCst), 2);
    }
}
