//! Persisted notification settings and their resolved form

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use super::notification::NotificationKind;

/// Raw persisted settings, as written by the host UI.
///
/// Absent keys mean "no explicit choice". The engine only ever reads this
/// shape; writes belong to the host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NotificationSettings {
    /// Device-notification opt-in flag.
    pub device_notifications: Option<bool>,
    /// Per-kind overrides keyed by wire token ("reply", "like", ...).
    pub kinds: HashMap<String, bool>,
}

/// Effective delivery preferences after resolution.
///
/// Resolution is permissive: a kind is enabled unless the user explicitly
/// turned it off, and the same holds for the device flag. Only an explicit
/// `false` silences anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryPrefs {
    pub device_enabled: bool,
    pub enabled_kinds: HashSet<NotificationKind>,
}

impl DeliveryPrefs {
    /// Everything on. Also the fail-open result when settings cannot be
    /// read at all.
    #[must_use]
    pub fn permissive() -> Self {
        Self { device_enabled: true, enabled_kinds: NotificationKind::ALL.into_iter().collect() }
    }

    /// Resolves persisted settings into effective preferences.
    #[must_use]
    pub fn from_settings(settings: &NotificationSettings) -> Self {
        let enabled_kinds = NotificationKind::ALL
            .into_iter()
            .filter(|kind| settings.kinds.get(kind.as_str()).copied().unwrap_or(true))
            .collect();
        Self {
            device_enabled: settings.device_notifications.unwrap_or(true),
            enabled_kinds,
        }
    }

    #[must_use]
    pub fn kind_enabled(&self, kind: NotificationKind) -> bool {
        self.enabled_kinds.contains(&kind)
    }

    /// True when no kind has been disabled, in which case the list fetch
    /// can skip the `types` filter entirely.
    #[must_use]
    pub fn all_kinds_enabled(&self) -> bool {
        self.enabled_kinds.len() == NotificationKind::ALL.len()
    }
}

impl Default for DeliveryPrefs {
    fn default() -> Self {
        Self::permissive()
    }
}
