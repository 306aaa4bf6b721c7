//! File-backed notification settings
//!
//! The host application owns this file and may rewrite it at any moment,
//! so every load goes back to disk instead of caching.

use std::path::PathBuf;

use async_trait::async_trait;
use herald_core::SettingsStore;
use herald_domain::{HeraldError, NotificationSettings, Result};
use tracing::debug;

/// Reads [`NotificationSettings`] from a JSON file.
///
/// A missing file is not an error: a user who never touched their settings
/// gets the permissive defaults. An unreadable or undecodable file IS an
/// error; the preference filter upstream turns that into fail-open
/// behavior with a warning.
pub struct FileSettingsStore {
    path: PathBuf,
}

impl FileSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

#[async_trait]
impl SettingsStore for FileSettingsStore {
    async fn load(&self) -> Result<NotificationSettings> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No settings file; using defaults");
                return Ok(NotificationSettings::default());
            }
            Err(e) => {
                return Err(HeraldError::Preferences(format!(
                    "Failed to read settings file {}: {}",
                    self.path.display(),
                    e
                )));
            }
        };

        serde_json::from_str(&contents).map_err(|e| {
            HeraldError::Preferences(format!(
                "Invalid settings file {}: {}",
                self.path.display(),
                e
            ))
        })
    }
}
