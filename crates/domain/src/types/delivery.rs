//! Rendered device alerts and their navigation targets

use serde::{Deserialize, Serialize};

/// Where tapping an alert should take the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DeepLink {
    /// Conversation view around a specific cast.
    Conversation { cast_hash: String },
    /// Profile of the acting user.
    Profile { fid: u64 },
    /// Default landing view (the notification inbox).
    Inbox,
}

/// A fully rendered OS notification, ready for dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceAlert {
    pub title: String,
    pub body: String,
    /// Dedup tag; a re-send with the same tag replaces the shown alert
    /// instead of stacking a duplicate.
    pub tag: String,
    pub deep_link: DeepLink,
}
