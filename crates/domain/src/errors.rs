//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for Herald
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum HeraldError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Malformed response: {0}")]
    Malformed(String),

    #[error("Notification capability unavailable: {0}")]
    Capability(String),

    #[error("Preference read error: {0}")]
    Preferences(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl HeraldError {
    /// Stable lowercase label for log fields.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Network(_) => "network",
            Self::Malformed(_) => "malformed",
            Self::Capability(_) => "capability",
            Self::Preferences(_) => "preferences",
            Self::Config(_) => "config",
            Self::Internal(_) => "internal",
        }
    }
}

impl From<serde_json::Error> for HeraldError {
    fn from(err: serde_json::Error) -> Self {
        Self::Malformed(err.to_string())
    }
}

/// Result type alias for Herald operations
pub type Result<T> = std::result::Result<T, HeraldError>;
