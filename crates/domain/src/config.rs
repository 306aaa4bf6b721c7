//! Configuration management

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_API_TIMEOUT_SECS, DEFAULT_BASE_INTERVAL_SECS, DEFAULT_FETCH_LIMIT,
    DEFAULT_IDLE_CHECK_INTERVAL_SECS, DEFAULT_IDLE_THRESHOLD_SECS, DEFAULT_MAX_INTERVAL_SECS,
    DEFAULT_SETTINGS_PATH, DEFAULT_USER_AGENT,
};
use crate::errors::{HeraldError, Result};

/// Engine configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HeraldConfig {
    pub api: ApiConfig,
    pub poll: PollConfig,
    pub activity: ActivityConfig,
    pub delivery: DeliveryConfig,
    pub settings: SettingsConfig,
}

/// Remote notification API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the notification API, without a trailing slash.
    pub base_url: String,
    /// Farcaster id of the authenticated user.
    pub fid: u64,
    pub timeout_seconds: u64,
    pub user_agent: String,
}

/// Polling cadence configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PollConfig {
    /// Steady-state delay between polls while the user is engaged.
    pub base_interval_seconds: u64,
    /// Upper bound the failure backoff may grow to.
    pub max_interval_seconds: u64,
}

/// Activity monitoring configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ActivityConfig {
    /// Quiet time after the last input before the user counts as idle.
    pub idle_threshold_seconds: u64,
    /// How often the idle check runs.
    pub idle_check_interval_seconds: u64,
}

/// Delivery configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DeliveryConfig {
    /// Page size for the full notification fetch.
    pub fetch_limit: usize,
}

/// Persisted notification settings location
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsConfig {
    pub path: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            fid: 0,
            timeout_seconds: DEFAULT_API_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            base_interval_seconds: DEFAULT_BASE_INTERVAL_SECS,
            max_interval_seconds: DEFAULT_MAX_INTERVAL_SECS,
        }
    }
}

impl Default for ActivityConfig {
    fn default() -> Self {
        Self {
            idle_threshold_seconds: DEFAULT_IDLE_THRESHOLD_SECS,
            idle_check_interval_seconds: DEFAULT_IDLE_CHECK_INTERVAL_SECS,
        }
    }
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self { fetch_limit: DEFAULT_FETCH_LIMIT }
    }
}

impl Default for SettingsConfig {
    fn default() -> Self {
        Self { path: DEFAULT_SETTINGS_PATH.to_string() }
    }
}

impl HeraldConfig {
    /// Checks cross-field consistency. Called after loading, before any
    /// component consumes the values.
    ///
    /// # Errors
    ///
    /// Returns [`HeraldError::Config`] when an interval is zero or the
    /// backoff cap is below the base interval.
    pub fn validate(&self) -> Result<()> {
        if self.poll.base_interval_seconds == 0 {
            return Err(HeraldError::Config("poll.base_interval_seconds must be positive".into()));
        }
        if self.poll.max_interval_seconds < self.poll.base_interval_seconds {
            return Err(HeraldError::Config(
                "poll.max_interval_seconds must be >= poll.base_interval_seconds".into(),
            ));
        }
        if self.activity.idle_threshold_seconds == 0 {
            return Err(HeraldError::Config(
                "activity.idle_threshold_seconds must be positive".into(),
            ));
        }
        if self.activity.idle_check_interval_seconds == 0 {
            return Err(HeraldError::Config(
                "activity.idle_check_interval_seconds must be positive".into(),
            ));
        }
        if self.delivery.fetch_limit == 0 {
            return Err(HeraldError::Config("delivery.fetch_limit must be positive".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_cadence() {
        let config = HeraldConfig::default();
        assert_eq!(config.poll.base_interval_seconds, 300);
        assert_eq!(config.poll.max_interval_seconds, 600);
        assert_eq!(config.activity.idle_threshold_seconds, 180);
        assert_eq!(config.delivery.fetch_limit, 25);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_rejects_zero_base_interval() {
        let mut config = HeraldConfig::default();
        config.poll.base_interval_seconds = 0;
        assert!(matches!(config.validate(), Err(HeraldError::Config(_))));
    }

    #[test]
    fn validate_rejects_cap_below_base() {
        let mut config = HeraldConfig::default();
        config.poll.base_interval_seconds = 600;
        config.poll.max_interval_seconds = 300;
        assert!(matches!(config.validate(), Err(HeraldError::Config(_))));
    }

    #[test]
    fn partial_file_fills_missing_sections_with_defaults() {
        let config: HeraldConfig =
            serde_json::from_str(r#"{ "poll": { "base_interval_seconds": 60 } }"#).unwrap();
        assert_eq!(config.poll.base_interval_seconds, 60);
        // Unspecified fields keep their defaults.
        assert_eq!(config.poll.max_interval_seconds, 600);
        assert_eq!(config.activity.idle_threshold_seconds, 180);
    }
}
