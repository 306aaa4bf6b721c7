//! Scheduler error types

use herald_domain::HeraldError;
use thiserror::Error;

/// Scheduler-specific errors
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// Scheduler is already running
    #[error("Scheduler already running")]
    AlreadyRunning,

    /// Scheduler is not running
    #[error("Scheduler not running")]
    NotRunning,

    /// Operation timed out
    #[error("Operation timed out after {seconds}s")]
    Timeout { seconds: u64 },

    /// Task join failed
    #[error("Task join failed: {0}")]
    TaskJoinFailed(String),
}

impl From<SchedulerError> for HeraldError {
    fn from(err: SchedulerError) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Convenience type alias for scheduler operations
pub type SchedulerResult<T> = Result<T, SchedulerError>;
