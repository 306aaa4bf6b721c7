//! Failure backoff for the poll cadence

use std::time::Duration;

/// Exponential backoff over the poll interval.
///
/// Starts at the base interval, doubles on each consecutive failure, and is
/// capped at the configured maximum. The first success resets it to base.
#[derive(Debug, Clone)]
pub struct Backoff {
    base: Duration,
    max: Duration,
    current: Duration,
}

impl Backoff {
    pub fn new(base: Duration, max: Duration) -> Self {
        // A cap below the base would make the delay shrink on failure.
        let max = max.max(base);
        Self { base, max, current: base }
    }

    #[must_use]
    pub const fn current(&self) -> Duration {
        self.current
    }

    #[must_use]
    pub const fn base(&self) -> Duration {
        self.base
    }

    /// Whether a failure has stretched the delay beyond the base interval.
    #[must_use]
    pub fn is_elevated(&self) -> bool {
        self.current > self.base
    }

    /// Registers a failed poll.
    pub fn advance(&mut self) {
        self.current = self.current.saturating_mul(2).min(self.max);
    }

    /// Registers a successful poll.
    pub fn reset(&mut self) {
        self.current = self.base;
    }
}
