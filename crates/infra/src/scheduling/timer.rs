//! Cancellable one-shot deadline

use std::future::pending;
use std::time::Instant;

use tokio::time::sleep_until;

/// A single re-armable deadline.
///
/// [`Alarm::fired`] resolves once the armed deadline passes and pends
/// forever while the alarm is unarmed, which makes it directly usable as a
/// `select!` branch. Arming again overwrites the previous deadline; the
/// driver disarms after a fire and re-arms as directed.
#[derive(Debug, Default)]
pub struct Alarm {
    deadline: Option<Instant>,
}

impl Alarm {
    #[must_use]
    pub fn new() -> Self {
        Self { deadline: None }
    }

    pub fn arm(&mut self, deadline: Instant) {
        self.deadline = Some(deadline);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Waits for the armed deadline. A deadline already in the past fires
    /// immediately.
    pub async fn fired(&self) {
        match self.deadline {
            Some(deadline) => sleep_until(tokio::time::Instant::from_std(deadline)).await,
            None => pending().await,
        }
    }
}
