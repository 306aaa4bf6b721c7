//! Poll scheduler state machine
//!
//! Clock-free and side-effect-free: every operation takes the caller's
//! `now` and returns a [`PollDirective`] the driver executes (start a poll,
//! arm the timer, or do nothing). This keeps the suspension and re-arm
//! rules testable without wall-clock sleeps.

use std::time::{Duration, Instant};

use super::backoff::Backoff;

/// Scheduler phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollPhase {
    /// Engine created, never activated.
    Idle,
    /// Waiting for the timer to fire.
    Armed { due_at: Instant },
    /// A poll is in flight.
    Polling,
    /// User inactive or view hidden; no timer pending.
    Suspended,
}

/// What the driver should do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollDirective {
    /// Start a poll immediately.
    PollNow,
    /// Arm the timer for the given deadline.
    ArmAt(Instant),
    /// Nothing to do.
    Hold,
}

/// The poll cadence machine.
///
/// Rules it encodes:
/// - the first activation polls immediately;
/// - after a completed poll the next one is scheduled a full backoff delay
///   out, but only while the user stays engaged;
/// - suspension cancels the pending deadline;
/// - resuming polls immediately only when at least the base interval has
///   passed since the last poll start, else it waits out the remainder.
///
/// Consecutive successful polls can therefore never be closer than the
/// base interval, no matter how often engagement flips.
#[derive(Debug)]
pub struct PollState {
    phase: PollPhase,
    backoff: Backoff,
    base: Duration,
    last_poll_at: Option<Instant>,
}

impl PollState {
    pub fn new(base: Duration, max: Duration) -> Self {
        Self { phase: PollPhase::Idle, backoff: Backoff::new(base, max), base, last_poll_at: None }
    }

    #[must_use]
    pub const fn phase(&self) -> PollPhase {
        self.phase
    }

    #[must_use]
    pub const fn last_poll_at(&self) -> Option<Instant> {
        self.last_poll_at
    }

    /// Delay the next re-arm will use.
    #[must_use]
    pub const fn current_delay(&self) -> Duration {
        self.backoff.current()
    }

    /// First engagement after construction.
    pub fn activate(&mut self, _now: Instant) -> PollDirective {
        match self.phase {
            PollPhase::Idle => {
                self.phase = PollPhase::Polling;
                PollDirective::PollNow
            }
            _ => PollDirective::Hold,
        }
    }

    /// Engagement regained after a suspension.
    pub fn resume(&mut self, now: Instant) -> PollDirective {
        if self.phase != PollPhase::Suspended {
            return PollDirective::Hold;
        }
        match self.last_poll_at {
            None => {
                self.phase = PollPhase::Polling;
                PollDirective::PollNow
            }
            Some(last) if now.saturating_duration_since(last) >= self.base => {
                self.phase = PollPhase::Polling;
                PollDirective::PollNow
            }
            Some(last) => {
                // Wait out the remainder of the base interval, then poll.
                let due_at = last + self.base;
                self.phase = PollPhase::Armed { due_at };
                PollDirective::ArmAt(due_at)
            }
        }
    }

    /// User went inactive or the view was hidden.
    ///
    /// An in-flight poll is left to finish; its completion (with
    /// `engaged == false`) routes to `Suspended` without arming.
    pub fn suspend(&mut self) -> PollDirective {
        match self.phase {
            PollPhase::Idle | PollPhase::Armed { .. } => {
                self.phase = PollPhase::Suspended;
                PollDirective::Hold
            }
            PollPhase::Polling | PollPhase::Suspended => PollDirective::Hold,
        }
    }

    /// The armed timer fired.
    pub fn timer_fired(&mut self, _now: Instant) -> PollDirective {
        match self.phase {
            PollPhase::Armed { .. } => {
                self.phase = PollPhase::Polling;
                PollDirective::PollNow
            }
            // A fire that raced a suspension or shutdown is stale.
            _ => PollDirective::Hold,
        }
    }

    /// A poll completed.
    ///
    /// `last_poll_at` is recorded on success and failure alike; the resume
    /// gate deliberately keys on "when did we last ask", not "when did we
    /// last succeed". Success resets the backoff, failure doubles it.
    pub fn poll_finished(&mut self, now: Instant, success: bool, engaged: bool) -> PollDirective {
        self.last_poll_at = Some(now);
        if success {
            self.backoff.reset();
        } else {
            self.backoff.advance();
        }
        if engaged {
            let due_at = now + self.backoff.current();
            self.phase = PollPhase::Armed { due_at };
            PollDirective::ArmAt(due_at)
        } else {
            self.phase = PollPhase::Suspended;
            PollDirective::Hold
        }
    }
}
