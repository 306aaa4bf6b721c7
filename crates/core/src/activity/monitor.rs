//! Engagement tracking - combines input recency with view visibility

use std::time::{Duration, Instant};

use herald_domain::ActivityState;

/// Emitted when the combined active-and-visible predicate flips.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngagementChange {
    Engaged,
    Disengaged,
}

/// Tracks user activity and view visibility.
///
/// Owned by the scheduler actor; every method takes the caller's `now` so
/// the idle logic stays deterministic under test. The user counts as idle
/// once the quiet time since the last input reaches the configured
/// threshold; visibility changes arrive from the host.
#[derive(Debug)]
pub struct ActivityMonitor {
    user_active: bool,
    view_visible: bool,
    last_input: Instant,
    idle_threshold: Duration,
}

impl ActivityMonitor {
    pub fn new(idle_threshold: Duration, initially_visible: bool, now: Instant) -> Self {
        Self { user_active: true, view_visible: initially_visible, last_input: now, idle_threshold }
    }

    /// The host observed user input (pointer, key, scroll).
    pub fn record_input(&mut self, now: Instant) -> Option<EngagementChange> {
        let was_engaged = self.is_engaged();
        self.user_active = true;
        self.last_input = now;
        self.flip_from(was_engaged)
    }

    /// The host surface was shown or hidden.
    ///
    /// Regaining visibility also counts as fresh input: the user came back
    /// to the view, so an earlier idle verdict no longer applies.
    pub fn set_visibility(&mut self, visible: bool, now: Instant) -> Option<EngagementChange> {
        let was_engaged = self.is_engaged();
        self.view_visible = visible;
        if visible {
            self.user_active = true;
            self.last_input = now;
        }
        self.flip_from(was_engaged)
    }

    /// Periodic idle check.
    pub fn check_idle(&mut self, now: Instant) -> Option<EngagementChange> {
        let was_engaged = self.is_engaged();
        if self.user_active && now.saturating_duration_since(self.last_input) >= self.idle_threshold
        {
            self.user_active = false;
        }
        self.flip_from(was_engaged)
    }

    #[must_use]
    pub fn state(&self) -> ActivityState {
        ActivityState { user_active: self.user_active, view_visible: self.view_visible }
    }

    #[must_use]
    pub fn is_engaged(&self) -> bool {
        self.user_active && self.view_visible
    }

    fn flip_from(&self, was_engaged: bool) -> Option<EngagementChange> {
        match (was_engaged, self.is_engaged()) {
            (false, true) => Some(EngagementChange::Engaged),
            (true, false) => Some(EngagementChange::Disengaged),
            _ => None,
        }
    }
}
