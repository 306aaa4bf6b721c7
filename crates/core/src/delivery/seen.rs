//! Session-scoped record of already-delivered notifications

use std::collections::HashSet;

/// Dedup keys of notifications shown during this session.
///
/// Lives exactly as long as the engine: restarting the engine intentionally
/// forgets delivery history (the OS-level dedup tag still collapses exact
/// repeats). Nothing here is persisted.
#[derive(Debug, Default)]
pub struct SeenTracker {
    delivered: HashSet<String>,
}

impl SeenTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a delivered key. Returns `false` when it was already known.
    pub fn insert(&mut self, key: impl Into<String>) -> bool {
        self.delivered.insert(key.into())
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.delivered.contains(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.delivered.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.delivered.is_empty()
    }
}
