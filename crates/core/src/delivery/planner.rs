//! Delivery window selection

use herald_domain::NotificationRecord;

use super::seen::SeenTracker;

/// Picks the records worth alerting on for one poll.
///
/// Candidates are ordered most-recent-first, records the server already
/// marked seen and records delivered earlier this session are dropped, and
/// the window is bounded by `min(increase, limit)` - the count delta tells
/// us how many notifications can actually be new, and `limit` is all we
/// fetched.
#[must_use]
pub fn select_for_delivery(
    records: Vec<NotificationRecord>,
    increase: u64,
    limit: usize,
    seen: &SeenTracker,
) -> Vec<NotificationRecord> {
    let budget = usize::try_from(increase).unwrap_or(usize::MAX).min(limit);
    let mut fresh: Vec<NotificationRecord> = records
        .into_iter()
        .filter(|record| !record.seen && !seen.contains(&record.dedup_key()))
        .collect();
    fresh.sort_by(|a, b| b.occurred_at.cmp(&a.occurred_at));
    fresh.truncate(budget);
    fresh
}
