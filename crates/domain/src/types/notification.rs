//! Notification records and unread-count bookkeeping

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of a Farcaster notification.
///
/// Wire names are lowercase; anything the server sends that we do not know
/// yet deserializes to [`NotificationKind::Other`] so a protocol addition
/// never breaks decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Reply,
    Mention,
    Quote,
    Recast,
    Like,
    Follow,
    #[serde(other)]
    Other,
}

impl NotificationKind {
    /// Every concrete kind the protocol defines today, in wire order.
    /// Excludes the [`NotificationKind::Other`] fallback.
    pub const ALL: [Self; 6] =
        [Self::Reply, Self::Mention, Self::Quote, Self::Recast, Self::Like, Self::Follow];

    /// Lowercase wire token, as used in the `types` query parameter and in
    /// settings keys.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Reply => "reply",
            Self::Mention => "mention",
            Self::Quote => "quote",
            Self::Recast => "recast",
            Self::Like => "like",
            Self::Follow => "follow",
            Self::Other => "other",
        }
    }
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One notification as returned by the list endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationRecord {
    /// Server-assigned stable identifier, when the server provides one.
    #[serde(default)]
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    /// Display name of the most recent actor.
    #[serde(default)]
    pub actor: Option<String>,
    /// Farcaster id of the most recent actor.
    #[serde(default)]
    pub actor_fid: Option<u64>,
    /// Hash of the cast the notification refers to.
    #[serde(default)]
    pub cast_hash: Option<String>,
    /// How many additional actors are aggregated into this record.
    #[serde(default)]
    pub other_count: u64,
    /// Server-side seen flag.
    #[serde(default)]
    pub seen: bool,
    pub occurred_at: DateTime<Utc>,
}

impl NotificationRecord {
    /// Stable key used both as the OS-notification dedup tag and as the
    /// session seen-tracker entry. Falls back to the event timestamp when
    /// the server assigned no id.
    #[must_use]
    pub fn dedup_key(&self) -> String {
        self.id
            .clone()
            .unwrap_or_else(|| self.occurred_at.timestamp_millis().to_string())
    }
}

/// Last two observed unread counts.
///
/// `advance` is the scheduled-poll path: the old count becomes the baseline
/// the next delta is computed against. `rebase` is the mark-seen path: both
/// fields collapse onto the fresh count so an externally caused change can
/// never read as an increase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnreadSnapshot {
    pub count: u64,
    pub previous: u64,
}

impl UnreadSnapshot {
    pub fn advance(&mut self, new_count: u64) {
        self.previous = self.count;
        self.count = new_count;
    }

    pub fn rebase(&mut self, new_count: u64) {
        self.previous = new_count;
        self.count = new_count;
    }

    /// Count growth since the previous observation, if any.
    #[must_use]
    pub const fn increase(&self) -> Option<u64> {
        if self.count > self.previous {
            Some(self.count - self.previous)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_kind_deserializes_to_other() {
        let kind: NotificationKind = serde_json::from_str("\"channel-invite\"").unwrap();
        assert_eq!(kind, NotificationKind::Other);
    }

    #[test]
    fn known_kinds_round_trip_lowercase() {
        for kind in NotificationKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{kind}\""));
            let back: NotificationKind = serde_json::from_str(&json).unwrap();
            assert_eq!(back, kind);
        }
    }

    #[test]
    fn record_decodes_sparse_payload() {
        let record: NotificationRecord = serde_json::from_str(
            r#"{ "type": "like", "occurredAt": "2024-05-04T12:00:00Z" }"#,
        )
        .unwrap();
        assert_eq!(record.kind, NotificationKind::Like);
        assert_eq!(record.id, None);
        assert_eq!(record.other_count, 0);
        assert!(!record.seen);
    }

    #[test]
    fn dedup_key_prefers_server_id() {
        let record: NotificationRecord = serde_json::from_str(
            r#"{ "id": "n-42", "type": "reply", "occurredAt": "2024-05-04T12:00:00Z" }"#,
        )
        .unwrap();
        assert_eq!(record.dedup_key(), "n-42");
    }

    #[test]
    fn dedup_key_falls_back_to_timestamp() {
        let record: NotificationRecord = serde_json::from_str(
            r#"{ "type": "reply", "occurredAt": "2024-05-04T12:00:00Z" }"#,
        )
        .unwrap();
        assert_eq!(record.dedup_key(), record.occurred_at.timestamp_millis().to_string());
    }

    #[test]
    fn advance_tracks_increase() {
        let mut snapshot = UnreadSnapshot::default();
        snapshot.advance(3);
        assert_eq!(snapshot.increase(), Some(3));
        snapshot.advance(5);
        assert_eq!(snapshot.increase(), Some(2));
    }

    #[test]
    fn advance_with_decrease_reports_no_increase() {
        let mut snapshot = UnreadSnapshot { count: 5, previous: 3 };
        snapshot.advance(1);
        assert_eq!(snapshot.increase(), None);
    }

    #[test]
    fn zero_to_zero_is_not_an_increase() {
        let mut snapshot = UnreadSnapshot::default();
        snapshot.advance(0);
        assert_eq!(snapshot.increase(), None);
    }

    #[test]
    fn rebase_collapses_both_fields() {
        let mut snapshot = UnreadSnapshot { count: 7, previous: 2 };
        snapshot.rebase(1);
        assert_eq!(snapshot, UnreadSnapshot { count: 1, previous: 1 });
        assert_eq!(snapshot.increase(), None);
    }
}
