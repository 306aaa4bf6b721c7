//! One poll, end to end

use std::sync::Arc;

use herald_domain::{Result, UnreadSnapshot};
use tracing::debug;

use crate::delivery::{planner, DeliveryService, SeenTracker};
use crate::notifications::ports::{NotificationFetcher, UnreadCountClient};
use crate::prefs::PreferenceFilter;

/// Outcome of a completed poll.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PollReport {
    pub unread: u64,
    pub increase: u64,
    pub fetched: usize,
    pub delivered: usize,
}

/// Executes one poll against the ports.
///
/// The cheap count probe always runs; the expensive list fetch only runs
/// when the count rose and device delivery is both wanted and possible.
/// Two-tier by design - most polls cost a single small request.
pub struct PollRunner {
    counts: Arc<dyn UnreadCountClient>,
    fetcher: Arc<dyn NotificationFetcher>,
    prefs: PreferenceFilter,
    delivery: DeliveryService,
    fetch_limit: usize,
}

impl PollRunner {
    pub fn new(
        counts: Arc<dyn UnreadCountClient>,
        fetcher: Arc<dyn NotificationFetcher>,
        prefs: PreferenceFilter,
        delivery: DeliveryService,
        fetch_limit: usize,
    ) -> Self {
        Self { counts, fetcher, prefs, delivery, fetch_limit }
    }

    /// Runs a scheduled poll.
    ///
    /// The snapshot is only advanced once the whole pipeline succeeded: a
    /// fetch failure after a detected increase propagates with the snapshot
    /// untouched, so the next scheduled poll re-detects the same increase
    /// and retries the fetch. No early re-arm happens for that case.
    pub async fn poll_once(
        &self,
        snapshot: &mut UnreadSnapshot,
        seen: &mut SeenTracker,
    ) -> Result<PollReport> {
        let unread = self.counts.unread_count().await?;
        let increase = unread.saturating_sub(snapshot.count);

        let mut fetched = 0;
        let mut delivered = 0;
        if increase > 0 && !self.delivery.is_disabled() {
            let prefs = self.prefs.resolve().await;
            if !prefs.device_enabled {
                debug!("device notifications opted out; skipping fetch");
            } else if prefs.enabled_kinds.is_empty() {
                // Every kind explicitly disabled: nothing could be
                // delivered, and an empty `types` filter must never reach
                // the server (it could read as "no filter").
                debug!("all notification kinds opted out; skipping fetch");
            } else {
                let records =
                    self.fetcher.fetch_notifications(&prefs.enabled_kinds, self.fetch_limit).await?;
                fetched = records.len();
                let window = planner::select_for_delivery(records, increase, self.fetch_limit, seen);
                delivered = self.delivery.deliver(&window, seen).await;
            }
        }

        snapshot.advance(unread);
        Ok(PollReport { unread, increase, fetched, delivered })
    }

    /// Out-of-band count refresh after the host marked notifications seen.
    ///
    /// Rebases the snapshot so the externally caused change can never be
    /// read as an increase. Deliberately does not touch the poll cadence.
    pub async fn resync(&self, snapshot: &mut UnreadSnapshot) -> Result<u64> {
        let unread = self.counts.unread_count().await?;
        snapshot.rebase(unread);
        Ok(unread)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;
    use herald_domain::{
        DeviceAlert, HeraldError, NotificationKind, NotificationRecord, NotificationSettings,
    };

    use super::*;
    use crate::delivery::ports::DeviceNotifier;
    use crate::prefs::ports::SettingsStore;

    struct ScriptedCounts {
        // Responses consumed front to back; the last one repeats.
        script: Mutex<Vec<Result<u64>>>,
        calls: AtomicUsize,
    }

    impl ScriptedCounts {
        fn new(script: Vec<Result<u64>>) -> Arc<Self> {
            Arc::new(Self { script: Mutex::new(script), calls: AtomicUsize::new(0) })
        }
    }

    #[async_trait]
    impl UnreadCountClient for ScriptedCounts {
        async fn unread_count(&self) -> Result<u64> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut script = self.script.lock().unwrap();
            if script.len() > 1 {
                script.remove(0)
            } else {
                script[0].clone()
            }
        }
    }

    struct ScriptedFetcher {
        script: Mutex<Vec<Result<Vec<NotificationRecord>>>>,
        calls: AtomicUsize,
        last_kinds: Mutex<Option<HashSet<NotificationKind>>>,
        last_limit: AtomicUsize,
    }

    impl ScriptedFetcher {
        fn new(script: Vec<Result<Vec<NotificationRecord>>>) -> Arc<Self> {
            Arc::new(Self {
                script: Mutex::new(script),
                calls: AtomicUsize::new(0),
                last_kinds: Mutex::new(None),
                last_limit: AtomicUsize::new(0),
            })
        }

        fn never_called() -> Arc<Self> {
            Self::new(vec![Ok(Vec::new())])
        }
    }

    #[async_trait]
    impl NotificationFetcher for ScriptedFetcher {
        async fn fetch_notifications(
            &self,
            kinds: &HashSet<NotificationKind>,
            limit: usize,
        ) -> Result<Vec<NotificationRecord>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_kinds.lock().unwrap() = Some(kinds.clone());
            self.last_limit.store(limit, Ordering::SeqCst);
            let mut script = self.script.lock().unwrap();
            if script.len() > 1 {
                script.remove(0)
            } else {
                script[0].clone()
            }
        }
    }

    struct OkNotifier {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl DeviceNotifier for OkNotifier {
        async fn show(&self, _alert: &DeviceAlert) -> Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    struct FixedSettings(NotificationSettings);

    #[async_trait]
    impl SettingsStore for FixedSettings {
        async fn load(&self) -> Result<NotificationSettings> {
            Ok(self.0.clone())
        }
    }

    fn settings(json: &str) -> PreferenceFilter {
        PreferenceFilter::new(Arc::new(FixedSettings(serde_json::from_str(json).unwrap())))
    }

    fn records(n: usize) -> Vec<NotificationRecord> {
        (0..n)
            .map(|i| {
                serde_json::from_value(serde_json::json!({
                    "id": format!("n-{i}"),
                    "type": "reply",
                    "actor": "alice",
                    "castHash": "0xabc",
                    "occurredAt": format!("2024-05-04T12:{:02}:00Z", i),
                }))
                .unwrap()
            })
            .collect()
    }

    fn runner(
        counts: Arc<ScriptedCounts>,
        fetcher: Arc<ScriptedFetcher>,
        prefs: PreferenceFilter,
        notifier: Arc<OkNotifier>,
    ) -> PollRunner {
        PollRunner::new(counts, fetcher, prefs, DeliveryService::new(notifier), 25)
    }

    #[tokio::test]
    async fn increase_fetches_and_delivers() {
        let counts = ScriptedCounts::new(vec![Ok(3)]);
        let fetcher = ScriptedFetcher::new(vec![Ok(records(3))]);
        let notifier = Arc::new(OkNotifier { calls: AtomicUsize::new(0) });
        let runner = runner(counts, fetcher.clone(), settings("{}"), notifier.clone());

        let mut snapshot = UnreadSnapshot::default();
        let mut seen = SeenTracker::new();
        let report = runner.poll_once(&mut snapshot, &mut seen).await.unwrap();

        assert_eq!(report, PollReport { unread: 3, increase: 3, fetched: 3, delivered: 3 });
        assert_eq!(snapshot, UnreadSnapshot { count: 3, previous: 0 });
        assert_eq!(notifier.calls.load(Ordering::SeqCst), 3);
        assert_eq!(fetcher.last_limit.load(Ordering::SeqCst), 25);
    }

    #[tokio::test]
    async fn unchanged_count_skips_the_fetch() {
        let counts = ScriptedCounts::new(vec![Ok(4)]);
        let fetcher = ScriptedFetcher::never_called();
        let notifier = Arc::new(OkNotifier { calls: AtomicUsize::new(0) });
        let runner = runner(counts, fetcher.clone(), settings("{}"), notifier);

        let mut snapshot = UnreadSnapshot { count: 4, previous: 4 };
        let mut seen = SeenTracker::new();
        let report = runner.poll_once(&mut snapshot, &mut seen).await.unwrap();

        assert_eq!(report.increase, 0);
        assert_eq!(report.fetched, 0);
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn zero_to_zero_performs_one_request_only() {
        let counts = ScriptedCounts::new(vec![Ok(0)]);
        let fetcher = ScriptedFetcher::never_called();
        let notifier = Arc::new(OkNotifier { calls: AtomicUsize::new(0) });
        let runner = runner(counts.clone(), fetcher.clone(), settings("{}"), notifier);

        let mut snapshot = UnreadSnapshot::default();
        let mut seen = SeenTracker::new();
        runner.poll_once(&mut snapshot, &mut seen).await.unwrap();

        assert_eq!(counts.calls.load(Ordering::SeqCst), 1);
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 0);
        assert_eq!(snapshot, UnreadSnapshot::default());
    }

    #[tokio::test]
    async fn decrease_advances_without_fetching() {
        let counts = ScriptedCounts::new(vec![Ok(1)]);
        let fetcher = ScriptedFetcher::never_called();
        let notifier = Arc::new(OkNotifier { calls: AtomicUsize::new(0) });
        let runner = runner(counts, fetcher.clone(), settings("{}"), notifier);

        let mut snapshot = UnreadSnapshot { count: 5, previous: 2 };
        let mut seen = SeenTracker::new();
        let report = runner.poll_once(&mut snapshot, &mut seen).await.unwrap();

        assert_eq!(report.increase, 0);
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 0);
        assert_eq!(snapshot, UnreadSnapshot { count: 1, previous: 5 });
    }

    #[tokio::test]
    async fn device_opt_out_skips_fetch_but_advances() {
        let counts = ScriptedCounts::new(vec![Ok(7)]);
        let fetcher = ScriptedFetcher::never_called();
        let notifier = Arc::new(OkNotifier { calls: AtomicUsize::new(0) });
        let runner = runner(
            counts,
            fetcher.clone(),
            settings(r#"{ "deviceNotifications": false }"#),
            notifier,
        );

        let mut snapshot = UnreadSnapshot::default();
        let mut seen = SeenTracker::new();
        let report = runner.poll_once(&mut snapshot, &mut seen).await.unwrap();

        assert_eq!(report.increase, 7);
        assert_eq!(report.fetched, 0);
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 0);
        assert_eq!(snapshot.count, 7);
    }

    #[tokio::test]
    async fn all_kinds_disabled_skips_fetch_and_delivers_nothing() {
        let counts = ScriptedCounts::new(vec![Ok(3)]);
        let fetcher = ScriptedFetcher::never_called();
        let notifier = Arc::new(OkNotifier { calls: AtomicUsize::new(0) });
        let runner = runner(
            counts,
            fetcher.clone(),
            settings(
                r#"{ "kinds": {
                    "reply": false, "mention": false, "quote": false,
                    "recast": false, "like": false, "follow": false
                } }"#,
            ),
            notifier.clone(),
        );

        let mut snapshot = UnreadSnapshot::default();
        let mut seen = SeenTracker::new();
        let report = runner.poll_once(&mut snapshot, &mut seen).await.unwrap();

        // The opt-out is total: no fetch goes out (an empty types filter
        // could read server-side as "no filter"), nothing is dispatched,
        // and the snapshot still advances so the badge stays correct.
        assert_eq!(report.increase, 3);
        assert_eq!(report.fetched, 0);
        assert_eq!(report.delivered, 0);
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 0);
        assert_eq!(notifier.calls.load(Ordering::SeqCst), 0);
        assert_eq!(snapshot.count, 3);
    }

    #[tokio::test]
    async fn disabled_kinds_are_excluded_from_the_fetch_filter() {
        let counts = ScriptedCounts::new(vec![Ok(2)]);
        let fetcher = ScriptedFetcher::new(vec![Ok(Vec::new())]);
        let notifier = Arc::new(OkNotifier { calls: AtomicUsize::new(0) });
        let runner = runner(
            counts,
            fetcher.clone(),
            settings(r#"{ "kinds": { "like": false } }"#),
            notifier,
        );

        let mut snapshot = UnreadSnapshot::default();
        let mut seen = SeenTracker::new();
        runner.poll_once(&mut snapshot, &mut seen).await.unwrap();

        let kinds = fetcher.last_kinds.lock().unwrap().clone().unwrap();
        assert!(!kinds.contains(&NotificationKind::Like));
        assert!(kinds.contains(&NotificationKind::Reply));
    }

    #[tokio::test]
    async fn probe_failure_leaves_the_snapshot_untouched() {
        let counts = ScriptedCounts::new(vec![Err(HeraldError::Network("timeout".into()))]);
        let fetcher = ScriptedFetcher::never_called();
        let notifier = Arc::new(OkNotifier { calls: AtomicUsize::new(0) });
        let runner = runner(counts, fetcher, settings("{}"), notifier);

        let mut snapshot = UnreadSnapshot { count: 2, previous: 1 };
        let mut seen = SeenTracker::new();
        let err = runner.poll_once(&mut snapshot, &mut seen).await.unwrap_err();

        assert!(matches!(err, HeraldError::Network(_)));
        assert_eq!(snapshot, UnreadSnapshot { count: 2, previous: 1 });
    }

    #[tokio::test]
    async fn fetch_failure_keeps_the_increase_pending_for_retry() {
        let counts = ScriptedCounts::new(vec![Ok(3), Ok(3)]);
        let fetcher = ScriptedFetcher::new(vec![
            Err(HeraldError::Network("list endpoint down".into())),
            Ok(records(3)),
        ]);
        let notifier = Arc::new(OkNotifier { calls: AtomicUsize::new(0) });
        let runner = runner(counts, fetcher.clone(), settings("{}"), notifier.clone());

        let mut snapshot = UnreadSnapshot::default();
        let mut seen = SeenTracker::new();

        let err = runner.poll_once(&mut snapshot, &mut seen).await.unwrap_err();
        assert!(matches!(err, HeraldError::Network(_)));
        // Snapshot not advanced: the increase is still observable.
        assert_eq!(snapshot, UnreadSnapshot::default());

        // The next scheduled poll re-detects the increase and delivers.
        let report = runner.poll_once(&mut snapshot, &mut seen).await.unwrap();
        assert_eq!(report.increase, 3);
        assert_eq!(report.delivered, 3);
        assert_eq!(notifier.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn already_delivered_records_are_not_redelivered() {
        let counts = ScriptedCounts::new(vec![Ok(2), Ok(4)]);
        let fetcher = ScriptedFetcher::new(vec![Ok(records(2)), Ok(records(4))]);
        let notifier = Arc::new(OkNotifier { calls: AtomicUsize::new(0) });
        let runner = runner(counts, fetcher, settings("{}"), notifier.clone());

        let mut snapshot = UnreadSnapshot::default();
        let mut seen = SeenTracker::new();

        let first = runner.poll_once(&mut snapshot, &mut seen).await.unwrap();
        assert_eq!(first.delivered, 2);

        // Second poll returns the old records plus two new ones; only the
        // new ones are dispatched.
        let second = runner.poll_once(&mut snapshot, &mut seen).await.unwrap();
        assert_eq!(second.increase, 2);
        assert_eq!(second.delivered, 2);
        assert_eq!(notifier.calls.load(Ordering::SeqCst), 4);
        assert_eq!(seen.len(), 4);
    }

    #[tokio::test]
    async fn resync_rebases_and_reports_the_fresh_count() {
        let counts = ScriptedCounts::new(vec![Ok(1)]);
        let fetcher = ScriptedFetcher::never_called();
        let notifier = Arc::new(OkNotifier { calls: AtomicUsize::new(0) });
        let runner = runner(counts, fetcher, settings("{}"), notifier);

        let mut snapshot = UnreadSnapshot { count: 9, previous: 4 };
        let unread = runner.resync(&mut snapshot).await.unwrap();

        assert_eq!(unread, 1);
        assert_eq!(snapshot, UnreadSnapshot { count: 1, previous: 1 });
        assert_eq!(snapshot.increase(), None);
    }
}
