//! Adaptive poll scheduler
//!
//! Drives the whole engine: activity-gated polling with failure backoff,
//! suspension while the user is away, and immediate catch-up when they
//! come back after a full interval.
//!
//! All mutable engine state (activity monitor, poll state machine, unread
//! snapshot, session seen-tracker) lives inside one spawned task. The
//! outside world feeds it [`EngineEvent`]s through a [`SchedulerHandle`]
//! and observes the unread count through a watch channel. Polls run inline
//! in that task, so at most one is ever in flight and events that arrive
//! mid-poll are applied right after it completes.

use std::sync::Arc;
use std::time::{Duration, Instant};

use herald_core::{
    ActivityMonitor, EngagementChange, PollDirective, PollPhase, PollRunner, PollState,
    SeenTracker,
};
use herald_domain::constants::{
    DEFAULT_BASE_INTERVAL_SECS, DEFAULT_IDLE_CHECK_INTERVAL_SECS, DEFAULT_IDLE_THRESHOLD_SECS,
    DEFAULT_MAX_INTERVAL_SECS,
};
use herald_domain::{HeraldConfig, UnreadSnapshot};
use tokio::sync::{mpsc, watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};

use crate::scheduling::error::{SchedulerError, SchedulerResult};
use crate::scheduling::timer::Alarm;

/// Type alias for task handle to avoid complexity warnings
type TaskHandle = Arc<Mutex<Option<JoinHandle<()>>>>;

/// Configuration for the poll scheduler
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Steady-state delay between polls while the user is engaged
    pub base_interval: Duration,
    /// Upper bound the failure backoff may grow to
    pub max_interval: Duration,
    /// Quiet time after the last input before the user counts as idle
    pub idle_threshold: Duration,
    /// How often the idle check runs
    pub idle_check_interval: Duration,
    /// Whether the host view starts out visible
    pub initially_visible: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            base_interval: Duration::from_secs(DEFAULT_BASE_INTERVAL_SECS),
            max_interval: Duration::from_secs(DEFAULT_MAX_INTERVAL_SECS),
            idle_threshold: Duration::from_secs(DEFAULT_IDLE_THRESHOLD_SECS),
            idle_check_interval: Duration::from_secs(DEFAULT_IDLE_CHECK_INTERVAL_SECS),
            initially_visible: true,
        }
    }
}

impl SchedulerConfig {
    /// Build from the engine configuration.
    #[must_use]
    pub fn from_config(config: &HeraldConfig, initially_visible: bool) -> Self {
        Self {
            base_interval: Duration::from_secs(config.poll.base_interval_seconds),
            max_interval: Duration::from_secs(config.poll.max_interval_seconds),
            idle_threshold: Duration::from_secs(config.activity.idle_threshold_seconds),
            idle_check_interval: Duration::from_secs(config.activity.idle_check_interval_seconds),
            initially_visible,
        }
    }
}

/// Host-reported happenings the scheduler reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineEvent {
    /// The user produced input (pointer, key, scroll).
    Input,
    /// The host surface was shown or hidden.
    Visibility(bool),
    /// The host acknowledged all notifications server-side.
    MarkedSeen,
}

/// Cloneable handle into a running scheduler.
///
/// Sending into a stopped scheduler is a silent no-op; the host does not
/// care whether a mouse move made it into a loop that is shutting down.
#[derive(Debug, Clone)]
pub struct SchedulerHandle {
    events: mpsc::UnboundedSender<EngineEvent>,
    unread: watch::Receiver<UnreadSnapshot>,
}

impl SchedulerHandle {
    /// The host observed user input.
    pub fn record_input(&self) {
        self.send(EngineEvent::Input);
    }

    /// The host surface was shown or hidden.
    pub fn set_visibility(&self, visible: bool) {
        self.send(EngineEvent::Visibility(visible));
    }

    /// The host acknowledged all notifications server-side.
    pub fn marked_seen(&self) {
        self.send(EngineEvent::MarkedSeen);
    }

    /// Latest published unread snapshot.
    #[must_use]
    pub fn unread(&self) -> UnreadSnapshot {
        *self.unread.borrow()
    }

    /// Subscribe to unread snapshot updates.
    #[must_use]
    pub fn subscribe_unread(&self) -> watch::Receiver<UnreadSnapshot> {
        self.unread.clone()
    }

    fn send(&self, event: EngineEvent) {
        if self.events.send(event).is_err() {
            debug!(?event, "Scheduler loop is gone; dropping event");
        }
    }
}

/// Context handed to the poll loop to avoid too many arguments (clippy)
struct PollLoopContext {
    runner: Arc<PollRunner>,
    unread_tx: Arc<watch::Sender<UnreadSnapshot>>,
}

/// Poll scheduler with explicit lifecycle management
pub struct PollScheduler {
    runner: Arc<PollRunner>,
    config: SchedulerConfig,
    cancellation_token: CancellationToken,
    task_handle: TaskHandle,
    unread_tx: Arc<watch::Sender<UnreadSnapshot>>,
    unread_rx: watch::Receiver<UnreadSnapshot>,
}

impl PollScheduler {
    /// Create a new poll scheduler
    pub fn new(runner: Arc<PollRunner>, config: SchedulerConfig) -> Self {
        let (unread_tx, unread_rx) = watch::channel(UnreadSnapshot::default());
        Self {
            runner,
            config,
            cancellation_token: CancellationToken::new(),
            task_handle: Arc::new(Mutex::new(None)),
            unread_tx: Arc::new(unread_tx),
            unread_rx,
        }
    }

    /// Start the scheduler
    ///
    /// Spawns the poll loop and returns a handle for feeding it events.
    /// When the view starts out visible, the first poll happens
    /// immediately.
    ///
    /// # Errors
    ///
    /// Returns error if scheduler is already running
    #[instrument(skip(self))]
    pub async fn start(&mut self) -> SchedulerResult<SchedulerHandle> {
        if self.is_running() {
            return Err(SchedulerError::AlreadyRunning);
        }

        info!("Starting poll scheduler");

        // New token and event channel on every start (supports restart
        // after stop; handles from an earlier run go stale).
        self.cancellation_token = CancellationToken::new();
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        let context = PollLoopContext {
            runner: Arc::clone(&self.runner),
            unread_tx: Arc::clone(&self.unread_tx),
        };
        let config = self.config.clone();
        let cancel = self.cancellation_token.clone();

        let handle = tokio::spawn(async move {
            PollLoop::new(context, &config, cancel).run(events_rx).await;
        });

        *self.task_handle.lock().await = Some(handle);

        info!("Poll scheduler started");

        Ok(SchedulerHandle { events: events_tx, unread: self.unread_rx.clone() })
    }

    /// Stop the scheduler gracefully
    ///
    /// Cancels the poll loop and awaits its completion. An in-flight poll
    /// is abandoned rather than awaited.
    ///
    /// # Errors
    ///
    /// Returns error if scheduler is not running
    #[instrument(skip(self))]
    pub async fn stop(&mut self) -> SchedulerResult<()> {
        if !self.is_running() {
            return Err(SchedulerError::NotRunning);
        }

        info!("Stopping poll scheduler");

        self.cancellation_token.cancel();

        if let Some(handle) = self.task_handle.lock().await.take() {
            let join_timeout = Duration::from_secs(5);
            tokio::time::timeout(join_timeout, handle)
                .await
                .map_err(|_| SchedulerError::Timeout { seconds: join_timeout.as_secs() })?
                .map_err(|e| SchedulerError::TaskJoinFailed(e.to_string()))?;
        }

        info!("Poll scheduler stopped");
        Ok(())
    }

    /// Check if scheduler is running
    ///
    /// A scheduler is considered running if it has an active task handle
    /// that hasn't finished.
    pub fn is_running(&self) -> bool {
        self.task_handle
            .try_lock()
            .ok()
            .and_then(|guard| guard.as_ref().map(|h| !h.is_finished()))
            .unwrap_or(false)
    }

    /// Latest published unread snapshot.
    #[must_use]
    pub fn unread(&self) -> UnreadSnapshot {
        *self.unread_rx.borrow()
    }
}

/// Ensure the loop is cancelled when dropped
impl Drop for PollScheduler {
    fn drop(&mut self) {
        if self.is_running() {
            warn!("PollScheduler dropped while running; cancelling");
            self.cancellation_token.cancel();
        }
    }
}

/// State owned by the spawned poll loop.
struct PollLoop {
    runner: Arc<PollRunner>,
    unread_tx: Arc<watch::Sender<UnreadSnapshot>>,
    cancel: CancellationToken,
    monitor: ActivityMonitor,
    state: PollState,
    snapshot: UnreadSnapshot,
    seen: SeenTracker,
    alarm: Alarm,
    idle_check_interval: Duration,
}

impl PollLoop {
    fn new(context: PollLoopContext, config: &SchedulerConfig, cancel: CancellationToken) -> Self {
        Self {
            runner: context.runner,
            unread_tx: context.unread_tx,
            cancel,
            monitor: ActivityMonitor::new(
                config.idle_threshold,
                config.initially_visible,
                Instant::now(),
            ),
            state: PollState::new(config.base_interval, config.max_interval),
            snapshot: UnreadSnapshot::default(),
            seen: SeenTracker::new(),
            alarm: Alarm::new(),
            idle_check_interval: config.idle_check_interval,
        }
    }

    async fn run(mut self, mut events: mpsc::UnboundedReceiver<EngineEvent>) {
        let mut idle_ticks = tokio::time::interval(self.idle_check_interval);
        idle_ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);

        // An engaged session polls immediately on startup.
        if self.monitor.is_engaged() {
            let directive = self.state.activate(Instant::now());
            self.perform(directive).await;
        }

        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => {
                    debug!("Poll loop cancelled");
                    break;
                }
                event = events.recv() => {
                    match event {
                        Some(event) => self.handle_event(event).await,
                        None => {
                            debug!("Event channel closed; stopping poll loop");
                            break;
                        }
                    }
                }
                _ = self.alarm.fired() => {
                    self.alarm.cancel();
                    let directive = self.state.timer_fired(Instant::now());
                    self.perform(directive).await;
                }
                _ = idle_ticks.tick() => {
                    if let Some(change) = self.monitor.check_idle(Instant::now()) {
                        self.handle_engagement(change).await;
                    }
                }
            }
        }
    }

    async fn handle_event(&mut self, event: EngineEvent) {
        match event {
            EngineEvent::Input => {
                if let Some(change) = self.monitor.record_input(Instant::now()) {
                    self.handle_engagement(change).await;
                }
            }
            EngineEvent::Visibility(visible) => {
                debug!(visible, "Visibility changed");
                if let Some(change) = self.monitor.set_visibility(visible, Instant::now()) {
                    self.handle_engagement(change).await;
                }
            }
            EngineEvent::MarkedSeen => self.resync().await,
        }
    }

    /// React to the engagement predicate flipping.
    async fn handle_engagement(&mut self, change: EngagementChange) {
        match change {
            EngagementChange::Engaged => {
                info!("User engaged; resuming polls");
                let now = Instant::now();
                let directive = if self.state.phase() == PollPhase::Suspended {
                    self.state.resume(now)
                } else {
                    self.state.activate(now)
                };
                self.perform(directive).await;
            }
            EngagementChange::Disengaged => {
                info!("User disengaged; suspending polls");
                self.state.suspend();
                self.alarm.cancel();
            }
        }
    }

    /// Execute a directive. A poll that completes produces its own
    /// follow-up directive (re-arm or suspend); it never chains straight
    /// into another poll.
    async fn perform(&mut self, directive: PollDirective) {
        match directive {
            PollDirective::PollNow => {
                if let Some(next) = self.execute_poll().await {
                    self.apply_timer(next);
                }
            }
            other => self.apply_timer(other),
        }
    }

    fn apply_timer(&mut self, directive: PollDirective) {
        match directive {
            PollDirective::ArmAt(due_at) => {
                let delay = due_at.saturating_duration_since(Instant::now());
                debug!(?delay, "Next poll armed");
                self.alarm.arm(due_at);
            }
            PollDirective::PollNow | PollDirective::Hold => {}
        }
    }

    /// Run one poll inline and feed the outcome back into the state
    /// machine. Returns `None` only when shutdown interrupted the poll.
    #[instrument(skip(self))]
    async fn execute_poll(&mut self) -> Option<PollDirective> {
        debug!("Polling for unread notifications");

        let result = tokio::select! {
            _ = self.cancel.cancelled() => {
                debug!("Cancelled mid-poll; abandoning");
                return None;
            }
            result = self.runner.poll_once(&mut self.snapshot, &mut self.seen) => result,
        };

        let success = match result {
            Ok(report) => {
                if report.delivered > 0 {
                    info!(
                        unread = report.unread,
                        increase = report.increase,
                        delivered = report.delivered,
                        "Delivered device alerts"
                    );
                } else {
                    debug!(unread = report.unread, increase = report.increase, "Poll completed");
                }
                self.unread_tx.send_replace(self.snapshot);
                true
            }
            Err(e) => {
                error!(error = %e, class = e.label(), "Poll failed");
                false
            }
        };

        Some(self.state.poll_finished(Instant::now(), success, self.monitor.is_engaged()))
    }

    /// Out-of-band snapshot rebase after the host marked everything seen.
    ///
    /// Touches neither the timers nor the backoff: the armed deadline
    /// keeps its spacing guarantee, and the rebase makes sure the next
    /// scheduled poll cannot read the acknowledgement as an increase.
    async fn resync(&mut self) {
        let result = tokio::select! {
            _ = self.cancel.cancelled() => return,
            result = self.runner.resync(&mut self.snapshot) => result,
        };

        match result {
            Ok(count) => {
                debug!(count, "Unread snapshot rebased after mark-seen");
                self.unread_tx.send_replace(self.snapshot);
            }
            Err(e) => warn!(error = %e, "Resync after mark-seen failed"),
        }
    }
}
