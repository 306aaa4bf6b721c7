//! Port interfaces for the remote notification API
//!
//! These traits define the boundary between core polling logic and the
//! HTTP infrastructure. The probe and the full fetch are deliberately
//! separate operations: the count endpoint is cheap and hit on every poll,
//! the list endpoint is expensive and hit only when the count rises.

use std::collections::HashSet;

use async_trait::async_trait;
use herald_domain::{NotificationKind, NotificationRecord, Result};

/// Cheap unread-count probe.
#[async_trait]
pub trait UnreadCountClient: Send + Sync {
    /// Current unread notification count for the configured user.
    async fn unread_count(&self) -> Result<u64>;
}

/// Full typed notification fetch.
#[async_trait]
pub trait NotificationFetcher: Send + Sync {
    /// Fetch the newest notifications, restricted to the given kinds.
    ///
    /// An empty result is valid (the increase may consist entirely of
    /// kinds the user disabled).
    async fn fetch_notifications(
        &self,
        kinds: &HashSet<NotificationKind>,
        limit: usize,
    ) -> Result<Vec<NotificationRecord>>;
}

/// Server-side seen acknowledgement.
#[async_trait]
pub trait SeenAcknowledger: Send + Sync {
    /// Mark every notification seen for the configured user.
    async fn mark_all_seen(&self) -> Result<()>;
}
