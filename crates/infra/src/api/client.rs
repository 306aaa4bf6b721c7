//! HTTP client for the notification API
//!
//! Implements the three network ports from `herald-core`:
//! - [`UnreadCountClient`] via `GET /notifications/count`
//! - [`NotificationFetcher`] via `GET /notifications`
//! - [`SeenAcknowledger`] via `POST /notifications/mark-seen`
//!
//! Each call makes exactly one attempt. Retry cadence belongs to the poll
//! scheduler's backoff, so a failed request surfaces immediately instead of
//! being retried here.

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use herald_core::{NotificationFetcher, SeenAcknowledger, UnreadCountClient};
use herald_domain::constants::{DEFAULT_API_TIMEOUT_SECS, DEFAULT_USER_AGENT};
use herald_domain::{ApiConfig, HeraldError, NotificationKind, NotificationRecord, Result};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, instrument};

/// Configuration for the API client
#[derive(Debug, Clone)]
pub struct ApiClientConfig {
    /// Base URL of the notification API, without a trailing slash
    pub base_url: String,
    /// Farcaster id of the authenticated user
    pub fid: u64,
    /// Per-request timeout
    pub timeout: Duration,
    /// User-Agent header value
    pub user_agent: String,
}

impl Default for ApiClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            fid: 0,
            timeout: Duration::from_secs(DEFAULT_API_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl From<&ApiConfig> for ApiClientConfig {
    fn from(config: &ApiConfig) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            fid: config.fid,
            timeout: Duration::from_secs(config.timeout_seconds),
            user_agent: config.user_agent.clone(),
        }
    }
}

/// Body of the count endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UnreadCountResponse {
    unread_count: u64,
}

/// Body of the list endpoint.
#[derive(Debug, Deserialize)]
struct NotificationListResponse {
    notifications: Vec<NotificationRecord>,
}

/// Client for the notification API.
pub struct ApiClient {
    client: reqwest::Client,
    config: ApiClientConfig,
}

impl ApiClient {
    /// Create a new API client.
    ///
    /// # Errors
    ///
    /// Returns [`HeraldError::Internal`] if the underlying HTTP client
    /// cannot be constructed.
    pub fn new(config: ApiClientConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| HeraldError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    #[must_use]
    pub fn config(&self) -> &ApiClientConfig {
        &self.config
    }

    /// GET `path` and decode the JSON body.
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let url = format!("{}{}", self.config.base_url, path);
        debug!(url = %url, "GET request");

        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| map_transport_error(&url, &e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(map_status_error(status, &url, &body));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| HeraldError::Malformed(format!("Invalid response from {}: {}", url, e)))
    }

    /// POST `path` with no body, expecting a success status.
    async fn post_ok(&self, path: &str, query: &[(&str, String)]) -> Result<()> {
        let url = format!("{}{}", self.config.base_url, path);
        debug!(url = %url, "POST request");

        let response = self
            .client
            .post(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| map_transport_error(&url, &e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(map_status_error(status, &url, &body));
        }
        Ok(())
    }

    fn user_query(&self) -> (&'static str, String) {
        ("userId", self.config.fid.to_string())
    }
}

/// Classify a transport-level failure.
fn map_transport_error(url: &str, err: &reqwest::Error) -> HeraldError {
    if err.is_timeout() {
        HeraldError::Network(format!("Request to {} timed out", url))
    } else if err.is_connect() {
        HeraldError::Network(format!("Connection to {} failed: {}", url, err))
    } else {
        HeraldError::Network(format!("Request to {} failed: {}", url, err))
    }
}

/// Map a non-success status to an error.
///
/// Every status maps to [`HeraldError::Network`]: at the polling cadence a
/// 500 and a 429 get the same treatment - count the poll as failed and let
/// the backoff stretch the next one. The status and a body snippet are kept
/// for the logs.
fn map_status_error(status: StatusCode, url: &str, body: &str) -> HeraldError {
    let snippet: String = body.chars().take(200).collect();
    HeraldError::Network(format!("HTTP {} from {}: {}", status.as_u16(), url, snippet))
}

#[async_trait]
impl UnreadCountClient for ApiClient {
    #[instrument(skip(self))]
    async fn unread_count(&self) -> Result<u64> {
        let response: UnreadCountResponse =
            self.get_json("/notifications/count", &[self.user_query()]).await?;
        Ok(response.unread_count)
    }
}

#[async_trait]
impl NotificationFetcher for ApiClient {
    #[instrument(skip(self, kinds))]
    async fn fetch_notifications(
        &self,
        kinds: &HashSet<NotificationKind>,
        limit: usize,
    ) -> Result<Vec<NotificationRecord>> {
        let mut query = vec![self.user_query(), ("limit", limit.to_string())];
        // The server default is "all kinds"; only send the filter when the
        // user actually disabled something.
        if kinds.len() < NotificationKind::ALL.len() {
            let mut names: Vec<&str> = kinds.iter().map(|kind| kind.as_str()).collect();
            names.sort_unstable();
            query.push(("types", names.join(",")));
        }

        let response: NotificationListResponse = self.get_json("/notifications", &query).await?;
        Ok(response.notifications)
    }
}

#[async_trait]
impl SeenAcknowledger for ApiClient {
    #[instrument(skip(self))]
    async fn mark_all_seen(&self) -> Result<()> {
        self.post_ok("/notifications/mark-seen", &[self.user_query()]).await
    }
}
