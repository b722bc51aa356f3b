// src/ingest/live.rs
//! Live backend client.
//!
//! `GET {base}/api/live-comments?source=<selector>&_ts=<nonce>` returns
//! `{comments, last_updated, in_progress, last_error, source_name, gemini_enabled}`.
//! The nonce plus `Cache-Control: no-store` make every poll observe current
//! state. Failures are reported as [`LoadError::LiveFeedUnavailable`]; falling
//! back is the caller's job.

use anyhow::{Context, Result};
use async_trait::async_trait;
use metrics::counter;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::comment::{CanonicalComment, RawRow};
use crate::error::{error_chain, LoadError};
use crate::normalize::normalize_row;

/// Feed-level metadata exposed to the view.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LiveStatus {
    pub in_progress: bool,
    pub last_updated: Option<String>,
    pub last_error: Option<String>,
    pub source_name: String,
    pub gemini_enabled: bool,
}

/// One normalized poll of the live feed.
#[derive(Debug, Clone, PartialEq)]
pub struct LiveFeedState {
    pub comments: Vec<CanonicalComment>,
    pub status: LiveStatus,
}

#[async_trait]
pub trait LiveFeedClient: Send + Sync {
    async fn fetch_live(&self, selector: &str) -> Result<LiveFeedState, LoadError>;

    /// Ask the backend to start a scrape now. Fire-and-forget for callers.
    async fn notify_refresh(&self, selector: &str) -> Result<()>;
}

/// Wire shape of `/api/live-comments`.
#[derive(Debug, Default, Deserialize)]
pub struct LiveFeedPayload {
    #[serde(default)]
    pub comments: Vec<RawRow>,
    #[serde(default)]
    pub last_updated: Option<String>,
    #[serde(default)]
    pub in_progress: bool,
    #[serde(default)]
    pub last_error: Option<String>,
    #[serde(default)]
    pub source_name: Option<String>,
    #[serde(default)]
    pub gemini_enabled: bool,
}

impl LiveFeedPayload {
    /// Normalize every row with `selector` as the id prefix.
    pub fn into_state(self, selector: &str) -> LiveFeedState {
        let comments = self
            .comments
            .iter()
            .enumerate()
            .filter_map(|(i, row)| normalize_row(row, i, selector))
            .collect();
        let source_name = self
            .source_name
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| selector.to_string());
        LiveFeedState {
            comments,
            status: LiveStatus {
                in_progress: self.in_progress,
                last_updated: self.last_updated.filter(|s| !s.trim().is_empty()),
                last_error: self.last_error.filter(|s| !s.trim().is_empty()),
                source_name,
                gemini_enabled: self.gemini_enabled,
            },
        }
    }
}

/// HTTP implementation against the scraper backend.
#[derive(Clone)]
pub struct HttpLiveFeed {
    base_url: String,
    client: reqwest::Client,
}

impl HttpLiveFeed {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("comment-pulse/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(4))
            .timeout(timeout)
            .build()
            .context("building live feed http client")?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    async fn get_payload(&self, selector: &str) -> Result<LiveFeedPayload, String> {
        let nonce = chrono::Utc::now().timestamp_millis().to_string();
        let resp = self
            .client
            .get(format!("{}/api/live-comments", self.base_url))
            .query(&[("source", selector), ("_ts", nonce.as_str())])
            .header(reqwest::header::CACHE_CONTROL, "no-store")
            .send()
            .await
            .map_err(|e| error_chain(&e))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(format!("server responded with status {status}"));
        }
        resp.json::<LiveFeedPayload>()
            .await
            .map_err(|e| format!("invalid live feed payload: {}", error_chain(&e)))
    }
}

#[async_trait]
impl LiveFeedClient for HttpLiveFeed {
    async fn fetch_live(&self, selector: &str) -> Result<LiveFeedState, LoadError> {
        match self.get_payload(selector).await {
            Ok(payload) => {
                let state = payload.into_state(selector);
                tracing::debug!(
                    target: "live",
                    selector,
                    comments = state.comments.len(),
                    in_progress = state.status.in_progress,
                    "live feed polled"
                );
                Ok(state)
            }
            Err(reason) => {
                counter!("live_feed_failures_total").increment(1);
                tracing::warn!(target: "live", selector, %reason, "live feed unavailable");
                Err(LoadError::LiveFeedUnavailable {
                    selector: selector.to_string(),
                    reason,
                })
            }
        }
    }

    async fn notify_refresh(&self, selector: &str) -> Result<()> {
        self.client
            .get(format!("{}/api/refresh-now", self.base_url))
            .query(&[("source", selector)])
            .header(reqwest::header::CACHE_CONTROL, "no-store")
            .send()
            .await
            .context("refresh-now request")?
            .error_for_status()
            .context("refresh-now status")?;
        Ok(())
    }
}
