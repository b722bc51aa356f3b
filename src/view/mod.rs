// src/view/mod.rs
//! Live-vs-local reconciliation behind the dashboard view.
//!
//! Every attempt prefers the live feed; on failure it walks the selector's
//! fallback list and publishes what it found. The published [`ViewSnapshot`]
//! sits in a single `watch` slot: whichever attempt finishes last wins, be it
//! a foreground load (select / manual refresh) or a background tick.

pub mod friendly;

use metrics::{counter, gauge};
use serde::Serialize;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use crate::comment::CanonicalComment;
use crate::error::LoadError;
use crate::ingest::config::SourceCatalog;
use crate::ingest::{resolve_first_non_empty, LiveFeedClient, LiveStatus, TabularFetcher};

pub use friendly::{classify, friendly_reason, FailureKind};

const MIN_REFRESH_PERIOD: Duration = Duration::from_millis(1);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ViewPhase {
    Loading,
    Ready,
    Degraded { reason: String },
    Failed { error: String },
}

/// Everything the presentation layer needs for one render.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewSnapshot {
    pub selector: String,
    pub phase: ViewPhase,
    pub comments: Vec<CanonicalComment>,
    pub live_state: LiveStatus,
    /// Set only while `phase` is `Failed`.
    pub error: Option<String>,
    /// Tabular location that supplied `comments` when degraded.
    pub fallback_location: Option<String>,
    pub malformed_rows: usize,
}

impl ViewSnapshot {
    fn loading(selector: &str, source_name: String, comments: Vec<CanonicalComment>) -> Self {
        Self {
            selector: selector.to_string(),
            phase: ViewPhase::Loading,
            comments,
            live_state: LiveStatus {
                source_name,
                ..LiveStatus::default()
            },
            error: None,
            fallback_location: None,
            malformed_rows: 0,
        }
    }

    fn failed(selector: &str, source_name: String, error: String) -> Self {
        Self {
            selector: selector.to_string(),
            phase: ViewPhase::Failed {
                error: error.clone(),
            },
            comments: Vec::new(),
            live_state: LiveStatus {
                source_name,
                ..LiveStatus::default()
            },
            error: Some(error),
            fallback_location: None,
            malformed_rows: 0,
        }
    }

    pub fn source_name(&self) -> &str {
        &self.live_state.source_name
    }

    pub fn is_settled(&self) -> bool {
        !matches!(self.phase, ViewPhase::Loading)
    }
}

pub struct ViewOrchestrator {
    live: Arc<dyn LiveFeedClient>,
    tabular: Arc<dyn TabularFetcher>,
    catalog: Arc<SourceCatalog>,
    selector: watch::Sender<String>,
    state: watch::Sender<ViewSnapshot>,
}

impl ViewOrchestrator {
    pub fn new(
        live: Arc<dyn LiveFeedClient>,
        tabular: Arc<dyn TabularFetcher>,
        catalog: Arc<SourceCatalog>,
        initial_selector: &str,
    ) -> Self {
        crate::ingest::ensure_metrics_described();
        let name = display_name(&catalog, initial_selector);
        let (state, _) = watch::channel(ViewSnapshot::loading(initial_selector, name, Vec::new()));
        let (selector, _) = watch::channel(initial_selector.to_string());
        Self {
            live,
            tabular,
            catalog,
            selector,
            state,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<ViewSnapshot> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> ViewSnapshot {
        self.state.borrow().clone()
    }

    pub fn selector(&self) -> String {
        self.selector.borrow().clone()
    }

    pub fn catalog(&self) -> &SourceCatalog {
        &self.catalog
    }

    /// Switch to `selector` and load it in the foreground.
    pub async fn select(&self, selector: &str) -> ViewSnapshot {
        let previous = self.selector.send_replace(selector.to_string());
        tracing::info!(target: "view", from = %previous, to = selector, "selector changed");
        self.foreground(selector, previous == selector).await
    }

    /// Manual refresh: nudge the backend to scrape, then reload in the foreground.
    pub async fn refresh_now(&self) -> ViewSnapshot {
        let selector = self.selector();
        if self.catalog.contains(&selector) {
            if let Err(e) = self.live.notify_refresh(&selector).await {
                tracing::debug!(
                    target: "view",
                    selector = %selector,
                    error = %format!("{e:#}"),
                    "refresh-now notify failed"
                );
            }
        }
        self.foreground(&selector, true).await
    }

    /// Timer tick: re-run the attempt without publishing `Loading`.
    pub async fn background_refresh(&self) -> ViewSnapshot {
        let selector = self.selector();
        counter!("view_refresh_total", "kind" => "background").increment(1);
        let snap = self.attempt(&selector).await;
        self.publish(snap.clone());
        snap
    }

    /// Run [`Self::background_refresh`] every `period` (at least 1ms),
    /// starting one period from now. The task stops when the returned handle
    /// is dropped or the orchestrator itself goes away.
    pub fn spawn_refresh_timer(self: &Arc<Self>, period: Duration) -> RefreshTimer {
        let period = period.max(MIN_REFRESH_PERIOD);
        let weak: Weak<Self> = Arc::downgrade(self);
        let handle = tokio::spawn(async move {
            let mut ticks = interval_at(Instant::now() + period, period);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticks.tick().await;
                let Some(view) = weak.upgrade() else {
                    break;
                };
                view.background_refresh().await;
            }
            tracing::debug!(target: "view", "refresh timer stopped");
        });
        RefreshTimer { handle }
    }

    async fn foreground(&self, selector: &str, keep_comments: bool) -> ViewSnapshot {
        counter!("view_refresh_total", "kind" => "foreground").increment(1);
        if self.catalog.contains(selector) {
            let comments = if keep_comments {
                self.state.borrow().comments.clone()
            } else {
                Vec::new()
            };
            let name = display_name(&self.catalog, selector);
            self.state.send_replace(ViewSnapshot::loading(selector, name, comments));
        }
        let snap = self.attempt(selector).await;
        self.publish(snap.clone());
        snap
    }

    async fn attempt(&self, selector: &str) -> ViewSnapshot {
        let Some(entry) = self.catalog.get(selector) else {
            tracing::warn!(target: "view", selector, "unknown source selected");
            return ViewSnapshot::failed(
                selector,
                selector.to_string(),
                format!("unknown source '{selector}'"),
            );
        };

        let err = match self.live.fetch_live(selector).await {
            Ok(state) => {
                return ViewSnapshot {
                    selector: selector.to_string(),
                    phase: ViewPhase::Ready,
                    comments: state.comments,
                    live_state: state.status,
                    error: None,
                    fallback_location: None,
                    malformed_rows: 0,
                };
            }
            Err(e) => e,
        };
        let raw_reason = match err {
            LoadError::LiveFeedUnavailable { reason, .. } => reason,
            other => other.to_string(),
        };

        match resolve_first_non_empty(self.tabular.as_ref(), &entry.fallback, selector).await {
            Ok(batch) => {
                let reason = friendly_reason(&raw_reason);
                tracing::info!(
                    target: "view",
                    selector,
                    location = %batch.location,
                    comments = batch.comments.len(),
                    "serving local data"
                );
                ViewSnapshot {
                    selector: selector.to_string(),
                    phase: ViewPhase::Degraded { reason },
                    comments: batch.comments,
                    live_state: LiveStatus {
                        in_progress: false,
                        last_updated: None,
                        last_error: Some(raw_reason),
                        source_name: entry.name.clone(),
                        gemini_enabled: false,
                    },
                    error: None,
                    fallback_location: Some(batch.location),
                    malformed_rows: batch.malformed.len(),
                }
            }
            Err(exhausted) => {
                tracing::warn!(target: "view", selector, error = %exhausted, "no data available");
                ViewSnapshot::failed(
                    selector,
                    entry.name.clone(),
                    format!("Live feed and local data are both unavailable: {exhausted}"),
                )
            }
        }
    }

    fn publish(&self, snap: ViewSnapshot) {
        gauge!("view_last_refresh_ts").set(chrono::Utc::now().timestamp() as f64);
        self.state.send_replace(snap);
    }
}

fn display_name(catalog: &SourceCatalog, selector: &str) -> String {
    catalog
        .get(selector)
        .map(|e| e.name.clone())
        .unwrap_or_else(|| selector.to_string())
}

/// Owns the background refresh task; aborts it on drop.
pub struct RefreshTimer {
    handle: JoinHandle<()>,
}

impl RefreshTimer {
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for RefreshTimer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
