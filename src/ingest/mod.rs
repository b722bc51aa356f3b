// src/ingest/mod.rs
pub mod config;
pub mod fallback;
pub mod live;
pub mod providers;
pub mod tabular;
pub mod types;

use metrics::{describe_counter, describe_gauge, describe_histogram};
use once_cell::sync::OnceCell;

pub use crate::ingest::fallback::resolve_first_non_empty;
pub use crate::ingest::live::{HttpLiveFeed, LiveFeedClient, LiveFeedState, LiveStatus};
pub use crate::ingest::tabular::{load_tabular_source, parse_table};
pub use crate::ingest::types::{SourceBatch, TabularFetcher};

/// One-time metrics registration (so series show up on /metrics).
pub fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("ingest_rows_total", "Rows read from tabular sources.");
        describe_counter!(
            "ingest_rows_dropped_total",
            "Rows dropped by normalization (empty text)."
        );
        describe_counter!(
            "ingest_malformed_rows_total",
            "Records skipped because they could not be read."
        );
        describe_counter!(
            "ingest_source_errors_total",
            "Tabular source fetch/parse failures."
        );
        describe_histogram!("ingest_fetch_ms", "Tabular fetch time in milliseconds.");
        describe_counter!("live_feed_failures_total", "Failed live feed polls.");
        describe_counter!("view_refresh_total", "View load attempts by kind.");
        describe_gauge!("view_last_refresh_ts", "Unix ts of the last published view state.");
        describe_gauge!("view_refresh_interval_secs", "Background refresh period.");
    });
}
