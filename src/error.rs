// src/error.rs
use thiserror::Error;

/// Failures while loading comment batches. Row-level problems never end up
/// here; see [`MalformedRow`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LoadError {
    /// One tabular candidate could not be retrieved or parsed.
    #[error("source unavailable: {location}: {cause}")]
    SourceUnavailable { location: String, cause: String },

    /// Every fallback candidate failed or was empty.
    #[error("all sources exhausted: {last_reason}")]
    AllSourcesExhausted { last_reason: String },

    /// The live backend could not be reached or answered with a failure.
    #[error("live feed unavailable for '{selector}': {reason}")]
    LiveFeedUnavailable { selector: String, reason: String },
}

/// A record that could not be read. Collected per batch and reported in
/// aggregate; the row is excluded and loading continues.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("malformed row {row}: {reason}")]
pub struct MalformedRow {
    /// Zero-based data row position (header excluded).
    pub row: usize,
    pub reason: String,
}

/// Render an error together with its `source()` chain, joined by `": "`.
/// Transport errors keep the useful part ("Connection refused") in the chain.
pub fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut out = err.to_string();
    let mut cur = err.source();
    while let Some(e) = cur {
        let msg = e.to_string();
        if !out.contains(&msg) {
            out.push_str(": ");
            out.push_str(&msg);
        }
        cur = e.source();
    }
    out
}
