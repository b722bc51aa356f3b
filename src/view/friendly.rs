// src/view/friendly.rs
//! User-facing wording for live feed failures. Raw transport errors are
//! classified by their text so the view can say "showing local data" without
//! alarming detail in the common cases.

use once_cell::sync::Lazy;
use regex::Regex;

const LOCAL_DATA_SUFFIX: &str = "Showing local data from the last saved export.";

const UNREACHABLE_MARKERS: &[&str] = &[
    "connection refused",
    "error sending request",
    "tcp connect error",
    "dns error",
    "failed to fetch",
    "networkerror",
    "unreachable",
];

// Checked before the unreachable markers: reqwest timeouts also read
// "error sending request".
const TIMEOUT_MARKERS: &[&str] = &["timed out", "timeout"];

static SERVER_STATUS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bstatus\s+5\d\d\b|server error").expect("status regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Unreachable,
    Timeout,
    ServerError,
    Other,
}

pub fn classify(error_text: &str) -> FailureKind {
    let lowered = error_text.to_lowercase();
    if TIMEOUT_MARKERS.iter().any(|m| lowered.contains(m)) {
        FailureKind::Timeout
    } else if UNREACHABLE_MARKERS.iter().any(|m| lowered.contains(m)) {
        FailureKind::Unreachable
    } else if SERVER_STATUS.is_match(&lowered) {
        FailureKind::ServerError
    } else {
        FailureKind::Other
    }
}

/// Reason string shown alongside fallback data.
pub fn friendly_reason(error_text: &str) -> String {
    match classify(error_text) {
        FailureKind::Unreachable => {
            format!("Live backend is not running. {LOCAL_DATA_SUFFIX}")
        }
        FailureKind::Timeout => {
            format!("Live backend is slow to respond. {LOCAL_DATA_SUFFIX}")
        }
        FailureKind::ServerError => {
            format!("Live backend returned a server error. {LOCAL_DATA_SUFFIX}")
        }
        FailureKind::Other => {
            format!("Live feed unavailable ({}). {LOCAL_DATA_SUFFIX}", error_text.trim())
        }
    }
}
