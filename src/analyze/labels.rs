// src/analyze/labels.rs
//! Raw sentiment tokens → canonical class.
//!
//! Order (first match wins):
//! 1. exact canonical name (case/whitespace-insensitive)
//! 2. known aliases, including the `LABEL_n` ids emitted by three-class models
//! 3. substring `pos` / `neg` / `neu`, checked in that order
//! 4. `unknown`

use crate::comment::Sentiment;

const ALIASES: &[(&str, Sentiment)] = &[
    ("pos", Sentiment::Positive),
    ("neg", Sentiment::Negative),
    ("neu", Sentiment::Neutral),
    ("label_0", Sentiment::Negative),
    ("label_1", Sentiment::Neutral),
    ("label_2", Sentiment::Positive),
];

/// Map any raw label to one of the four canonical classes. Never fails.
pub fn normalize_label(raw: &str) -> Sentiment {
    let label = raw.trim().to_lowercase();

    if let Some(s) = Sentiment::ALL.iter().find(|s| s.as_str() == label) {
        return *s;
    }

    if let Some((_, s)) = ALIASES.iter().find(|(alias, _)| *alias == label) {
        return *s;
    }

    if label.contains("pos") {
        Sentiment::Positive
    } else if label.contains("neg") {
        Sentiment::Negative
    } else if label.contains("neu") {
        Sentiment::Neutral
    } else {
        Sentiment::Unknown
    }
}
