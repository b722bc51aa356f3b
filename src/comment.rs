//! Comment records: the loosely-typed row as it arrives from a scraper export or
//! the live backend, and the canonical record every downstream view consumes.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Sentinel used for missing author and language values.
pub const UNKNOWN: &str = "Unknown";

/// One of exactly four sentiment classes. Free-text labels never leave the
/// normalizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
    #[default]
    Unknown,
}

impl Sentiment {
    pub const ALL: [Sentiment; 4] = [
        Sentiment::Positive,
        Sentiment::Negative,
        Sentiment::Neutral,
        Sentiment::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Negative => "negative",
            Sentiment::Neutral => "neutral",
            Sentiment::Unknown => "unknown",
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Sentiment::Unknown)
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A row exactly as a source produced it. Every column is optional; the row
/// normalizer is the only place that fills defaults.
///
/// Live payloads sometimes carry `sentiment_score` as a JSON number, so every
/// field accepts strings, numbers and booleans and keeps them as text.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawRow {
    #[serde(default, deserialize_with = "lenient_text")]
    pub author: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub timestamp: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub text: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub lang: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub sentiment: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub sentiment_score: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub summary: Option<String>,
}

impl RawRow {
    /// Assign a named column. Unknown column names are ignored.
    pub fn set(&mut self, column: &str, value: &str) {
        let slot = match column {
            "author" => &mut self.author,
            "timestamp" => &mut self.timestamp,
            "text" => &mut self.text,
            "lang" => &mut self.lang,
            "sentiment" => &mut self.sentiment,
            "sentiment_score" => &mut self.sentiment_score,
            "summary" => &mut self.summary,
            _ => return,
        };
        *slot = Some(value.to_string());
    }
}

fn lenient_text<'de, D>(de: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Option::<serde_json::Value>::deserialize(de)?;
    Ok(match v {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        Some(serde_json::Value::Bool(b)) => Some(b.to_string()),
        // Arrays/objects carry no usable column value.
        Some(_) => None,
    })
}

/// The normalized comment. Built once per raw row and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalComment {
    pub id: String,
    pub author: String,
    pub timestamp: String,
    pub text: String,
    pub lang: String,
    pub sentiment: Sentiment,
    pub sentiment_score: f64,
    pub summary: String,
}
