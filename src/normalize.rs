//! Row normalizer: one raw row in, at most one [`CanonicalComment`] out.
//!
//! Steps:
//! 1. clean + trim `text`; drop the row when nothing is left
//! 2. reconcile the supplied label, parse the supplied score
//! 3. if the label is `unknown` or the score is missing, run the heuristic
//!    estimator and fill only the gaps (a known label is never overwritten)
//! 4. default a still-missing score to 0, clamp to [0, 1]
//! 5. trim-and-default author / lang / summary, id = `"<source>-<index>"`
//!
//! Nothing in here fails or performs I/O.

use once_cell::sync::OnceCell;
use regex::Regex;
use std::borrow::Cow;

use crate::analyze::{estimate, normalize_label, normalize_language_name};
use crate::comment::{CanonicalComment, RawRow, Sentiment, UNKNOWN};

/// Author strings the scraper emits when no real name was found.
const PLACEHOLDER_AUTHORS: &[&str] = &["unknown", "default icon for user", "home", "user"];

/// Normalize one row. `index` is the row's position in its batch before any
/// filtering; `source` prefixes the id.
pub fn normalize_row(row: &RawRow, index: usize, source: &str) -> Option<CanonicalComment> {
    let text = clean_text(row.text.as_deref().unwrap_or_default());
    if text.is_empty() {
        return None;
    }

    let mut sentiment = normalize_label(row.sentiment.as_deref().unwrap_or_default());
    let mut score = row.sentiment_score.as_deref().and_then(parse_score);

    if !sentiment.is_known() || score.is_none() {
        let est = estimate(&text);
        tracing::trace!(
            target: "normalize",
            text_id = %anon_hash(&text),
            supplied = %sentiment,
            estimated = %est.sentiment,
            score = est.score,
            "estimator filled gap"
        );
        if !sentiment.is_known() {
            sentiment = est.sentiment;
        }
        if score.is_none() {
            score = Some(est.score);
        }
    }

    let sentiment_score = score.unwrap_or(0.0).clamp(0.0, 1.0);

    let author = normalize_author(row.author.as_deref().unwrap_or_default());
    let lang = normalize_language_name(row.lang.as_deref().unwrap_or_default());
    let summary = match clean_text(row.summary.as_deref().unwrap_or_default()) {
        s if s.is_empty() => text.clone(),
        s => s,
    };
    let timestamp = row.timestamp.as_deref().unwrap_or_default().trim().to_string();

    Some(CanonicalComment {
        id: format!("{source}-{index}"),
        author,
        timestamp,
        text,
        lang,
        sentiment,
        sentiment_score,
        summary,
    })
}

/// Normalize a whole batch, positions taken from the slice order.
pub fn normalize_rows(rows: &[RawRow], source: &str) -> Vec<CanonicalComment> {
    rows.iter()
        .enumerate()
        .filter_map(|(i, r)| normalize_row(r, i, source))
        .collect()
}

/// Parse a supplied score. Non-numeric, empty and non-finite values count as
/// missing.
pub fn parse_score(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Decode HTML entities, repair UTF-8-read-as-Latin-1 text, collapse runs
/// of whitespace, trim.
pub fn clean_text(raw: &str) -> String {
    static RE_WS: OnceCell<Regex> = OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| Regex::new(r"\s+").expect("whitespace regex"));

    let decoded = html_escape::decode_html_entities(raw);
    let repaired = repair_mojibake(&decoded);
    re_ws.replace_all(repaired.trim(), " ").into_owned()
}

/// Scraped pages are sometimes decoded as Latin-1, turning "é" into "Ã©".
/// When the telltale lead characters appear and every char fits in one byte,
/// re-read those bytes as UTF-8. Anything that does not round-trip is left
/// unchanged.
pub fn repair_mojibake(s: &str) -> Cow<'_, str> {
    if !s.contains(['Ã', 'Â', 'â']) {
        return Cow::Borrowed(s);
    }
    let bytes: Option<Vec<u8>> = s.chars().map(|c| u8::try_from(u32::from(c)).ok()).collect();
    match bytes.and_then(|b| String::from_utf8(b).ok()) {
        Some(fixed) => Cow::Owned(fixed),
        None => Cow::Borrowed(s),
    }
}

fn normalize_author(raw: &str) -> String {
    let author = clean_text(raw);
    let lowered = author.to_lowercase();
    if author.is_empty() || PLACEHOLDER_AUTHORS.contains(&lowered.as_str()) {
        UNKNOWN.to_string()
    } else {
        author
    }
}

/// Short SHA-256 prefix so logs can correlate comments without carrying text.
pub(crate) fn anon_hash(text: &str) -> String {
    use sha2::{Digest, Sha256};
    let digest = Sha256::digest(text.as_bytes());
    let mut out = String::with_capacity(12);
    for b in digest.iter().take(6) {
        use std::fmt::Write as _;
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}
