// src/analyze/language.rs
use crate::comment::UNKNOWN;

/// ISO 639-1 codes seen in the scraped feeds and their display names.
const LANGUAGE_CODES: &[(&str, &str)] = &[
    ("en", "English"),
    ("hi", "Hindi"),
    ("ta", "Tamil"),
    ("te", "Telugu"),
    ("ml", "Malayalam"),
    ("kn", "Kannada"),
    ("mr", "Marathi"),
    ("gu", "Gujarati"),
    ("bn", "Bengali"),
    ("pa", "Punjabi"),
    ("or", "Odia"),
    ("ur", "Urdu"),
];

/// Resolve a language column to a display name.
///
/// Known codes map to names, known names are re-cased ("hindi" → "Hindi"),
/// anything else passes through trimmed. Empty input yields `Unknown`.
pub fn normalize_language_name(raw: &str) -> String {
    let value = raw.trim();
    if value.is_empty() {
        return UNKNOWN.to_string();
    }

    let lowered = value.to_lowercase();
    if let Some((_, name)) = LANGUAGE_CODES.iter().find(|(code, _)| *code == lowered) {
        return (*name).to_string();
    }
    if let Some((_, name)) = LANGUAGE_CODES
        .iter()
        .find(|(_, name)| name.eq_ignore_ascii_case(value))
    {
        return (*name).to_string();
    }
    if lowered == "unknown" {
        return UNKNOWN.to_string();
    }

    value.to_string()
}
