// src/analyze/heuristic.rs
//! Best-effort sentiment for rows that arrive without a usable label or score.
//!
//! Policy:
//! - empty or ≤ 3 chars after trimming → (unknown, 0.0)
//! - no Latin letter at all → (neutral, 0.5); the lexicon only covers Latin
//!   script, so 0.5 means "no evidence", not a measured neutral
//! - otherwise the lexicon score decides the class; confidence starts at 0.55
//!   and rises 0.06 per point, clamped to 1.0

use crate::comment::Sentiment;
use crate::sentiment::SentimentAnalyzer;

pub const MIN_TEXT_CHARS: usize = 4;
pub const UNKNOWN_SCORE: f64 = 0.0;
pub const NO_EVIDENCE_SCORE: f64 = 0.5;
pub const POLARITY_FLOOR: f64 = 0.55;
pub const POLARITY_SLOPE: f64 = 0.06;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Estimate {
    pub sentiment: Sentiment,
    pub score: f64,
}

impl Estimate {
    const fn new(sentiment: Sentiment, score: f64) -> Self {
        Self { sentiment, score }
    }
}

/// Estimate (class, confidence) from raw text.
pub fn estimate(text: &str) -> Estimate {
    let cleaned = text.trim();
    if cleaned.chars().count() < MIN_TEXT_CHARS {
        return Estimate::new(Sentiment::Unknown, UNKNOWN_SCORE);
    }

    if !cleaned.chars().any(|c| c.is_ascii_alphabetic()) {
        return Estimate::new(Sentiment::Neutral, NO_EVIDENCE_SCORE);
    }

    let (raw, _tokens) = SentimentAnalyzer::new().score_text(cleaned);
    match raw.signum() {
        1 => Estimate::new(Sentiment::Positive, confidence(raw)),
        -1 => Estimate::new(Sentiment::Negative, confidence(raw)),
        _ => Estimate::new(Sentiment::Neutral, NO_EVIDENCE_SCORE),
    }
}

fn confidence(raw: i32) -> f64 {
    (POLARITY_FLOOR + f64::from(raw.unsigned_abs()) * POLARITY_SLOPE).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_unknown() {
        for t in ["", "   ", "ok", " ok! ", "abc", "👍👍👍"] {
            assert_eq!(estimate(t), Estimate::new(Sentiment::Unknown, 0.0), "input {t:?}");
        }
    }

    #[test]
    fn non_latin_text_is_neutral_half() {
        let e = estimate("बहुत अच्छा काम");
        assert_eq!(e, Estimate::new(Sentiment::Neutral, 0.5));
        let e = estimate("மிக நல்ல முயற்சி 👍");
        assert_eq!(e, Estimate::new(Sentiment::Neutral, 0.5));
    }

    #[test]
    fn positive_text_gets_floor_plus_slope() {
        let e = estimate("Great initiative!");
        assert_eq!(e.sentiment, Sentiment::Positive);
        assert!((e.score - (0.55 + 3.0 * 0.06)).abs() < 1e-9);
    }

    #[test]
    fn negative_text() {
        let e = estimate("worst portal, useless");
        assert_eq!(e.sentiment, Sentiment::Negative);
        assert!(e.score >= 0.55);
    }

    #[test]
    fn no_polarity_is_neutral() {
        assert_eq!(
            estimate("the meeting is on monday"),
            Estimate::new(Sentiment::Neutral, 0.5)
        );
    }

    #[test]
    fn extreme_scores_saturate_at_one() {
        let text = "awesome amazing outstanding superb brilliant wonderful fantastic";
        let e = estimate(text);
        assert_eq!(e.sentiment, Sentiment::Positive);
        assert_eq!(e.score, 1.0);

        let text = "terrible horrible awful pathetic worst fake corrupt hate";
        let e = estimate(text);
        assert_eq!(e.sentiment, Sentiment::Negative);
        assert_eq!(e.score, 1.0);
    }
}
