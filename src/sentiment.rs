use once_cell::sync::Lazy;
use std::collections::HashMap;

static LEXICON: Lazy<HashMap<String, i32>> = Lazy::new(|| {
    let raw = include_str!("../sentiment_lexicon.json");
    serde_json::from_str::<HashMap<String, i32>>(raw).expect("valid sentiment lexicon")
});

/// Emoji carry polarity in short comments; each occurrence counts once.
const EMOJI_WEIGHTS: &[(&str, i32)] = &[
    ("😀", 1),
    ("😄", 1),
    ("😊", 1),
    ("👍", 1),
    ("❤", 1),
    ("🔥", 1),
    ("👏", 1),
    ("🙏", 1),
    ("😡", -1),
    ("😞", -1),
    ("👎", -1),
    ("💔", -1),
    ("😢", -1),
    ("😭", -1),
];

/// Lexicon-based polarity scorer. Holds no state; the lexicon is shared and
/// immutable, so one instance can serve any number of callers.
#[derive(Debug, Clone, Copy, Default)]
pub struct SentimentAnalyzer;

impl SentimentAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Lexicon weight for a lower-cased word (0 when absent).
    #[inline]
    fn word_score(&self, w: &str) -> i32 {
        *LEXICON.get(w).unwrap_or(&0)
    }

    /// Returns (score, token count).
    /// Negation: a negator within the previous 1..=3 tokens flips the sign of
    /// a word's lexicon weight.
    pub fn score_text(&self, text: &str) -> (i32, usize) {
        let tokens: Vec<String> = tokenize(text).collect();
        let mut score: i32 = 0;

        for i in 0..tokens.len() {
            let w = tokens[i].as_str();
            let base = self.word_score(w);
            if base == 0 {
                continue;
            }
            let negated = (1..=3).any(|k| i >= k && is_negator(tokens[i - k].as_str()));
            score += if negated { -base } else { base };
        }

        score += emoji_score(text);
        (score, tokens.len())
    }
}

/// Word tokens: alphanumerics plus inner apostrophes, lower-cased.
fn tokenize(s: &str) -> impl Iterator<Item = String> + '_ {
    s.split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .map(|t| t.trim_matches('\''))
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
}

fn emoji_score(text: &str) -> i32 {
    EMOJI_WEIGHTS
        .iter()
        .map(|(e, w)| text.matches(e).count() as i32 * w)
        .sum()
}

fn is_negator(tok: &str) -> bool {
    matches!(
        tok,
        "not"
            | "no"
            | "never"
            | "isn't"
            | "wasn't"
            | "aren't"
            | "won't"
            | "can't"
            | "cannot"
            | "don't"
            | "doesn't"
            | "without"
    )
}
