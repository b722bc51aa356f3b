// tests/normalize_scenarios.rs
use comment_pulse::analyze::{estimate, normalize_label};
use comment_pulse::{normalize_row, normalize_rows, RawRow, Sentiment};

fn row(pairs: &[(&str, &str)]) -> RawRow {
    let mut r = RawRow::default();
    for (k, v) in pairs {
        r.set(k, v);
    }
    r
}

#[test]
fn unlabeled_praise_is_positive() {
    let c = normalize_row(&row(&[("text", "Great initiative!")]), 0, "site1").unwrap();
    assert_eq!(c.sentiment, Sentiment::Positive);
    assert!(c.sentiment_score >= 0.55);
    assert_eq!(c.author, "Unknown");
    assert_eq!(c.lang, "Unknown");
    assert_eq!(c.summary, "Great initiative!");
    assert_eq!(c.id, "site1-0");
}

#[test]
fn model_label_and_score_are_kept() {
    let c = normalize_row(
        &row(&[("text", "ok"), ("sentiment", "LABEL_2"), ("sentiment_score", "0.9")]),
        4,
        "site2",
    )
    .unwrap();
    assert_eq!(c.sentiment, Sentiment::Positive);
    assert_eq!(c.sentiment_score, 0.9);
    assert_eq!(c.id, "site2-4");
}

#[test]
fn empty_text_drops_the_row() {
    assert!(normalize_row(&row(&[("text", ""), ("sentiment", "positive")]), 0, "s").is_none());
    assert!(normalize_row(&row(&[("sentiment", "positive")]), 0, "s").is_none());
}

#[test]
fn known_label_is_never_overwritten_by_the_estimator() {
    let c = normalize_row(
        &row(&[("text", "This is great, thank you"), ("sentiment", "negative")]),
        0,
        "s",
    )
    .unwrap();
    assert_eq!(c.sentiment, Sentiment::Negative);
    // score was missing, so it comes from the estimator
    assert!(c.sentiment_score > 0.55);
}

#[test]
fn scores_are_clamped() {
    let hi = normalize_row(
        &row(&[("text", "fine words"), ("sentiment", "positive"), ("sentiment_score", "7")]),
        0,
        "s",
    )
    .unwrap();
    assert_eq!(hi.sentiment_score, 1.0);
    let lo = normalize_row(
        &row(&[("text", "fine words"), ("sentiment", "neutral"), ("sentiment_score", "-3")]),
        0,
        "s",
    )
    .unwrap();
    assert_eq!(lo.sentiment_score, 0.0);
}

#[test]
fn batch_drops_exactly_the_empty_rows() {
    let rows = vec![
        row(&[("text", "first comment here")]),
        row(&[("text", "   ")]),
        row(&[("text", "third comment here")]),
        row(&[]),
    ];
    let out = normalize_rows(&rows, "s");
    let ids: Vec<_> = out.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, ["s-0", "s-2"]);
}

#[test]
fn label_normalization_is_idempotent_on_canonical_names() {
    for s in Sentiment::ALL {
        assert_eq!(normalize_label(s.as_str()), s);
        assert_eq!(normalize_label(&s.as_str().to_uppercase()), s);
    }
    assert_eq!(normalize_label("Very Positive"), Sentiment::Positive);
    assert_eq!(normalize_label("???"), Sentiment::Unknown);
}

#[test]
fn estimator_edges() {
    assert_eq!(estimate("ok").sentiment, Sentiment::Unknown);
    assert_eq!(estimate("ok").score, 0.0);
    let e = estimate("सराहनीय पहल");
    assert_eq!((e.sentiment, e.score), (Sentiment::Neutral, 0.5));
}

#[test]
fn text_repair_is_applied() {
    let c = normalize_row(
        &row(&[("text", "The cafÃ© is a  good &quot;step&quot;"), ("author", "home")]),
        0,
        "s",
    )
    .unwrap();
    assert_eq!(c.text, "The café is a good \"step\"");
    assert_eq!(c.author, "Unknown");
}
