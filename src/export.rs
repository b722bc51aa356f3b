// src/export.rs
//! Delimited-text export of the comments currently on screen.

use anyhow::{Context, Result};
use std::io::Write;

use crate::comment::{CanonicalComment, Sentiment};

pub const EXPORT_COLUMNS: [&str; 8] = [
    "source",
    "author",
    "language",
    "sentiment",
    "sentiment_score",
    "timestamp",
    "comment",
    "summary",
];

/// Optional narrowing applied before export. `None` means "all".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportFilter {
    pub sentiment: Option<Sentiment>,
    pub lang: Option<String>,
}

impl ExportFilter {
    /// Build from loose query values; empty or `all` disables a filter.
    /// An unrecognized sentiment name is an error rather than an empty export.
    pub fn from_query(sentiment: Option<&str>, lang: Option<&str>) -> Result<Self> {
        let active = |v: Option<&str>| {
            v.map(str::trim)
                .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("all"))
                .map(str::to_string)
        };
        let sentiment = match active(sentiment) {
            Some(name) => Some(
                Sentiment::ALL
                    .into_iter()
                    .find(|s| s.as_str().eq_ignore_ascii_case(&name))
                    .with_context(|| format!("unknown sentiment filter '{name}'"))?,
            ),
            None => None,
        };
        Ok(Self {
            sentiment,
            lang: active(lang),
        })
    }

    pub fn matches(&self, c: &CanonicalComment) -> bool {
        self.sentiment.map_or(true, |s| c.sentiment == s)
            && self
                .lang
                .as_deref()
                .map_or(true, |l| c.lang.eq_ignore_ascii_case(l))
    }
}

/// Write matching comments with a header row. Returns the number of rows written.
pub fn write_csv<W: Write>(
    out: W,
    source_name: &str,
    comments: &[CanonicalComment],
    filter: &ExportFilter,
) -> Result<usize> {
    let mut wtr = csv::Writer::from_writer(out);
    wtr.write_record(EXPORT_COLUMNS)?;
    let mut written = 0;
    for c in comments.iter().filter(|c| filter.matches(c)) {
        let score = format!("{:.4}", c.sentiment_score);
        let sentiment = c.sentiment.as_str().to_ascii_uppercase();
        wtr.write_record([
            source_name,
            c.author.as_str(),
            c.lang.as_str(),
            sentiment.as_str(),
            score.as_str(),
            c.timestamp.as_str(),
            c.text.as_str(),
            c.summary.as_str(),
        ])
        .with_context(|| format!("writing export row {}", c.id))?;
        written += 1;
    }
    wtr.flush().context("flushing export")?;
    Ok(written)
}

pub fn to_csv_string(
    source_name: &str,
    comments: &[CanonicalComment],
    filter: &ExportFilter,
) -> Result<String> {
    let mut buf = Vec::new();
    write_csv(&mut buf, source_name, comments, filter)?;
    String::from_utf8(buf).context("export is not valid UTF-8")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comment(id: &str, sentiment: Sentiment, lang: &str, text: &str) -> CanonicalComment {
        CanonicalComment {
            id: id.into(),
            author: "Asha".into(),
            timestamp: "2025-10-01 09:30".into(),
            text: text.into(),
            lang: lang.into(),
            sentiment,
            sentiment_score: 0.8,
            summary: text.into(),
        }
    }

    #[test]
    fn header_and_formatting() {
        let rows = vec![comment("s-0", Sentiment::Positive, "English", "Very good, thanks")];
        let out = to_csv_string("Mann Ki Baat", &rows, &ExportFilter::default()).unwrap();
        let mut lines = out.lines();
        assert_eq!(
            lines.next(),
            Some("source,author,language,sentiment,sentiment_score,timestamp,comment,summary")
        );
        assert_eq!(
            lines.next(),
            Some(
                "Mann Ki Baat,Asha,English,POSITIVE,0.8000,2025-10-01 09:30,\
                 \"Very good, thanks\",\"Very good, thanks\""
            )
        );
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn filters_apply() {
        let rows = vec![
            comment("s-0", Sentiment::Positive, "English", "a good one"),
            comment("s-1", Sentiment::Negative, "Hindi", "a bad one"),
            comment("s-2", Sentiment::Positive, "Hindi", "another good"),
        ];
        let f = ExportFilter::from_query(Some("POSITIVE"), Some("hindi")).unwrap();
        let mut buf = Vec::new();
        assert_eq!(write_csv(&mut buf, "x", &rows, &f).unwrap(), 1);
        assert!(String::from_utf8(buf).unwrap().contains("another good"));

        let all = ExportFilter::from_query(Some("all"), Some("")).unwrap();
        assert_eq!(all, ExportFilter::default());
    }

    #[test]
    fn unknown_sentiment_filter_is_rejected() {
        assert!(ExportFilter::from_query(Some("happy"), None).is_err());
    }
}
