// src/ingest/tabular.rs
//! Tabular (comma-separated) comment sources.
//!
//! The first line names the columns; column names are matched trimmed and
//! case-insensitively, unknown columns are ignored. A table must have a
//! `text` column. A record whose field count disagrees with the header is
//! reported as a [`MalformedRow`] and skipped.

use metrics::counter;

use crate::comment::RawRow;
use crate::error::{LoadError, MalformedRow};
use crate::ingest::types::{SourceBatch, TabularFetcher};
use crate::normalize::normalize_row;

/// Rows read from one table, with their data-row positions.
#[derive(Debug, Default)]
pub struct ParsedTable {
    pub rows: Vec<(usize, RawRow)>,
    pub malformed: Vec<MalformedRow>,
}

/// Parse table text into raw rows. Only a structural failure (unreadable or
/// unusable header) is an error; bad records are collected instead.
pub fn parse_table(content: &str) -> Result<ParsedTable, String> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    if content.trim().is_empty() {
        return Ok(ParsedTable::default());
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .trim(csv::Trim::None)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| format!("unreadable header: {e}"))?
        .iter()
        .map(|h| h.trim().to_ascii_lowercase())
        .collect();
    if !headers.iter().any(|h| h == "text") {
        return Err(format!(
            "missing required column `text` (found: {})",
            headers.join(", ")
        ));
    }

    let mut out = ParsedTable::default();
    for (index, record) in reader.records().enumerate() {
        match record {
            Ok(rec) => {
                let mut row = RawRow::default();
                for (name, value) in headers.iter().zip(rec.iter()) {
                    row.set(name, value);
                }
                out.rows.push((index, row));
            }
            Err(e) => out.malformed.push(MalformedRow {
                row: index,
                reason: e.to_string(),
            }),
        }
    }
    Ok(out)
}

/// Retrieve, parse and normalize one tabular location. `source_id` prefixes
/// comment ids; indices are data-row positions before filtering.
pub async fn load_tabular_source(
    fetcher: &dyn TabularFetcher,
    location: &str,
    source_id: &str,
) -> Result<SourceBatch, LoadError> {
    let unavailable = |cause: String| {
        counter!("ingest_source_errors_total").increment(1);
        LoadError::SourceUnavailable {
            location: location.to_string(),
            cause,
        }
    };

    let content = fetcher
        .fetch(location)
        .await
        .map_err(|e| unavailable(format!("{e:#}")))?;
    let parsed = parse_table(&content).map_err(unavailable)?;

    let total = parsed.rows.len();
    let comments: Vec<_> = parsed
        .rows
        .iter()
        .filter_map(|(i, row)| normalize_row(row, *i, source_id))
        .collect();
    let dropped = total - comments.len();

    counter!("ingest_rows_total").increment(total as u64);
    counter!("ingest_rows_dropped_total").increment(dropped as u64);
    counter!("ingest_malformed_rows_total").increment(parsed.malformed.len() as u64);

    if !parsed.malformed.is_empty() {
        tracing::warn!(
            target: "ingest",
            location,
            malformed = parsed.malformed.len(),
            first = %parsed.malformed[0],
            "skipped malformed rows"
        );
    }
    tracing::debug!(
        target: "ingest",
        location,
        fetcher = fetcher.name(),
        kept = comments.len(),
        dropped,
        "tabular source loaded"
    );

    Ok(SourceBatch {
        location: location.to_string(),
        comments,
        malformed: parsed.malformed,
    })
}
