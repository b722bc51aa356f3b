// src/ingest/fallback.rs
use crate::error::LoadError;
use crate::ingest::tabular::load_tabular_source;
use crate::ingest::types::{SourceBatch, TabularFetcher};

/// Try each candidate location in preference order and return the first
/// batch with at least one comment. Failures and empty yields are only
/// remembered; if every candidate is spent the most recent reason surfaces
/// as [`LoadError::AllSourcesExhausted`].
pub async fn resolve_first_non_empty<S: AsRef<str>>(
    fetcher: &dyn TabularFetcher,
    candidates: &[S],
    source_id: &str,
) -> Result<SourceBatch, LoadError> {
    let mut last_reason = String::from("no fallback sources configured");

    for candidate in candidates {
        let location = candidate.as_ref();
        match load_tabular_source(fetcher, location, source_id).await {
            Ok(batch) if !batch.is_empty() => {
                tracing::info!(
                    target: "ingest",
                    location,
                    comments = batch.comments.len(),
                    "fallback source selected"
                );
                return Ok(batch);
            }
            Ok(_) => {
                tracing::debug!(target: "ingest", location, "fallback source empty");
                last_reason = format!("{location}: no comments");
            }
            Err(e) => {
                tracing::debug!(target: "ingest", location, error = %e, "fallback source failed");
                last_reason = e.to_string();
            }
        }
    }

    Err(LoadError::AllSourcesExhausted { last_reason })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::providers::fixture::FixtureFetcher;

    fn table(n: usize) -> String {
        let mut s = String::from("author,text\n");
        for i in 0..n {
            s.push_str(&format!("user{i},comment number {i}\n"));
        }
        s
    }

    #[tokio::test]
    async fn returns_first_non_empty_and_stops() {
        let f = FixtureFetcher::new()
            .with("a.csv", &table(0))
            .with("b.csv", &table(3))
            .with("c.csv", &table(5));
        let batch = resolve_first_non_empty(&f, &["a.csv", "b.csv", "c.csv"], "site1")
            .await
            .unwrap();
        assert_eq!(batch.location, "b.csv");
        assert_eq!(batch.comments.len(), 3);
        assert_eq!(f.calls(), vec!["a.csv", "b.csv"]);
    }

    #[tokio::test]
    async fn skips_failures() {
        let f = FixtureFetcher::new().with("ok.csv", &table(2));
        let batch = resolve_first_non_empty(&f, &["gone.csv", "ok.csv"], "s")
            .await
            .unwrap();
        assert_eq!(batch.location, "ok.csv");
    }

    #[tokio::test]
    async fn exhausted_carries_last_reason() {
        let f = FixtureFetcher::new().with("empty.csv", &table(0));
        let err = resolve_first_non_empty(&f, &["gone.csv", "empty.csv"], "s")
            .await
            .unwrap_err();
        assert_eq!(
            err,
            LoadError::AllSourcesExhausted {
                last_reason: "empty.csv: no comments".into()
            }
        );

        let err = resolve_first_non_empty(&f, &["empty.csv", "gone.csv"], "s")
            .await
            .unwrap_err();
        match err {
            LoadError::AllSourcesExhausted { last_reason } => {
                assert!(last_reason.contains("gone.csv"), "{last_reason}")
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn no_candidates() {
        let f = FixtureFetcher::new();
        let none: [&str; 0] = [];
        let err = resolve_first_non_empty(&f, &none, "s").await.unwrap_err();
        assert!(matches!(err, LoadError::AllSourcesExhausted { .. }));
    }
}
