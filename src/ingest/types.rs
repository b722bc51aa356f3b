// src/ingest/types.rs
use anyhow::Result;

use crate::comment::CanonicalComment;
use crate::error::MalformedRow;

/// Retrieves the raw text of a tabular source (file path or URL).
#[async_trait::async_trait]
pub trait TabularFetcher: Send + Sync {
    async fn fetch(&self, location: &str) -> Result<String>;
    fn name(&self) -> &'static str;
}

/// Normalized yield of one tabular location.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceBatch {
    pub location: String,
    pub comments: Vec<CanonicalComment>,
    /// Records excluded because they could not be read.
    pub malformed: Vec<MalformedRow>,
}

impl SourceBatch {
    pub fn is_empty(&self) -> bool {
        self.comments.is_empty()
    }
}
