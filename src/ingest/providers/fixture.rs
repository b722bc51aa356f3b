use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::ingest::types::TabularFetcher;

/// In-memory fetcher for tests and offline demos. Records every location it
/// was asked for, in order.
#[derive(Debug, Default)]
pub struct FixtureFetcher {
    tables: HashMap<String, String>,
    pub calls: Mutex<Vec<String>>,
}

impl FixtureFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, location: &str, content: &str) -> Self {
        self.tables.insert(location.to_string(), content.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl TabularFetcher for FixtureFetcher {
    async fn fetch(&self, location: &str) -> Result<String> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(location.to_string());
        }
        self.tables
            .get(location)
            .cloned()
            .ok_or_else(|| anyhow!("no fixture for {location}"))
    }

    fn name(&self) -> &'static str {
        "fixture"
    }
}
