use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use metrics::histogram;
use std::time::Duration;

use crate::ingest::types::TabularFetcher;

/// Fetches tabular sources from local paths, `file://` URLs or `http(s)://`
/// URLs.
#[derive(Clone)]
pub struct LocationFetcher {
    client: reqwest::Client,
}

impl LocationFetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("comment-pulse/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(4))
            .timeout(timeout)
            .build()
            .context("building tabular http client")?;
        Ok(Self { client })
    }

    async fn fetch_http(&self, url: &str) -> Result<Vec<u8>> {
        let resp = self
            .client
            .get(url)
            .header(reqwest::header::CACHE_CONTROL, "no-store")
            .send()
            .await
            .with_context(|| format!("GET {url}"))?;
        let status = resp.status();
        if !status.is_success() {
            bail!("GET {url} returned status {status}");
        }
        let bytes = resp.bytes().await.with_context(|| format!("reading body of {url}"))?;
        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl TabularFetcher for LocationFetcher {
    async fn fetch(&self, location: &str) -> Result<String> {
        let t0 = std::time::Instant::now();
        let bytes = if location.starts_with("http://") || location.starts_with("https://") {
            self.fetch_http(location).await?
        } else {
            let path = location.strip_prefix("file://").unwrap_or(location);
            tokio::fs::read(path)
                .await
                .with_context(|| format!("reading {path}"))?
        };
        histogram!("ingest_fetch_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);
        Ok(decode_table_bytes(&bytes))
    }

    fn name(&self) -> &'static str {
        "location"
    }
}

/// Windows-1252 assignments for 0x80..=0x9F. The five unassigned bytes keep
/// their C1 code point.
const CP1252_HIGH: [char; 32] = [
    '\u{20AC}', '\u{81}', '\u{201A}', '\u{192}', '\u{201E}', '\u{2026}', '\u{2020}', '\u{2021}',
    '\u{2C6}', '\u{2030}', '\u{160}', '\u{2039}', '\u{152}', '\u{8D}', '\u{17D}', '\u{8F}',
    '\u{90}', '\u{2018}', '\u{2019}', '\u{201C}', '\u{201D}', '\u{2022}', '\u{2013}', '\u{2014}',
    '\u{2DC}', '\u{2122}', '\u{161}', '\u{203A}', '\u{153}', '\u{9D}', '\u{17E}', '\u{178}',
];

/// Exports are written as UTF-8 with a BOM by the scraper, but older files
/// came out of spreadsheet tools in Windows-1252. Strip the BOM, prefer
/// UTF-8 and fall back to Windows-1252.
pub fn decode_table_bytes(bytes: &[u8]) -> String {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => bytes.iter().map(|&b| cp1252_char(b)).collect(),
    }
}

fn cp1252_char(b: u8) -> char {
    match b {
        0x80..=0x9F => CP1252_HIGH[usize::from(b - 0x80)],
        _ => char::from(b),
    }
}
