// src/ingest/config.rs
//! Dashboard configuration: live backend, refresh period, and the source
//! catalog (selector → display name + ordered fallback locations).

use anyhow::{anyhow, bail, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const ENV_CONFIG_PATH: &str = "DASHBOARD_CONFIG_PATH";
pub const ENV_BACKEND_URL: &str = "LIVE_BACKEND_URL";
pub const ENV_REFRESH_SECS: &str = "REFRESH_INTERVAL_SECS";
pub const ENV_BIND: &str = "DASHBOARD_BIND";

pub const DEFAULT_CONFIG_TOML: &str = "config/dashboard.toml";
pub const DEFAULT_CONFIG_JSON: &str = "config/dashboard.json";

fn default_backend_url() -> String {
    "http://127.0.0.1:5000".to_string()
}
fn default_refresh_secs() -> u64 {
    5
}
fn default_request_timeout_secs() -> u64 {
    30
}
fn default_bind() -> String {
    "127.0.0.1:8080".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SourceEntry {
    pub id: String,
    pub name: String,
    /// Tabular locations in preference order (processed before raw).
    #[serde(default)]
    pub fallback: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "default_backend_url")]
    pub backend_url: String,
    #[serde(default = "default_refresh_secs")]
    pub refresh_interval_secs: u64,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default)]
    pub default_source: Option<String>,
    #[serde(default)]
    pub sources: Vec<SourceEntry>,
}

impl DashboardConfig {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs.max(1))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    /// Selector shown first: `default_source` if it names a catalog entry,
    /// else the first entry.
    pub fn initial_source(&self) -> Option<&str> {
        self.default_source
            .as_deref()
            .filter(|id| self.sources.iter().any(|s| s.id == *id))
            .or_else(|| self.sources.first().map(|s| s.id.as_str()))
    }

    pub fn catalog(&self) -> SourceCatalog {
        SourceCatalog::new(self.sources.clone())
    }

    /// Built-in catalog used when no config file exists: the two comment
    /// threads the scraper follows, processed exports before raw ones, the
    /// backend output dir before the dashboard's public copy.
    pub fn default_seed() -> Self {
        let entry = |id: &str, name: &str| SourceEntry {
            id: id.to_string(),
            name: name.to_string(),
            fallback: vec![
                format!("outputs/comments_processed_{id}.csv"),
                format!("dashboard/public/outputs/comments_processed_{id}.csv"),
                format!("outputs/comments_raw_{id}.csv"),
                format!("dashboard/public/outputs/comments_raw_{id}.csv"),
            ],
        };
        Self {
            backend_url: default_backend_url(),
            refresh_interval_secs: default_refresh_secs(),
            request_timeout_secs: default_request_timeout_secs(),
            bind: default_bind(),
            default_source: Some("site1".to_string()),
            sources: vec![
                entry("site1", "Mann Ki Baat (English)"),
                entry("site2", "Akshar Hindi (Hindi)"),
            ],
        }
    }

    /// Apply `LIVE_BACKEND_URL`, `REFRESH_INTERVAL_SECS` and `DASHBOARD_BIND`.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(url) = std::env::var(ENV_BACKEND_URL) {
            if !url.trim().is_empty() {
                self.backend_url = url.trim().to_string();
            }
        }
        if let Ok(raw) = std::env::var(ENV_REFRESH_SECS) {
            self.refresh_interval_secs = raw
                .trim()
                .parse()
                .with_context(|| format!("{ENV_REFRESH_SECS}={raw:?} is not a number"))?;
        }
        if let Ok(bind) = std::env::var(ENV_BIND) {
            if !bind.trim().is_empty() {
                self.bind = bind.trim().to_string();
            }
        }
        Ok(())
    }

    fn validate(mut self) -> Result<Self> {
        let mut seen = std::collections::BTreeSet::new();
        for s in &mut self.sources {
            s.id = s.id.trim().to_string();
            if s.id.is_empty() {
                bail!("source with empty id");
            }
            if !seen.insert(s.id.clone()) {
                bail!("duplicate source id '{}'", s.id);
            }
            s.fallback.retain(|l| !l.trim().is_empty());
        }
        Ok(self)
    }
}

/// Immutable selector lookup shared by the orchestrator and the API.
#[derive(Debug, Clone, Default)]
pub struct SourceCatalog {
    entries: Vec<SourceEntry>,
}

impl SourceCatalog {
    pub fn new(entries: Vec<SourceEntry>) -> Self {
        Self { entries }
    }

    pub fn get(&self, id: &str) -> Option<&SourceEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn entries(&self) -> &[SourceEntry] {
        &self.entries
    }
}

/// Load config from an explicit path. Supports TOML or JSON formats.
pub fn load_config_from(path: &Path) -> Result<DashboardConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading dashboard config from {}", path.display()))?;
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    parse_config(&content, ext.as_str())
        .with_context(|| format!("parsing dashboard config {}", path.display()))
}

/// Load config using env var + fallbacks:
/// 1) $DASHBOARD_CONFIG_PATH (must exist)
/// 2) config/dashboard.toml
/// 3) config/dashboard.json
/// 4) built-in default seed
///
/// Environment overrides are applied on top in every case.
pub fn load_config_default() -> Result<DashboardConfig> {
    let mut cfg = if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
        let pb = PathBuf::from(p);
        if !pb.exists() {
            return Err(anyhow!("{ENV_CONFIG_PATH} points to non-existent path"));
        }
        load_config_from(&pb)?
    } else if Path::new(DEFAULT_CONFIG_TOML).exists() {
        load_config_from(Path::new(DEFAULT_CONFIG_TOML))?
    } else if Path::new(DEFAULT_CONFIG_JSON).exists() {
        load_config_from(Path::new(DEFAULT_CONFIG_JSON))?
    } else {
        DashboardConfig::default_seed()
    };
    cfg.apply_env_overrides()?;
    Ok(cfg)
}

fn parse_config(s: &str, hint_ext: &str) -> Result<DashboardConfig> {
    let cfg: DashboardConfig = if hint_ext == "json" {
        serde_json::from_str(s)?
    } else {
        toml::from_str(s)?
    };
    cfg.validate()
}
