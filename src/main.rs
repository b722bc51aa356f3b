//! comment-pulse: binary entrypoint.
//! Loads configuration, starts the view orchestrator with its background
//! refresh timer, and serves the status API.

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use comment_pulse::api::{self, ApiState};
use comment_pulse::ingest::config::load_config_default;
use comment_pulse::ingest::providers::location::LocationFetcher;
use comment_pulse::ingest::HttpLiveFeed;
use comment_pulse::metrics::Metrics;
use comment_pulse::view::ViewOrchestrator;

/// Compact logs by default; `LOG_FORMAT=json` for structured output.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("comment_pulse=info,warn"));

    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer().compact()).init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env in local/dev; missing file is fine.
    let _ = dotenvy::dotenv();
    init_tracing();

    let cfg = load_config_default().context("loading dashboard config")?;
    let initial = cfg
        .initial_source()
        .context("config defines no sources")?
        .to_string();

    let metrics = Metrics::init(cfg.refresh_interval().as_secs())?;
    let live = Arc::new(HttpLiveFeed::new(&cfg.backend_url, cfg.request_timeout())?);
    let tabular = Arc::new(LocationFetcher::new(cfg.request_timeout())?);
    let view = Arc::new(ViewOrchestrator::new(
        live,
        tabular,
        Arc::new(cfg.catalog()),
        &initial,
    ));

    tracing::info!(
        target: "view",
        backend = %cfg.backend_url,
        source = %initial,
        refresh_secs = cfg.refresh_interval().as_secs(),
        "starting"
    );

    // First load in the foreground; the timer takes over afterwards.
    {
        let view = view.clone();
        tokio::spawn(async move {
            view.select(&initial).await;
        });
    }
    let _timer = view.spawn_refresh_timer(cfg.refresh_interval());

    let app = api::router(ApiState::new(view)).merge(metrics.router());
    let listener = tokio::net::TcpListener::bind(&cfg.bind)
        .await
        .with_context(|| format!("binding {}", cfg.bind))?;
    tracing::info!(target: "view", addr = %cfg.bind, "status api listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await
        .context("serving status api")?;
    Ok(())
}
