// tests/api_http.rs
//
// HTTP-level tests for the status API Router without opening sockets.
// We exercise the router directly via tower::ServiceExt::oneshot.

use async_trait::async_trait;
use axum::{
    body::{self, Body},
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::Value as Json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tower::ServiceExt as _; // for `oneshot`

use comment_pulse::api::{self, ApiState};
use comment_pulse::error::LoadError;
use comment_pulse::ingest::config::{SourceCatalog, SourceEntry};
use comment_pulse::ingest::providers::fixture::FixtureFetcher;
use comment_pulse::ingest::{LiveFeedClient, LiveFeedState};
use comment_pulse::ViewOrchestrator;

const BODY_LIMIT: usize = 1024 * 1024;

const TABLE: &str = "author,text,lang,sentiment,sentiment_score\n\
Asha,Great initiative!,en,positive,0.91\n\
Ravi,The portal is broken,hi,negative,0.7\n\
Meena,\"Thank you, very helpful\",hi,,\n";

/// Live backend that is always down and counts refresh nudges.
#[derive(Default)]
struct DownBackend {
    nudges: AtomicUsize,
}

#[async_trait]
impl LiveFeedClient for DownBackend {
    async fn fetch_live(&self, selector: &str) -> Result<LiveFeedState, LoadError> {
        Err(LoadError::LiveFeedUnavailable {
            selector: selector.to_string(),
            reason: "error sending request for url: Connection refused".into(),
        })
    }

    async fn notify_refresh(&self, _selector: &str) -> anyhow::Result<()> {
        self.nudges.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

fn test_app() -> (Router, Arc<DownBackend>) {
    let live = Arc::new(DownBackend::default());
    let tabular = Arc::new(
        FixtureFetcher::new()
            .with("site1.csv", TABLE)
            .with("site2.csv", "author,text\nKiran,Nice work\n"),
    );
    let catalog = Arc::new(SourceCatalog::new(vec![
        SourceEntry {
            id: "site1".into(),
            name: "Mann Ki Baat (English)".into(),
            fallback: vec!["site1.csv".into()],
        },
        SourceEntry {
            id: "site2".into(),
            name: "Akshar Hindi (Hindi)".into(),
            fallback: vec!["site2.csv".into()],
        },
    ]));
    let view = Arc::new(ViewOrchestrator::new(live.clone(), tabular, catalog, "site1"));
    (api::router(ApiState::new(view)), live)
}

async fn send(app: &Router, method: &str, uri: &str) -> (StatusCode, Vec<u8>) {
    let req = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("build request");
    let resp = app.clone().oneshot(req).await.expect("oneshot");
    let status = resp.status();
    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT)
        .await
        .expect("read body")
        .to_vec();
    (status, bytes)
}

async fn send_json(app: &Router, method: &str, uri: &str) -> (StatusCode, Json) {
    let (status, bytes) = send(app, method, uri).await;
    let v = serde_json::from_slice(&bytes).expect("json body");
    (status, v)
}

#[tokio::test]
async fn health_returns_ok() {
    let (app, _) = test_app();
    let (status, body) = send(&app, "GET", "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(String::from_utf8(body).unwrap(), "OK");
}

#[tokio::test]
async fn view_starts_loading_then_select_degrades() {
    let (app, _) = test_app();

    let (status, v) = send_json(&app, "GET", "/api/view").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(v["selector"], "site1");
    assert_eq!(v["phase"]["kind"], "loading");

    let (status, v) = send_json(&app, "POST", "/api/view/select?source=site2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(v["selector"], "site2");
    assert_eq!(v["phase"]["kind"], "degraded");
    assert!(v["phase"]["reason"]
        .as_str()
        .unwrap()
        .contains("not running"));
    assert_eq!(v["comments"].as_array().unwrap().len(), 1);
    assert_eq!(v["error"], Json::Null);

    let (_, v) = send_json(&app, "GET", "/api/view").await;
    assert_eq!(v["selector"], "site2");
    assert_eq!(v["live_state"]["source_name"], "Akshar Hindi (Hindi)");
}

#[tokio::test]
async fn select_rejects_unknown_or_missing_source() {
    let (app, _) = test_app();
    let (status, v) = send_json(&app, "POST", "/api/view/select?source=site9").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(v["error"].as_str().unwrap().contains("site9"));

    let (status, _) = send_json(&app, "POST", "/api/view/select").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // selection is unchanged
    let (_, v) = send_json(&app, "GET", "/api/view").await;
    assert_eq!(v["selector"], "site1");
}

#[tokio::test]
async fn refresh_nudges_backend_and_reloads() {
    let (app, live) = test_app();
    let (status, v) = send_json(&app, "POST", "/api/view/refresh").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(v["phase"]["kind"], "degraded");
    assert_eq!(live.nudges.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn sources_lists_catalog_with_selection() {
    let (app, _) = test_app();
    let (_, v) = send_json(&app, "GET", "/api/sources").await;
    let arr = v.as_array().unwrap();
    assert_eq!(arr.len(), 2);
    assert_eq!(arr[0]["id"], "site1");
    assert_eq!(arr[0]["selected"], true);
    assert_eq!(arr[1]["selected"], false);
}

#[tokio::test]
async fn export_respects_filters() {
    let (app, _) = test_app();
    send(&app, "POST", "/api/view/select?source=site1").await;

    let req = Request::get("/api/view/export.csv?sentiment=positive&lang=Hindi")
        .body(Body::empty())
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let ctype = resp.headers()[header::CONTENT_TYPE].to_str().unwrap().to_string();
    assert!(ctype.starts_with("text/csv"));
    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT).await.unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();

    let lines: Vec<_> = text.lines().collect();
    assert_eq!(lines.len(), 2, "{text}");
    assert!(lines[1].starts_with("Mann Ki Baat (English),Meena,Hindi,POSITIVE,"));

    let (status, _) = send(&app, "GET", "/api/view/export.csv").await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, "GET", "/api/view/export.csv?sentiment=ecstatic").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
