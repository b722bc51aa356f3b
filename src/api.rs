// src/api.rs
//! Status API: the published view state, its export, and the two inbound
//! controls (select a source, refresh now).

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_http::cors::CorsLayer;

use crate::export::{to_csv_string, ExportFilter};
use crate::view::{ViewOrchestrator, ViewSnapshot};

#[derive(Clone)]
pub struct ApiState {
    pub view: Arc<ViewOrchestrator>,
}

impl ApiState {
    pub fn new(view: Arc<ViewOrchestrator>) -> Self {
        Self { view }
    }
}

pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/api/sources", get(list_sources))
        .route("/api/view", get(get_view))
        .route("/api/view/select", post(select_source))
        .route("/api/view/refresh", post(refresh_view))
        .route("/api/view/export.csv", get(export_csv))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

type ApiError = (StatusCode, Json<serde_json::Value>);

fn bad_request(msg: impl Into<String>) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": msg.into() })),
    )
}

#[derive(Serialize)]
struct SourceOut {
    id: String,
    name: String,
    selected: bool,
}

async fn list_sources(State(state): State<ApiState>) -> Json<Vec<SourceOut>> {
    let current = state.view.selector();
    let out = state
        .view
        .catalog()
        .entries()
        .iter()
        .map(|e| SourceOut {
            id: e.id.clone(),
            name: e.name.clone(),
            selected: e.id == current,
        })
        .collect();
    Json(out)
}

async fn get_view(State(state): State<ApiState>) -> Json<ViewSnapshot> {
    Json(state.view.snapshot())
}

#[derive(Deserialize)]
struct SelectQuery {
    #[serde(default)]
    source: Option<String>,
}

async fn select_source(
    State(state): State<ApiState>,
    Query(q): Query<SelectQuery>,
) -> Result<Json<ViewSnapshot>, ApiError> {
    let source = q
        .source
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| bad_request("missing `source` query parameter"))?;
    if !state.view.catalog().contains(&source) {
        return Err(bad_request(format!("unknown source '{source}'")));
    }
    Ok(Json(state.view.select(&source).await))
}

async fn refresh_view(State(state): State<ApiState>) -> Json<ViewSnapshot> {
    Json(state.view.refresh_now().await)
}

#[derive(Deserialize)]
struct ExportQuery {
    #[serde(default)]
    sentiment: Option<String>,
    #[serde(default)]
    lang: Option<String>,
}

async fn export_csv(
    State(state): State<ApiState>,
    Query(q): Query<ExportQuery>,
) -> Result<Response, ApiError> {
    let filter = ExportFilter::from_query(q.sentiment.as_deref(), q.lang.as_deref())
        .map_err(|e| bad_request(e.to_string()))?;
    let snap = state.view.snapshot();
    let body = to_csv_string(snap.source_name(), &snap.comments, &filter).map_err(|e| {
        tracing::error!(target: "view", error = %format!("{e:#}"), "export failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "export failed" })),
        )
    })?;
    let disposition = format!("attachment; filename=\"comments_{}.csv\"", snap.selector);
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response())
}
