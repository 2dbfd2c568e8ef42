//! API routes for oracled.

use crate::normalizer;
use crate::server::AppState;
use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use oracle_common::{Question, ReadingResponse};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::info;

type AppStateArc = Arc<AppState>;

// ============================================================================
// Reading Routes
// ============================================================================

pub fn reading_routes() -> Router<AppStateArc> {
    Router::new().route(
        "/v1/reading",
        post(reading)
            .options(preflight)
            .fallback(method_not_allowed),
    )
}

/// Sanitize the question and run the normalizer tier chain. The handler is
/// infallible by type: downstream failures never become HTTP errors.
async fn reading(State(state): State<AppStateArc>, body: Bytes) -> Json<ReadingResponse> {
    let question = Question::sanitize(&body);
    info!(
        "[Q]  {}",
        if question.is_empty() {
            "<empty>"
        } else {
            question.as_str()
        }
    );

    Json(normalizer::produce_reading(state.client.as_deref(), &question).await)
}

/// Plain CORS preflight: no body, headers come from the CORS layer.
async fn preflight() -> StatusCode {
    StatusCode::NO_CONTENT
}

/// The one genuine HTTP-level error this service returns.
async fn method_not_allowed() -> (StatusCode, Json<Value>) {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(json!({ "error": "Method not allowed" })),
    )
}

// ============================================================================
// Health Routes
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub generation_configured: bool,
}

pub fn health_routes() -> Router<AppStateArc> {
    Router::new().route("/v1/health", get(health_check))
}

async fn health_check(State(state): State<AppStateArc>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        generation_configured: state.client.is_some(),
    })
}
