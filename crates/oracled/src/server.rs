//! HTTP server for oracled.

use crate::routes;
use anyhow::Result;
use axum::http::{header, Method};
use axum::Router;
use oracle_common::{GenerateClient, OpenAiClient, OracleConfig};
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

/// Application state shared across handlers
pub struct AppState {
    pub config: OracleConfig,
    /// Generation capability; absent when no credential is configured.
    pub client: Option<Arc<dyn GenerateClient>>,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(config: OracleConfig) -> Self {
        let client = OpenAiClient::from_config(&config)
            .map(|client| Arc::new(client) as Arc<dyn GenerateClient>);
        Self {
            config,
            client,
            start_time: Instant::now(),
        }
    }

    /// Build state around a specific generation client (used by tests).
    pub fn with_client(config: OracleConfig, client: Arc<dyn GenerateClient>) -> Self {
        Self {
            config,
            client: Some(client),
            start_time: Instant::now(),
        }
    }
}

/// Build the router with tracing and permissive CORS applied.
pub fn app(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .merge(routes::reading_routes())
        .merge(routes::health_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Run the HTTP server
pub async fn run(state: AppState) -> Result<()> {
    let addr = state.config.listen_addr.clone();
    let app = app(Arc::new(state));

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("  Listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
