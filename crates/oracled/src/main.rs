//! AIght Ball oracle daemon.
//!
//! Answers every reading request with a bounded three-field reading, even
//! when the generation provider is unreachable or misconfigured.

use anyhow::Result;
use oracle_common::OracleConfig;
use oracled::server::{self, AppState};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("oracled v{} starting", env!("CARGO_PKG_VERSION"));

    let config = OracleConfig::from_env();
    if config.has_api_key() {
        info!(
            "Generation provider configured: {} via {}",
            config.model, config.endpoint
        );
    } else {
        warn!("No provider API key set; all readings will use the fixed fallback");
    }

    server::run(AppState::new(config)).await
}
