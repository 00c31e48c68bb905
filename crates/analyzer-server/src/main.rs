//! # analyzer-server
//!
//! Backend API for the Inventory Analyzer AI client.
//!
//! This binary provides:
//! - **`POST /chat`** answering a transcript with a canned per-agent reply
//! - **`GET /history`** over the in-memory message log
//! - **`GET /faq`** serving the fixed quick-start question set
//! - **health check** and CORS/tracing layers for local development

mod api;
mod config;
mod error;

use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::api::AppState;
use crate::config::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // -----------------------------------------------------------------------
    // 1. Initialize tracing (respects RUST_LOG env var)
    // -----------------------------------------------------------------------
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,analyzer_server=debug")),
        )
        .init();

    info!("Starting Inventory Analyzer AI server v{}", env!("CARGO_PKG_VERSION"));

    // -----------------------------------------------------------------------
    // 2. Load configuration
    // -----------------------------------------------------------------------
    let config = ServerConfig::from_env();
    info!(?config, "Loaded configuration");

    let http_addr = config.http_addr;
    let app_state = AppState::new(config);

    // -----------------------------------------------------------------------
    // 3. Run the HTTP API server (blocks until shutdown)
    // -----------------------------------------------------------------------
    tokio::select! {
        result = api::serve(app_state, http_addr) => {
            if let Err(e) = result {
                tracing::error!(error = %e, "HTTP server failed");
                return Err(e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down");
        }
    }

    Ok(())
}
