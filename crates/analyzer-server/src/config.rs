//! Server configuration loaded from environment variables.
//!
//! All settings have sensible defaults so the server can start with zero
//! configuration for local development.

use std::net::SocketAddr;

use analyzer_shared::constants::{APP_NAME, DEFAULT_HTTP_PORT};

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Socket address for the HTTP (axum) API server.
    /// Env: `HTTP_ADDR`
    /// Default: `0.0.0.0:8000`
    pub http_addr: SocketAddr,

    /// Human-readable name for this server instance.
    /// Env: `INSTANCE_NAME`
    /// Default: `"Inventory Analyzer AI"`
    pub instance_name: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_addr: ([0, 0, 0, 0], DEFAULT_HTTP_PORT).into(),
            instance_name: APP_NAME.to_string(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables, falling back to
    /// defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(addr) = std::env::var("HTTP_ADDR") {
            if let Ok(parsed) = addr.parse::<SocketAddr>() {
                config.http_addr = parsed;
            } else {
                tracing::warn!(
                    value = %addr,
                    "Invalid HTTP_ADDR, using default"
                );
            }
        }

        if let Ok(name) = std::env::var("INSTANCE_NAME") {
            config.instance_name = name;
        }

        config
    }
}
