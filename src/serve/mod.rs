//! HTTP quality service
//!
//! A small axum service exposing the quality pipeline:
//!
//! - `GET /health` - liveness probe
//! - `POST /quality` - evaluate caller-supplied dataset facts (JSON)
//! - `POST /quality-from-csv` - full pipeline over an uploaded CSV
//! - `POST /quality-flags-from-csv` - flags only, same upload contract
//!
//! The application state is an explicit value constructed at start-up
//! and handed to the router; the core never sees it. Every request
//! builds its own dataset snapshot, so concurrent requests cannot
//! interfere. All failures surface as HTTP 400 with an error body.

mod handlers;
mod types;

use std::{net::SocketAddr, sync::Arc};

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;

use crate::error::{Error, Result};

pub use types::{
    BasicFlags, CsvQualityResponse, ErrorResponse, FlagsResponse, HealthResponse, QualityRequest,
    QualityResponse,
};

/// Start-up configuration for the quality service.
#[derive(Debug, Clone)]
pub struct ServeConfig {
    /// Interface to bind (default `0.0.0.0`).
    pub host: String,
    /// Port to bind (default 8080).
    pub port: u16,
    /// Upload size cap in bytes (default 32 MiB).
    pub max_upload_bytes: usize,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            max_upload_bytes: 32 * 1024 * 1024,
        }
    }
}

/// Per-process application state, passed to the router explicitly.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The configuration the service was started with.
    pub config: Arc<ServeConfig>,
}

impl AppState {
    /// Wraps a configuration into application state.
    #[must_use]
    pub fn new(config: ServeConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }
}

/// Builds the service router with all routes and layers attached.
#[must_use]
pub fn router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(handlers::health))
        .route("/quality", post(handlers::quality))
        .route("/quality-from-csv", post(handlers::quality_from_csv))
        .route(
            "/quality-flags-from-csv",
            post(handlers::quality_flags_from_csv),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Binds the configured address and serves until SIGINT/SIGTERM.
///
/// # Errors
///
/// Returns an error if the address is invalid or the listener cannot
/// be bound.
pub async fn serve(config: ServeConfig) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .map_err(|e| Error::invalid_config(format!("invalid listen address: {e}")))?;

    let app = router(AppState::new(config));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(Error::io_no_path)?;
    tracing::info!(%addr, "quality service listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(Error::io_no_path)?;

    tracing::info!("quality service shut down");
    Ok(())
}

/// Resolves on SIGINT (Ctrl+C) or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => tracing::error!(error = %e, "failed to install SIGTERM handler"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("received SIGINT, shutting down"),
        () = terminate => tracing::info!("received SIGTERM, shutting down"),
    }
}
