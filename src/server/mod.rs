//! HTTP endpoint for race results.
//!
//! Routes:
//! - `GET /race-results?year=<int>&race=<name>` (also at `/api/race-results`)
//! - `GET /health`
//!
//! Every response allows cross-origin GET; `OPTIONS` preflights are answered
//! by the CORS layer.

pub mod error;
pub mod handlers;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Router,
    http::{Method, header},
    routing::get,
};
use tower_http::cors::{Any, CorsLayer};

use crate::error::{AppError, Result};
use crate::models::Config;
use crate::services::{DocumentFetcher, HttpFetcher, RaceExtractor};

pub use error::{ApiError, USAGE};
pub use handlers::{RaceParams, RaceResultsResponse};

/// Shared, read-only state handed to every request.
#[derive(Clone)]
pub struct AppState {
    pub fetcher: Arc<dyn DocumentFetcher>,
    pub extractor: Arc<RaceExtractor>,
    /// Attach extraction diagnostics to success responses
    pub debug: bool,
}

impl AppState {
    pub fn new(fetcher: Arc<dyn DocumentFetcher>, extractor: RaceExtractor, debug: bool) -> Self {
        Self {
            fetcher,
            extractor: Arc::new(extractor),
            debug,
        }
    }

    /// Build state with an HTTP fetcher from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let fetcher = HttpFetcher::new(&config.fetcher)?;
        let extractor = RaceExtractor::new(&config.extractor)?;
        Ok(Self::new(Arc::new(fetcher), extractor, config.server.debug))
    }
}

/// Build the router with CORS applied.
pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/health", get(handlers::health_handler))
        .route("/race-results", get(handlers::race_results_handler))
        .route("/api/race-results", get(handlers::race_results_handler))
        .layer(cors)
        .with_state(state)
}

/// Serve until Ctrl-C.
pub async fn serve(bind_addr: &str, state: AppState) -> Result<()> {
    let addr: SocketAddr = bind_addr
        .parse()
        .map_err(|e| AppError::config(format!("invalid bind address '{bind_addr}': {e}")))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    log::info!("Listening on http://{}", addr);
    if state.debug {
        log::info!("Debug diagnostics enabled");
    }

    axum::serve(listener, create_app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    log::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {}", e);
    }
}
