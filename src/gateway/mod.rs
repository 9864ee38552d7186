//! HTTP gateway: the route table, shared state and server loop.
//!
//! Routes:
//! - `GET /` HTML index
//! - `GET /health`
//! - `GET /api/v1.0/precipitation`
//! - `GET /api/v1.0/stations`
//! - `GET /api/v1.0/tobs`
//! - `GET /api/v1.0/{start}` and `GET /api/v1.0/{start}/{end}`
//!
//! Static segments win over the `{start}` capture, so `/api/v1.0/stations`
//! never reaches the temperature-range handler.

mod error;
pub mod index;
pub mod routes;

pub use error::ApiError;

use crate::config::{Config, GatewayConfig};
use crate::store::Dataset;
use anyhow::{Context, Result};
use axum::{http::StatusCode, routing::get, Router};
use rusqlite::Connection;
use std::time::Duration;
use tower_http::{limit::RequestBodyLimitLayer, timeout::TimeoutLayer};

/// State handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub dataset: Dataset,
}

impl AppState {
    pub fn new(dataset: Dataset) -> Self {
        Self { dataset }
    }

    /// Run `f` against a connection opened for this call only.
    ///
    /// The work happens on the blocking pool; the connection is dropped when
    /// `f` returns, whether it succeeded or not.
    pub async fn query<T, F>(&self, f: F) -> Result<T, ApiError>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T, ApiError> + Send + 'static,
    {
        let dataset = self.dataset.clone();
        tokio::task::spawn_blocking(move || {
            let conn = dataset.connect()?;
            f(&conn)
        })
        .await?
    }
}

pub fn build_router(state: AppState, config: &GatewayConfig) -> Router {
    Router::new()
        .route("/", get(index::handle_index))
        .route("/health", get(routes::handle_health))
        .route("/api/v1.0/precipitation", get(routes::handle_precipitation))
        .route("/api/v1.0/stations", get(routes::handle_stations))
        .route("/api/v1.0/tobs", get(routes::handle_tobs))
        .route("/api/v1.0/{start}", get(routes::handle_temperature_from))
        .route("/api/v1.0/{start}/{end}", get(routes::handle_temperature_between))
        .layer(RequestBodyLimitLayer::new(config.max_body_bytes))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(config.request_timeout_secs),
        ))
        .with_state(state)
}

/// Bind the configured address and serve until Ctrl-C.
pub async fn run_gateway(config: &Config) -> Result<()> {
    let addr = config.gateway.socket_addr()?;
    let dataset = Dataset::new(config.db_path()?);

    // Fail at startup rather than on the first request.
    dataset.connect()?;

    let app = build_router(AppState::new(dataset.clone()), &config.gateway);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!(
        "Serving {} on http://{}",
        dataset.path().display(),
        listener.local_addr()?
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("gateway server error")?;

    tracing::info!("Gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for Ctrl-C: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown requested");
}
