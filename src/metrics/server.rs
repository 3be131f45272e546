//! Scrape endpoint for the metric store
//!
//! Serves the Prometheus text exposition on `/metrics` plus a small health
//! probe, using Axum. Reads never wait on an upstream fetch; they only take
//! the store's lock for the duration of a gather.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::{debug, error, info};

use crate::config::ServerSettings;
use crate::error::{EspnError, Result};
use crate::metrics::store::MetricStore;

const SERVICE_NAME: &str = env!("CARGO_PKG_NAME");

pub fn router(store: Arc<MetricStore>) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .with_state(store)
}

/// Bind and serve until `shutdown` flips to `true`.
pub async fn serve(
    settings: &ServerSettings,
    store: Arc<MetricStore>,
    mut shutdown: watch::Receiver<bool>,
) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", settings.host, settings.port)
        .parse()
        .map_err(|e| EspnError::config(format!("invalid listen address: {e}")))?;

    let listener = TcpListener::bind(addr).await?;
    info!("Metrics server listening on http://{}", addr);

    axum::serve(listener, router(store))
        .with_graceful_shutdown(async move {
            let _ = shutdown.wait_for(|stop| *stop).await;
            info!("Metrics server shutdown signal received");
        })
        .await?;

    info!("Metrics server stopped");
    Ok(())
}

async fn root_handler() -> impl IntoResponse {
    Json(json!({
        "service": SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": ["/health", "/metrics"]
    }))
}

async fn health_handler() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "service": SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION")
    }))
}

async fn metrics_handler(State(store): State<Arc<MetricStore>>) -> Response {
    debug!("Metrics endpoint requested");

    match store.export() {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, store.content_type())],
            body,
        )
            .into_response(),
        Err(e) => {
            error!("Failed to encode metrics: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to encode metrics".to_string(),
            )
                .into_response()
        }
    }
}
