//! HTTP API server.
//!
//! Provides two endpoints:
//! - `/api/subdomains?domain=...` - runs a scan and returns the result
//! - `/status` - JSON counters for monitoring
//!
//! Status mapping for scan failures: invalid domain is 400, all CT sources
//! down is 502, a deadline that fired with zero assembled items is 504.
//! Every error body is `{"error": "..."}`.

mod handlers;
mod types;

use axum::http::{header, HeaderValue, Method};
use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;

use handlers::{status_handler, subdomains_handler};
pub use types::{AppState, ServerStats};

/// Builds the API router with CORS for the local frontend origins.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin([
            HeaderValue::from_static("http://localhost:3000"),
            HeaderValue::from_static("http://localhost:8080"),
        ])
        .allow_methods([Method::GET])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    Router::new()
        .route("/api/subdomains", get(subdomains_handler))
        .route("/status", get(status_handler))
        .layer(cors)
        .with_state(state)
}

/// Binds and serves the API until a shutdown signal arrives.
pub async fn start_api_server(bind: &str, port: u16, state: AppState) -> Result<(), anyhow::Error> {
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(format!("{bind}:{port}"))
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind API server to {bind}:{port}: {e}"))?;

    log::info!("API server listening on http://{bind}:{port}/");
    log::info!("  - Scan: http://{bind}:{port}/api/subdomains?domain=example.com");
    log::info!("  - Status: http://{bind}:{port}/status");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| anyhow::anyhow!("API server error: {e}"))?;

    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        log::info!("shutdown signal received, draining connections");
    }
}
