// 🩺 Health endpoint - liveness probe for the process supervisor

use anyhow::{Context, Result};
use axum::{http::StatusCode, response::IntoResponse, routing::get, Router};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

/// GET / and GET /health - plain "OK"
async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

pub fn router() -> Router {
    Router::new()
        .route("/", get(health_check))
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
}

/// Bind 0.0.0.0:port. Returns the listener so binding errors surface
/// before the server task is spawned.
pub async fn bind(port: u16) -> Result<TcpListener> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind health server to {}", addr))
}

pub async fn serve(listener: TcpListener) -> Result<()> {
    let addr = listener.local_addr().ok();
    tracing::info!(?addr, "health server listening");

    axum::serve(listener, router())
        .await
        .context("Health server stopped")
}
