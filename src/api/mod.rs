//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// Shared pieces of the HTTP surface every service exposes: the error type,
// the health endpoint, the CORS layer, and the listener helper. The actual
// routes live with each service in `crate::services`.
//
// | Component      | Description                                                |
// |----------------|-----------------------------------------------------------|
// | ApiError       | Error types mapped to JSON error responses                 |
// | health         | Health check handler mounted by every service              |
// | cors_layer     | CORS layer restricted to the configured frontend origin    |
// | serve          | Binds a listener and runs a router until shutdown          |
//--------------------------------------------------------------------------------------------------

mod error;

use std::net::SocketAddr;

use axum::{
    http::{header, HeaderValue, Method},
    response::IntoResponse,
    Json, Router,
};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::info;

pub use error::{ApiError, ApiResult};

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok"
    }))
}

/// CORS layer restricted to the configured frontend origin.
///
/// Credentials are allowed, which forbids a wildcard origin; an unparseable
/// origin falls back to localhost rather than opening the surface up.
pub fn cors_layer(origin: &str) -> CorsLayer {
    let origin = origin
        .parse::<HeaderValue>()
        .unwrap_or_else(|_| HeaderValue::from_static("http://localhost:3000"));

    CorsLayer::new()
        .allow_origin([origin])
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(true)
}

/// Starts an HTTP server for the given router and runs until shutdown
pub async fn serve(addr: SocketAddr, app: Router) -> std::io::Result<()> {
    info!("API listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await
}
