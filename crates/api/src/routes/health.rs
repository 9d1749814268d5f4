//! Health check and build information endpoints.

use axum::Json;
use chrono::Utc;
use serde::Serialize;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
    pub service: &'static str,
}

#[derive(Serialize)]
pub struct InfoResponse {
    pub application: &'static str,
    pub version: &'static str,
    pub framework: &'static str,
}

/// GET /health: returns system health status.
pub async fn check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "UP",
        timestamp: Utc::now().to_rfc3339(),
        service: "Delivery API",
    })
}

/// GET /info: returns build information.
pub async fn info() -> Json<InfoResponse> {
    Json(InfoResponse {
        application: "Delivery Tech API",
        version: env!("CARGO_PKG_VERSION"),
        framework: "axum",
    })
}
