//! Health check endpoint.

use axum::Json;
use chrono::Utc;
use serde::Serialize;

#[derive(Serialize)]
pub struct HealthResponse {
    pub message: &'static str,
    pub time: String,
}

/// GET /health — reports liveness and the current server time.
pub async fn check() -> Json<HealthResponse> {
    Json(HealthResponse {
        message: "Orders service is healthy.",
        time: Utc::now().to_rfc2822(),
    })
}
