//! Health check handlers.

use axum::Json;

use crate::dto::response::HealthResponse;

/// GET /
pub async fn index() -> &'static str {
    "CollabVoice Backend is LIVE 🚀"
}

/// GET /api/health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        message: "CollabVoice Backend is running with Auth enabled!".to_string(),
    })
}
