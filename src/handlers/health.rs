use axum::{http::StatusCode, Json};
use chrono::Utc;
use serde::Serialize;
use serde_json::json;

#[derive(Serialize)]
pub struct HealthResponse {
    success: bool,
    message: String,
    version: String,
    timestamp: String,
}

pub async fn health_check() -> (StatusCode, Json<HealthResponse>) {
    (
        StatusCode::OK,
        Json(HealthResponse {
            success: true,
            message: "Oil Union API is running".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: Utc::now().to_rfc3339(),
        }),
    )
}

pub async fn welcome() -> Json<serde_json::Value> {
    Json(json!({
        "success": true,
        "message": "Welcome to the Oil Union API",
        "version": env!("CARGO_PKG_VERSION"),
        "documentation": "/api/v1/health",
    }))
}

pub async fn not_found() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "success": false,
            "error": "Route not found",
        })),
    )
}
