use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use std::sync::Arc;

/// What the readiness probe reports
#[derive(Debug, Clone)]
pub struct Readiness {
    pub gemini_keys: usize,
    pub tts_provider: &'static str,
}

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

pub async fn health_ready(State(readiness): State<Arc<Readiness>>) -> impl IntoResponse {
    if readiness.gemini_keys == 0 {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "not_ready",
                "gemini_keys": 0,
                "tts": readiness.tts_provider
            })),
        );
    }

    (
        StatusCode::OK,
        Json(json!({
            "status": "ready",
            "gemini_keys": readiness.gemini_keys,
            "tts": readiness.tts_provider
        })),
    )
}
