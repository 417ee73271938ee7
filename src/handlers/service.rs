use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;

use crate::AppState;

const SERVICE_NAME: &str = "CebuAnimalAdoption API";

pub async fn index() -> Json<serde_json::Value> {
    Json(json!({
        "service": SERVICE_NAME,
        "endpoints": [
            "/listings",
            "/requests",
            "/pickups",
            "/food_requests",
            "/notifications",
            "/notifications/read",
            "/geofence",
            "/map",
            "/health"
        ]
    }))
}

/// GET /health - round-trips to the store so a dead database shows up here
pub async fn health_check(State(state): State<AppState>) -> Response {
    match state.store.ping().await {
        Ok(()) => Json(json!({
            "status": "ok",
            "backend": state.store.backend_name(),
            "timestamp": chrono::Utc::now(),
        }))
        .into_response(),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "status": "error",
                    "message": e.to_string(),
                })),
            )
                .into_response()
        }
    }
}
