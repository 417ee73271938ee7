use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    response::Json,
    routing::get,
    Router,
};
use chrono::Utc;
use tracing::info;
use validator::Validate;

use crate::errors::Result;
use crate::models::{CreatedResponse, NewPickup, Pickup};
use crate::AppState;

use super::{ensure_inside, parse_json};

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list_pickups).post(create_pickup))
}

pub async fn list_pickups(State(state): State<AppState>) -> Result<Json<Vec<Pickup>>> {
    Ok(Json(state.store.list_pickups().await?))
}

/// POST /pickups - schedule a hand-over for an adoption request
pub async fn create_pickup(
    State(state): State<AppState>,
    body: std::result::Result<Bytes, BytesRejection>,
) -> Result<Json<CreatedResponse>> {
    let payload: NewPickup = parse_json(&body?)?;
    payload.validate()?;
    ensure_inside(&state.geofence, payload.location)?;

    let pickup = payload.into_pickup(Utc::now());
    state.store.insert_pickup(&pickup).await?;

    info!(
        "🚐 Pickup {} scheduled for request {} on {} {}",
        pickup.id, pickup.request_id, pickup.date, pickup.time
    );
    Ok(Json(CreatedResponse { id: pickup.id }))
}
