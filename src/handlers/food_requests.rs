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
use crate::models::{CreatedResponse, FoodRequest, NewFoodRequest};
use crate::AppState;

use super::{ensure_inside, parse_json};

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list_food_requests).post(create_food_request))
}

pub async fn list_food_requests(State(state): State<AppState>) -> Result<Json<Vec<FoodRequest>>> {
    Ok(Json(state.store.list_food_requests().await?))
}

pub async fn create_food_request(
    State(state): State<AppState>,
    body: std::result::Result<Bytes, BytesRejection>,
) -> Result<Json<CreatedResponse>> {
    let payload: NewFoodRequest = parse_json(&body?)?;
    payload.validate()?;
    ensure_inside(&state.geofence, payload.location)?;

    let food_request = payload.into_food_request(Utc::now());
    state.store.insert_food_request(&food_request).await?;

    info!("🥫 Food request {} ({} for {})", food_request.id, food_request.qty, food_request.animal);
    Ok(Json(CreatedResponse { id: food_request.id }))
}
