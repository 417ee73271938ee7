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
use crate::models::{AdoptionRequest, CreatedResponse, NewAdoptionRequest};
use crate::AppState;

use super::{ensure_inside, parse_json};

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list_requests).post(create_request))
}

/// GET /requests
pub async fn list_requests(State(state): State<AppState>) -> Result<Json<Vec<AdoptionRequest>>> {
    Ok(Json(state.store.list_requests().await?))
}

/// POST /requests - ask to adopt a listing and notify its owner
///
/// A request that points at an unknown listing is still stored; there is
/// just nobody to notify.
pub async fn create_request(
    State(state): State<AppState>,
    body: std::result::Result<Bytes, BytesRejection>,
) -> Result<Json<CreatedResponse>> {
    let payload: NewAdoptionRequest = parse_json(&body?)?;
    payload.validate()?;
    ensure_inside(&state.geofence, payload.location)?;

    let request = payload.into_request(Utc::now());
    let notification = state.store.insert_request(&request).await?;

    info!(
        "📨 Adoption request {} for listing {} (owner notified: {})",
        request.id,
        request.listing_id,
        notification.is_some()
    );
    Ok(Json(CreatedResponse { id: request.id }))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::handlers::test_support::{get, post, test_app};

    #[tokio::test]
    async fn request_notifies_listing_owner() {
        let app = test_app();
        post(
            &app,
            "/listings",
            json!({
                "id": "l1",
                "type": "Dog",
                "name": "Bantay",
                "contact": "owner@example.com",
                "location": {"lat": 10.31, "lng": 123.88}
            }),
        )
        .await;

        let (status, body) = post(
            &app,
            "/requests",
            json!({
                "listingId": "l1",
                "message": "We have a fenced yard",
                "contact": "adopter@example.com",
                "location": {"lat": 10.29, "lng": 123.9}
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let request_id = body["id"].as_str().unwrap().to_string();

        let (_, requests) = get(&app, "/requests").await;
        assert_eq!(requests[0]["id"], request_id.as_str());
        assert_eq!(requests[0]["listing_id"], "l1");

        let (_, notifications) = get(&app, "/notifications?contact=owner@example.com").await;
        let notifications = notifications.as_array().unwrap();
        assert_eq!(notifications.len(), 1);
        assert_eq!(
            notifications[0]["message"],
            "New adoption request for Dog • Bantay from adopter@example.com"
        );
        assert_eq!(notifications[0]["read"], 0);
    }

    #[tokio::test]
    async fn request_for_unknown_listing_is_accepted_silently() {
        let app = test_app();
        let (status, _) = post(
            &app,
            "/requests",
            json!({
                "listingId": "ghost",
                "message": "hello",
                "contact": "adopter",
                "location": {"lat": 10.29, "lng": 123.9}
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (_, notifications) = get(&app, "/notifications").await;
        assert!(notifications.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn request_outside_region_writes_nothing() {
        let app = test_app();
        let (status, _) = post(
            &app,
            "/requests",
            json!({
                "listingId": "l1",
                "message": "hello",
                "contact": "adopter",
                "location": {"lat": 7.07, "lng": 125.61}
            }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (_, requests) = get(&app, "/requests").await;
        assert!(requests.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn listing_id_is_required() {
        let app = test_app();
        let (status, _) = post(
            &app,
            "/requests",
            json!({
                "listingId": "",
                "message": "hello",
                "contact": "adopter",
                "location": {"lat": 10.29, "lng": 123.9}
            }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
