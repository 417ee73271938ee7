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
use crate::models::{CreatedResponse, Listing, NewListing};
use crate::AppState;

use super::{ensure_inside, parse_json};

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list_listings).post(create_listing))
}

/// GET /listings - every animal currently posted
pub async fn list_listings(State(state): State<AppState>) -> Result<Json<Vec<Listing>>> {
    Ok(Json(state.store.list_listings().await?))
}

/// POST /listings - post an animal for adoption
pub async fn create_listing(
    State(state): State<AppState>,
    body: std::result::Result<Bytes, BytesRejection>,
) -> Result<Json<CreatedResponse>> {
    let payload: NewListing = parse_json(&body?)?;
    payload.validate()?;
    ensure_inside(&state.geofence, payload.location)?;

    let listing = payload.into_listing(Utc::now());
    state.store.insert_listing(&listing).await?;

    info!("🐾 New listing {} ({})", listing.id, listing.label());
    Ok(Json(CreatedResponse { id: listing.id }))
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    use crate::handlers::test_support::{get, post, post_raw, send, test_app};

    #[tokio::test]
    async fn create_then_list() {
        let app = test_app();
        let (status, body) = post(
            &app,
            "/listings",
            json!({
                "type": "Cat",
                "name": "Mingming",
                "desc": "Calico, very shy",
                "contact": "0917 555 0101",
                "location": {"lat": 10.3157, "lng": 123.8854}
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let id = body["id"].as_str().unwrap().to_string();
        assert_eq!(id.len(), 32);

        let (status, body) = get(&app, "/listings").await;
        assert_eq!(status, StatusCode::OK);
        let rows = body.as_array().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["id"], id.as_str());
        assert_eq!(rows[0]["type"], "Cat");
        assert_eq!(rows[0]["img"], "");
        assert_eq!(rows[0]["lat"], 10.3157);
        assert!(rows[0]["created_at"].is_string());
    }

    #[tokio::test]
    async fn api_prefix_serves_the_same_routes() {
        let app = test_app();
        let (status, body) = post(
            &app,
            "/api/listings",
            json!({
                "id": "dog-1",
                "type": "Dog",
                "name": "Bantay",
                "contact": "owner@example.com",
                "location": {"lat": "10.30", "lng": "123.90"}
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], "dog-1");

        let (_, body) = get(&app, "/listings").await;
        assert_eq!(body[0]["id"], "dog-1");
        assert_eq!(body[0]["lng"], 123.9);
    }

    #[tokio::test]
    async fn location_outside_region_is_rejected() {
        let app = test_app();
        let (status, body) = post(
            &app,
            "/listings",
            json!({
                "type": "Dog",
                "name": "Far away",
                "contact": "x",
                "location": {"lat": 14.5995, "lng": 120.9842}
            }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Location must be within Cebu");

        let (_, body) = get(&app, "/listings").await;
        assert!(body.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_fields_are_bad_requests() {
        let app = test_app();
        let (status, _) = post(
            &app,
            "/listings",
            json!({"type": "Dog", "contact": "x", "location": {"lat": 10.3, "lng": 123.9}}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = post(
            &app,
            "/listings",
            json!({"type": "Dog", "name": "N", "contact": "", "location": {"lat": 10.3, "lng": 123.9}}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("contact"));
    }

    #[tokio::test]
    async fn duplicate_id_conflicts() {
        let app = test_app();
        let payload = json!({
            "id": "same",
            "type": "Dog",
            "name": "Bantay",
            "contact": "x",
            "location": {"lat": 10.3, "lng": 123.9}
        });
        assert_eq!(post(&app, "/listings", payload.clone()).await.0, StatusCode::OK);
        assert_eq!(post(&app, "/listings", payload.clone()).await.0, StatusCode::CONFLICT);

        let mut padded = payload;
        padded["id"] = json!(" same");
        let (status, body) = post(&app, "/listings", padded).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], " same");
    }

    #[tokio::test]
    async fn json_is_accepted_whatever_the_content_type() {
        let app = test_app();
        let body = r#"{"type":"Cat","name":"Puti","contact":"x","location":{"lat":10.3,"lng":123.9}}"#;

        let (status, created) = post_raw(&app, "/listings", None, body).await;
        assert_eq!(status, StatusCode::OK);
        assert!(created["id"].is_string());

        let (status, _) = post_raw(&app, "/listings", Some("text/plain;charset=UTF-8"), body).await;
        assert_eq!(status, StatusCode::OK);

        let (status, error) = post_raw(&app, "/listings", Some("text/plain"), "{oops").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error["status"], 400);

        let (_, rows) = get(&app, "/listings").await;
        assert_eq!(rows.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn unsupported_method_is_405() {
        let app = test_app();
        let (status, _) = send(&app, Method::DELETE, "/listings", None).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    }
}
