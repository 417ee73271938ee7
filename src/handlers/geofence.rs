use axum::{
    extract::{Query, State},
    response::{IntoResponse, Json, Response},
};
use serde::Deserialize;

use crate::errors::{AppError, Result};
use crate::geofence::Point;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct GeofenceQueryParams {
    pub lat: Option<String>,
    pub lng: Option<String>,
}

/// GET /geofence - describe the region, or check one point against it
///
/// Lets a client tell the user how far a picked spot is from the center
/// before a form is submitted.
pub async fn describe_or_check(
    State(state): State<AppState>,
    Query(params): Query<GeofenceQueryParams>,
) -> Result<Response> {
    match (params.lat, params.lng) {
        (None, None) => Ok(Json(state.geofence.as_ref().clone()).into_response()),
        (Some(lat), Some(lng)) => {
            let point = Point::new(parse_coordinate("lat", &lat)?, parse_coordinate("lng", &lng)?);
            Ok(Json(state.geofence.check(point)).into_response())
        }
        _ => Err(AppError::BadRequest(
            "Both lat and lng must be provided".to_string(),
        )),
    }
}

fn parse_coordinate(name: &str, raw: &str) -> Result<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| AppError::BadRequest(format!("Invalid {} value: {}", name, raw)))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use crate::handlers::test_support::{get, test_app};

    #[tokio::test]
    async fn describes_region() {
        let app = test_app();
        let (status, body) = get(&app, "/geofence").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "Cebu");
        assert_eq!(body["radius_km"], 110.0);
        assert_eq!(body["center"]["lat"], 10.3157);
    }

    #[tokio::test]
    async fn checks_points() {
        let app = test_app();
        let (_, inside) = get(&app, "/geofence?lat=10.3157&lng=124.0").await;
        assert_eq!(inside["inside"], true);
        assert_eq!(inside["rounded_km"], 13);

        let (_, outside) = get(&app, "/geofence?lat=14.5995&lng=120.9842").await;
        assert_eq!(outside["inside"], false);
    }

    #[tokio::test]
    async fn rejects_partial_or_invalid_points() {
        let app = test_app();
        assert_eq!(get(&app, "/geofence?lat=10.3").await.0, StatusCode::BAD_REQUEST);
        assert_eq!(get(&app, "/geofence?lat=abc&lng=1").await.0, StatusCode::BAD_REQUEST);
        assert_eq!(get(&app, "/geofence?lat=NaN&lng=1").await.0, StatusCode::BAD_REQUEST);
    }
}
