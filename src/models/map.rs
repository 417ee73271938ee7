use serde::{Deserialize, Serialize};

use crate::geofence::Point;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layer {
    Listings,
    Requests,
    Pickups,
    Food,
    Links,
}

impl Layer {
    pub const ALL: [Layer; 5] = [
        Layer::Listings,
        Layer::Requests,
        Layer::Pickups,
        Layer::Food,
        Layer::Links,
    ];

    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "listings" => Some(Layer::Listings),
            "requests" => Some(Layer::Requests),
            "pickups" => Some(Layer::Pickups),
            "food" | "food_requests" => Some(Layer::Food),
            "links" => Some(Layer::Links),
            _ => None,
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            Layer::Listings => "#2ecc71",
            Layer::Requests => "#e67e22",
            Layer::Pickups | Layer::Links => "#8e44ad",
            Layer::Food => "#f1c40f",
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct MapQueryParams {
    /// Comma separated layer names; all layers when absent
    pub layers: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MapMarker {
    pub layer: Layer,
    pub id: String,
    pub point: Point,
    pub color: &'static str,
    pub title: String,
    pub detail: String,
    pub contact: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub img: Option<String>,
}

/// Dashed line from an adoption request to one of its pickups
#[derive(Debug, Clone, Serialize)]
pub struct MapLink {
    pub request_id: String,
    pub pickup_id: String,
    pub from: Point,
    pub to: Point,
    pub color: &'static str,
    pub tooltip: String,
}

#[derive(Debug, Serialize)]
pub struct MapOverview {
    pub center: Point,
    pub radius_km: f64,
    pub markers: Vec<MapMarker>,
    pub links: Vec<MapLink>,
}
