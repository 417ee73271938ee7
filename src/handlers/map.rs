use std::collections::{HashMap, HashSet};

use axum::{
    extract::{Query, State},
    response::Json,
};

use crate::errors::{AppError, Result};
use crate::geofence::{Geofence, Point};
use crate::models::{Layer, MapLink, MapMarker, MapOverview, MapQueryParams};
use crate::store::Snapshot;
use crate::AppState;

/// GET /map?layers=listings,links - every record as a marker plus the
/// request → pickup lines, ready for a map client to draw
pub async fn overview(
    State(state): State<AppState>,
    Query(params): Query<MapQueryParams>,
) -> Result<Json<MapOverview>> {
    let layers = parse_layers(params.layers.as_deref())?;
    let snapshot = state.store.snapshot().await?;
    Ok(Json(build_overview(&snapshot, &layers, &state.geofence)))
}

fn parse_layers(raw: Option<&str>) -> Result<HashSet<Layer>> {
    let raw = match raw.map(str::trim) {
        None | Some("") => return Ok(Layer::ALL.into_iter().collect()),
        Some(raw) => raw,
    };

    raw.split(',')
        .filter(|name| !name.trim().is_empty())
        .map(|name| {
            Layer::parse(name)
                .ok_or_else(|| AppError::BadRequest(format!("Unknown map layer: {}", name.trim())))
        })
        .collect()
}

pub fn build_overview(snapshot: &Snapshot, layers: &HashSet<Layer>, geofence: &Geofence) -> MapOverview {
    let listing_names: HashMap<&str, String> = snapshot
        .listings
        .iter()
        .map(|l| (l.id.as_str(), l.label()))
        .collect();

    let request_titles: HashMap<&str, String> = snapshot
        .requests
        .iter()
        .map(|r| {
            let title = listing_names
                .get(r.listing_id.as_str())
                .cloned()
                .unwrap_or_else(|| "Listing".to_string());
            (r.id.as_str(), title)
        })
        .collect();

    let mut markers = Vec::new();

    if layers.contains(&Layer::Listings) {
        markers.extend(snapshot.listings.iter().map(|l| MapMarker {
            layer: Layer::Listings,
            id: l.id.clone(),
            point: Point::new(l.lat, l.lng),
            color: Layer::Listings.color(),
            title: l.label(),
            detail: l.desc.clone(),
            contact: l.contact.clone(),
            img: Some(l.img.clone()).filter(|img| !img.is_empty()),
        }));
    }

    if layers.contains(&Layer::Requests) {
        markers.extend(snapshot.requests.iter().map(|r| {
            let related: Vec<&str> = snapshot
                .pickups
                .iter()
                .filter(|p| p.request_id == r.id)
                .map(|p| p.contact.as_str())
                .collect();
            let detail = if related.is_empty() {
                r.message.clone()
            } else {
                format!(
                    "{}\n{} pickup{}: {}",
                    r.message,
                    related.len(),
                    if related.len() > 1 { "s" } else { "" },
                    related.join(", ")
                )
            };
            MapMarker {
                layer: Layer::Requests,
                id: r.id.clone(),
                point: Point::new(r.lat, r.lng),
                color: Layer::Requests.color(),
                title: format!("Request for {}", request_titles[r.id.as_str()]),
                detail,
                contact: r.contact.clone(),
                img: None,
            }
        }));
    }

    if layers.contains(&Layer::Pickups) {
        markers.extend(snapshot.pickups.iter().map(|p| {
            let request_title = request_titles
                .get(p.request_id.as_str())
                .map(String::as_str)
                .unwrap_or("Request");
            MapMarker {
                layer: Layer::Pickups,
                id: p.id.clone(),
                point: Point::new(p.lat, p.lng),
                color: Layer::Pickups.color(),
                title: format!("Pickup for {}", request_title),
                detail: format!("{} {}", p.date, p.time),
                contact: p.contact.clone(),
                img: None,
            }
        }));
    }

    if layers.contains(&Layer::Food) {
        markers.extend(snapshot.food_requests.iter().map(|f| MapMarker {
            layer: Layer::Food,
            id: f.id.clone(),
            point: Point::new(f.lat, f.lng),
            color: Layer::Food.color(),
            title: format!("Food Request ({})", f.animal),
            detail: format!("{} • {}", f.kind, f.qty),
            contact: f.contact.clone(),
            img: None,
        }));
    }

    let links = if layers.contains(&Layer::Links) {
        let requests: HashMap<&str, Point> = snapshot
            .requests
            .iter()
            .map(|r| (r.id.as_str(), Point::new(r.lat, r.lng)))
            .collect();

        snapshot
            .pickups
            .iter()
            .filter_map(|p| {
                requests.get(p.request_id.as_str()).map(|from| MapLink {
                    request_id: p.request_id.clone(),
                    pickup_id: p.id.clone(),
                    from: *from,
                    to: Point::new(p.lat, p.lng),
                    color: Layer::Links.color(),
                    tooltip: format!("Pickup by {} • {} {}", p.contact, p.date, p.time),
                })
            })
            .collect()
    } else {
        Vec::new()
    };

    MapOverview {
        center: geofence.center,
        radius_km: geofence.radius_km,
        markers,
        links,
    }
}
