pub mod food_requests;
pub mod geofence;
pub mod listings;
pub mod map;
pub mod notifications;
pub mod pickups;
pub mod proxy;
pub mod requests;
pub mod service;

use axum::body::Bytes;
use serde::de::DeserializeOwned;

use crate::errors::{AppError, Result};
use crate::geofence::Geofence;
use crate::models::Location;

/// Decodes a JSON body whatever `Content-Type` the client sent
pub(crate) fn parse_json<T: DeserializeOwned>(body: &Bytes) -> Result<T> {
    Ok(serde_json::from_slice(body)?)
}

/// Rejects locations outside the configured region before anything is written
pub(crate) fn ensure_inside(geofence: &Geofence, location: Location) -> Result<()> {
    if geofence.contains(location.into()) {
        Ok(())
    } else {
        Err(AppError::OutsideGeofence(geofence.rejection_message()))
    }
}
