use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::common::{resolve_id, Location};

/// Someone asking to adopt the animal of a listing
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AdoptionRequest {
    pub id: String,
    pub listing_id: String,
    pub message: String,
    pub contact: String,
    pub lat: f64,
    pub lng: f64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct NewAdoptionRequest {
    pub id: Option<String>,
    #[serde(rename = "listingId")]
    #[validate(length(min = 1, message = "listingId is required"))]
    pub listing_id: String,
    pub message: String,
    #[validate(length(min = 1, message = "contact is required"))]
    pub contact: String,
    pub location: Location,
}

impl NewAdoptionRequest {
    pub fn into_request(self, created_at: DateTime<Utc>) -> AdoptionRequest {
        AdoptionRequest {
            id: resolve_id(self.id),
            listing_id: self.listing_id,
            message: self.message,
            contact: self.contact,
            lat: self.location.lat,
            lng: self.location.lng,
            created_at,
        }
    }
}
