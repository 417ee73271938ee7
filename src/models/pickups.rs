use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::common::{resolve_id, Location};

/// Scheduled hand-over for an adoption request. Date and time are kept as
/// the strings the client picked.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Pickup {
    pub id: String,
    pub request_id: String,
    pub date: String,
    pub time: String,
    pub contact: String,
    pub lat: f64,
    pub lng: f64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct NewPickup {
    pub id: Option<String>,
    #[serde(rename = "requestId")]
    #[validate(length(min = 1, message = "requestId is required"))]
    pub request_id: String,
    pub date: String,
    pub time: String,
    #[validate(length(min = 1, message = "contact is required"))]
    pub contact: String,
    pub location: Location,
}

impl NewPickup {
    pub fn into_pickup(self, created_at: DateTime<Utc>) -> Pickup {
        Pickup {
            id: resolve_id(self.id),
            request_id: self.request_id,
            date: self.date,
            time: self.time,
            contact: self.contact,
            lat: self.location.lat,
            lng: self.location.lng,
            created_at,
        }
    }
}
