use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::common::{resolve_id, Location};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FoodRequest {
    pub id: String,
    pub animal: String,
    pub kind: String,
    pub qty: String,
    pub contact: String,
    pub lat: f64,
    pub lng: f64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct NewFoodRequest {
    pub id: Option<String>,
    pub animal: String,
    pub kind: String,
    pub qty: String,
    #[validate(length(min = 1, message = "contact is required"))]
    pub contact: String,
    pub location: Location,
}

impl NewFoodRequest {
    pub fn into_food_request(self, created_at: DateTime<Utc>) -> FoodRequest {
        FoodRequest {
            id: resolve_id(self.id),
            animal: self.animal,
            kind: self.kind,
            qty: self.qty,
            contact: self.contact,
            lat: self.location.lat,
            lng: self.location.lng,
            created_at,
        }
    }
}
