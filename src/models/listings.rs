use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::common::{resolve_id, Location};

/// An animal posted for adoption
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Listing {
    pub id: String,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub animal_type: String,
    pub name: String,
    pub desc: String,
    pub img: String,
    pub contact: String,
    pub lat: f64,
    pub lng: f64,
    pub created_at: DateTime<Utc>,
}

impl Listing {
    /// Label used wherever a listing is referenced, e.g. `Dog • Bantay`
    pub fn label(&self) -> String {
        format!("{} • {}", self.animal_type, self.name)
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct NewListing {
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub animal_type: String,
    pub name: String,
    #[serde(default)]
    pub desc: String,
    // Usually a data URL produced by the browser file picker
    #[serde(default)]
    pub img: String,
    #[validate(length(min = 1, message = "contact is required"))]
    pub contact: String,
    pub location: Location,
}

impl NewListing {
    pub fn into_listing(self, created_at: DateTime<Utc>) -> Listing {
        Listing {
            id: resolve_id(self.id),
            animal_type: self.animal_type,
            name: self.name,
            desc: self.desc,
            img: self.img,
            contact: self.contact,
            lat: self.location.lat,
            lng: self.location.lng,
            created_at,
        }
    }
}
