use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::geofence::Point;

/// `location` object carried by every create payload
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Location {
    #[serde(deserialize_with = "deserialize_coordinate")]
    pub lat: f64,
    #[serde(deserialize_with = "deserialize_coordinate")]
    pub lng: f64,
}

impl From<Location> for Point {
    fn from(location: Location) -> Self {
        Point::new(location.lat, location.lng)
    }
}

/// Body returned by every successful create
#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub id: String,
}

/// Uses the client supplied id verbatim when it is non-empty, otherwise mints a new one.
pub fn resolve_id(requested: Option<String>) -> String {
    requested
        .filter(|id| !id.is_empty())
        .unwrap_or_else(|| Uuid::new_v4().simple().to_string())
}

// Custom deserializer for coordinates that accepts both numbers and numeric strings
pub fn deserialize_coordinate<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::{Error, Visitor};
    use std::fmt;

    struct Coordinate;

    impl<'de> Visitor<'de> for Coordinate {
        type Value = f64;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a number or a numeric string")
        }

        fn visit_f64<E: Error>(self, value: f64) -> Result<Self::Value, E> {
            Ok(value)
        }

        fn visit_i64<E: Error>(self, value: i64) -> Result<Self::Value, E> {
            Ok(value as f64)
        }

        fn visit_u64<E: Error>(self, value: u64) -> Result<Self::Value, E> {
            Ok(value as f64)
        }

        fn visit_str<E: Error>(self, value: &str) -> Result<Self::Value, E> {
            value
                .trim()
                .parse::<f64>()
                .map_err(|_| E::custom(format!("invalid coordinate: {value}")))
        }
    }

    deserializer.deserialize_any(Coordinate)
}
