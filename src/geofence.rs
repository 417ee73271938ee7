use serde::{Deserialize, Serialize};

/// Mean Earth radius used by the haversine formula
const EARTH_RADIUS_KM: f64 = 6371.0;

pub const DEFAULT_REGION_NAME: &str = "Cebu";
pub const DEFAULT_CENTER: Point = Point {
    lat: 10.3157,
    lng: 123.8854,
};
pub const DEFAULT_RADIUS_KM: f64 = 110.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub lat: f64,
    pub lng: f64,
}

impl Point {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }
}

/// Great-circle distance between two points in kilometres; NaN when either
/// point has a non-finite coordinate.
pub fn haversine_km(a: Point, b: Point) -> f64 {
    if !(a.is_finite() && b.is_finite()) {
        return f64::NAN;
    }

    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();

    let sin_d_lat = (d_lat / 2.0).sin();
    let sin_d_lng = (d_lng / 2.0).sin();
    let h = sin_d_lat * sin_d_lat + lat1.cos() * lat2.cos() * sin_d_lng * sin_d_lng;

    2.0 * EARTH_RADIUS_KM * h.sqrt().min(1.0).asin()
}

/// Circular region every submitted location has to fall into
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Geofence {
    pub name: String,
    pub center: Point,
    pub radius_km: f64,
}

impl Default for Geofence {
    fn default() -> Self {
        Self {
            name: DEFAULT_REGION_NAME.to_string(),
            center: DEFAULT_CENTER,
            radius_km: DEFAULT_RADIUS_KM,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GeofenceCheck {
    pub region: String,
    pub point: Point,
    pub inside: bool,
    pub distance_km: f64,
    pub rounded_km: i64,
    pub center: Point,
    pub radius_km: f64,
}

impl Geofence {
    pub fn distance_km(&self, point: Point) -> f64 {
        haversine_km(self.center, point)
    }

    /// Boundary inclusive; NaN or infinite coordinates are always outside.
    pub fn contains(&self, point: Point) -> bool {
        point.is_finite() && self.distance_km(point) <= self.radius_km
    }

    pub fn check(&self, point: Point) -> GeofenceCheck {
        let distance_km = self.distance_km(point);
        GeofenceCheck {
            region: self.name.clone(),
            point,
            inside: self.contains(point),
            distance_km,
            rounded_km: if point.is_finite() {
                distance_km.round() as i64
            } else {
                -1
            },
            center: self.center,
            radius_km: self.radius_km,
        }
    }

    pub fn rejection_message(&self) -> String {
        format!("Location must be within {}", self.name)
    }
}
