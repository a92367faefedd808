//! Great-circle helpers used to set up the camera for a route.

use crate::types::geo_point::GeoPoint;

pub const EARTH_RADIUS_KM: f64 = 6371.0;
pub const EARTH_RADIUS_MILES: f64 = 3956.0;

/// Great-circle distance between two airports, rounded to whole units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Distance {
    pub km: i64,
    pub miles: i64,
}

/// Rounds `value` to `decimals` places, ties to even.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}

/// Central angle between two points in radians (haversine formula).
fn central_angle(a: GeoPoint, b: GeoPoint) -> f64 {
    let delta_lat = b.lat_rad() - a.lat_rad();
    let delta_lon = b.lon_rad() - a.lon_rad();

    let h = (delta_lat / 2.0).sin().powi(2)
        + a.lat_rad().cos() * b.lat_rad().cos() * (delta_lon / 2.0).sin().powi(2);

    // Clamp guards asin against h drifting a hair above 1 for antipodal points.
    2.0 * h.sqrt().min(1.0).asin()
}

/// Haversine distance on a sphere, in kilometres and miles.
pub fn distance(a: GeoPoint, b: GeoPoint) -> Distance {
    let c = central_angle(a, b);
    Distance {
        km: (c * EARTH_RADIUS_KM).round_ties_even() as i64,
        miles: (c * EARTH_RADIUS_MILES).round_ties_even() as i64,
    }
}

/// Spherical midpoint of the great-circle segment `a`-`b`, rounded to 2 decimals.
pub fn midpoint(a: GeoPoint, b: GeoPoint) -> GeoPoint {
    let (lat1, lon1) = (a.lat_rad(), a.lon_rad());
    let (lat2, lon2) = (b.lat_rad(), b.lon_rad());

    let bx = lat2.cos() * (lon2 - lon1).cos();
    let by = lat2.cos() * (lon2 - lon1).sin();

    let lat3 = (lat1.sin() + lat2.sin()).atan2(((lat1.cos() + bx).powi(2) + by.powi(2)).sqrt());
    let lon3 = lon1 + by.atan2(lat1.cos() + bx);

    GeoPoint {
        latitude: round_to(lat3.to_degrees(), 2),
        longitude: round_to(lon3.to_degrees(), 2),
    }
}
