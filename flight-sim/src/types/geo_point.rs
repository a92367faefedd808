use std::fmt;

use super::sim_error::SimError;

/// A position on the globe in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    /// Creates a point, rejecting non-finite values and latitudes outside [-90, 90].
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, SimError> {
        let point = GeoPoint {
            latitude,
            longitude,
        };
        point.validate()?;
        Ok(point)
    }

    /// Checks that both axes are finite and the latitude is in range.
    pub fn validate(&self) -> Result<(), SimError> {
        if !self.latitude.is_finite() || !self.longitude.is_finite() {
            return Err(SimError::InvalidCoordinate(format!(
                "non-finite value in ({}, {})",
                self.latitude, self.longitude
            )));
        }
        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(SimError::InvalidCoordinate(format!(
                "latitude {} out of range",
                self.latitude
            )));
        }
        Ok(())
    }

    pub fn lat_rad(&self) -> f64 {
        self.latitude.to_radians()
    }

    pub fn lon_rad(&self) -> f64 {
        self.longitude.to_radians()
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.5}, {:.5})", self.latitude, self.longitude)
    }
}
