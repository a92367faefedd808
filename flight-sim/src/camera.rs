use crate::geo::{self, Distance};
use crate::types::geo_point::GeoPoint;
use crate::types::sim_error::SimError;

pub const MAX_PITCH: u8 = 60;
pub const MAX_BEARING: u16 = 360;
pub const DEFAULT_PITCH: u8 = 25;
pub const DEFAULT_BEARING: u16 = 0;

/// Map zoom level for a route of the given length.
///
/// Thresholds are checked in order, so exactly 500 miles and anything in
/// 1400..=2500 fall through to 3.
pub fn zoom_for_distance(miles: i64) -> u8 {
    if miles > 2500 {
        2
    } else if miles < 1400 && miles > 500 {
        4
    } else if miles < 500 {
        5
    } else {
        3
    }
}

/// Radius, in metres, of the marker drawn at the simulated position.
pub fn marker_radius(zoom: u8) -> u32 {
    match zoom {
        5 => 30000,
        4 => 40000,
        3 => 70000,
        _ => 80000,
    }
}

/// User-controlled tilt and rotation of the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewSettings {
    pitch: u8,
    bearing: u16,
}

impl Default for ViewSettings {
    fn default() -> Self {
        ViewSettings {
            pitch: DEFAULT_PITCH,
            bearing: DEFAULT_BEARING,
        }
    }
}

impl ViewSettings {
    pub fn new(pitch: u8, bearing: u16) -> Result<Self, SimError> {
        let mut view = ViewSettings::default();
        view.set_pitch(pitch)?;
        view.set_bearing(bearing)?;
        Ok(view)
    }

    pub fn pitch(&self) -> u8 {
        self.pitch
    }

    pub fn bearing(&self) -> u16 {
        self.bearing
    }

    pub fn set_pitch(&mut self, pitch: u8) -> Result<(), SimError> {
        if pitch > MAX_PITCH {
            return Err(SimError::InvalidViewSetting(format!(
                "pitch {} is outside 0..={}",
                pitch, MAX_PITCH
            )));
        }
        self.pitch = pitch;
        Ok(())
    }

    pub fn set_bearing(&mut self, bearing: u16) -> Result<(), SimError> {
        if bearing > MAX_BEARING {
            return Err(SimError::InvalidViewSetting(format!(
                "bearing {} is outside 0..={}",
                bearing, MAX_BEARING
            )));
        }
        self.bearing = bearing;
        Ok(())
    }
}

/// Camera handed to the renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraState {
    pub center: GeoPoint,
    pub zoom: u8,
    pub bearing: u16,
    pub pitch: u8,
}

impl CameraState {
    /// Centers the camera between both endpoints and zooms to fit the route.
    pub fn for_route(origin: GeoPoint, destination: GeoPoint, view: ViewSettings) -> Self {
        let Distance { miles, .. } = geo::distance(origin, destination);
        CameraState {
            center: geo::midpoint(origin, destination),
            zoom: zoom_for_distance(miles),
            bearing: view.bearing(),
            pitch: view.pitch(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zoom_thresholds() {
        assert_eq!(zoom_for_distance(3000), 2);
        assert_eq!(zoom_for_distance(1000), 4);
        assert_eq!(zoom_for_distance(300), 5);
        assert_eq!(zoom_for_distance(1800), 3);
    }

    #[test]
    fn test_zoom_boundaries() {
        assert_eq!(zoom_for_distance(2500), 3);
        assert_eq!(zoom_for_distance(2501), 2);
        assert_eq!(zoom_for_distance(1400), 3);
        assert_eq!(zoom_for_distance(1399), 4);
        assert_eq!(zoom_for_distance(501), 4);
        assert_eq!(zoom_for_distance(500), 3);
        assert_eq!(zoom_for_distance(499), 5);
        assert_eq!(zoom_for_distance(0), 5);
    }

    #[test]
    fn test_marker_radius_by_zoom() {
        assert_eq!(marker_radius(5), 30000);
        assert_eq!(marker_radius(4), 40000);
        assert_eq!(marker_radius(3), 70000);
        assert_eq!(marker_radius(2), 80000);
    }

    #[test]
    fn test_view_settings_limits() {
        assert!(ViewSettings::new(60, 360).is_ok());
        assert!(matches!(
            ViewSettings::new(61, 0),
            Err(SimError::InvalidViewSetting(_))
        ));
        assert!(ViewSettings::new(0, 361).is_err());

        let mut view = ViewSettings::default();
        assert!(view.set_pitch(70).is_err());
        assert_eq!(view.pitch(), DEFAULT_PITCH);
    }

    #[test]
    fn test_camera_for_route() {
        let origin = GeoPoint {
            latitude: 0.0,
            longitude: 10.0,
        };
        let destination = GeoPoint {
            latitude: 0.0,
            longitude: 20.0,
        };
        let camera = CameraState::for_route(origin, destination, ViewSettings::new(30, 90).unwrap());
        assert_eq!(camera.center.longitude, 15.0);
        // 10 degrees of longitude at the equator is about 690 miles.
        assert_eq!(camera.zoom, 4);
        assert_eq!(camera.bearing, 90);
        assert_eq!(camera.pitch, 30);
    }
}
