use crate::camera::{marker_radius, CameraState};
use crate::types::airport::Airport;
use crate::types::geo_point::GeoPoint;
use crate::types::sim_error::SimError;

pub const ORIGIN_ARC_COLOR: &str = "#ed1c24";
pub const DESTINATION_ARC_COLOR: &str = "#faa61a";

/// Heat intensity of the departure endpoint.
pub const ORIGIN_HEAT_WEIGHT: f64 = 1.0 / 2000.0;
/// Heat intensity of the arrival endpoint.
pub const DESTINATION_HEAT_WEIGHT: f64 = 1.0 / 300.0;

/// A route line drawn between two airports.
#[derive(Debug, Clone, PartialEq)]
pub struct ArcSegment {
    pub name: String,
    pub color: &'static str,
    pub source: GeoPoint,
    pub target: GeoPoint,
}

/// Weighted point of the heat layer.
#[derive(Debug, Clone, PartialEq)]
pub struct HeatPoint {
    pub name: String,
    pub position: GeoPoint,
    pub weight: f64,
}

/// Static layers of a route: one arc per direction and both endpoints.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteLayers {
    pub arcs: [ArcSegment; 2],
    pub heat: [HeatPoint; 2],
}

impl RouteLayers {
    pub fn new(origin: &Airport, destination: &Airport) -> Self {
        RouteLayers {
            arcs: [
                ArcSegment {
                    name: origin.display_name(),
                    color: ORIGIN_ARC_COLOR,
                    source: origin.position,
                    target: destination.position,
                },
                ArcSegment {
                    name: destination.display_name(),
                    color: DESTINATION_ARC_COLOR,
                    source: destination.position,
                    target: origin.position,
                },
            ],
            heat: [
                HeatPoint {
                    name: origin.display_name(),
                    position: origin.position,
                    weight: ORIGIN_HEAT_WEIGHT,
                },
                HeatPoint {
                    name: destination.display_name(),
                    position: destination.position,
                    weight: DESTINATION_HEAT_WEIGHT,
                },
            ],
        }
    }
}

/// Everything the renderer needs to draw one tick.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame<'a> {
    pub camera: CameraState,
    pub position: GeoPoint,
    pub marker_radius: u32,
    pub layers: &'a RouteLayers,
}

impl<'a> Frame<'a> {
    pub fn new(camera: CameraState, position: GeoPoint, layers: &'a RouteLayers) -> Self {
        Frame {
            camera,
            position,
            marker_radius: marker_radius(camera.zoom),
            layers,
        }
    }
}

/// Sink that draws frames, e.g. a map widget or a console printer.
pub trait Renderer {
    fn render(&mut self, frame: &Frame<'_>) -> Result<(), SimError>;

    /// Called once after the frame that reached the destination.
    fn arrived(&mut self, destination: &Airport) -> Result<(), SimError>;
}
