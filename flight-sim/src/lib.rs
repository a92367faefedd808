//! Simulates a flight between two airports: great-circle distance and camera
//! setup for the route, and a tick-driven position that steps from the origin
//! to the destination.

pub mod camera;
pub mod config;
pub mod geo;
pub mod render;
pub mod stepper;
pub mod trajectory;
pub mod types;

pub use camera::{CameraState, ViewSettings};
pub use render::{Frame, Renderer};
pub use trajectory::{Phase, TickOutcome, TrajectoryConfig, TrajectoryController};
pub use types::airport::{Airport, AirportTable};
pub use types::geo_point::GeoPoint;
pub use types::route::{FlightDuration, RouteTable};
pub use types::sim_error::SimError;
pub use types::simulation::{RouteSelection, Simulation};
pub use types::timer::Timer;
