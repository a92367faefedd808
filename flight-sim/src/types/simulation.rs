use logger::{Level, Logger};
use rand::seq::SliceRandom;
use rand::Rng;

use super::airport::{Airport, AirportTable};
use super::route::{FlightDuration, RouteTable};
use super::sim_error::SimError;
use crate::camera::{CameraState, ViewSettings};
use crate::geo::{self, Distance};
use crate::render::{Frame, Renderer, RouteLayers};
use crate::trajectory::{Phase, TickOutcome, TrajectoryConfig, TrajectoryController};

/// Origin/destination pair picked by the user, with everything derived from it
/// computed once at selection time.
#[derive(Debug, Clone)]
pub struct RouteSelection {
    pub origin: Airport,
    pub destination: Airport,
    pub distance: Distance,
    pub duration: Option<FlightDuration>,
    pub layers: RouteLayers,
    camera: CameraState,
    controller: TrajectoryController,
}

impl RouteSelection {
    pub fn has_direct_flight(&self) -> bool {
        self.duration.is_some()
    }

    pub fn controller(&self) -> &TrajectoryController {
        &self.controller
    }
}

/// Manages one interactive session: the loaded lookup tables, the selected
/// route, the view settings and the trajectory of the simulated flight.
pub struct Simulation {
    airports: AirportTable,
    routes: RouteTable,
    config: TrajectoryConfig,
    view: ViewSettings,
    selection: Option<RouteSelection>,
    logger: Option<Logger>,
}

impl Simulation {
    pub fn new(
        airports: AirportTable,
        routes: RouteTable,
        config: TrajectoryConfig,
        view: ViewSettings,
        logger: Option<Logger>,
    ) -> Self {
        Simulation {
            airports,
            routes,
            config,
            view,
            selection: None,
            logger,
        }
    }

    pub fn airports(&self) -> &AirportTable {
        &self.airports
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    pub fn view(&self) -> ViewSettings {
        self.view
    }

    pub fn selection(&self) -> Option<&RouteSelection> {
        self.selection.as_ref()
    }

    /// Selects a route by display name or IATA code. Cancels any run in progress.
    pub fn select(
        &mut self,
        origin_query: &str,
        destination_query: &str,
    ) -> Result<&RouteSelection, SimError> {
        let origin = self.airports.resolve(origin_query)?.clone();
        let destination = self.airports.resolve(destination_query)?.clone();

        if origin.iata_code == destination.iata_code {
            return Err(SimError::SameAirport(origin.display_name()));
        }

        let controller =
            TrajectoryController::new(origin.position, destination.position, self.config)?;
        let distance = geo::distance(origin.position, destination.position);
        let duration = self.routes.lookup(&origin.iata_code, &destination.iata_code);

        self.log(
            Level::Info,
            &format!(
                "Selected {} -> {}: {} km / {} miles, {}",
                origin.iata_code,
                destination.iata_code,
                distance.km,
                distance.miles,
                duration.map_or("no direct flight".to_string(), |d| d.to_string())
            ),
        )?;

        let selection = RouteSelection {
            layers: RouteLayers::new(&origin, &destination),
            camera: CameraState::for_route(origin.position, destination.position, self.view),
            origin,
            destination,
            distance,
            duration,
            controller,
        };
        Ok(&*self.selection.insert(selection))
    }

    /// Picks a random route among the ones with a direct flight.
    pub fn select_random<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
    ) -> Result<&RouteSelection, SimError> {
        let routes = self.direct_routes();
        let (origin, destination) = routes.choose(rng).ok_or(SimError::NoRouteSelected)?.clone();
        self.select(&origin, &destination)
    }

    /// IATA pairs with a direct flight whose airports are both known, sorted.
    pub fn direct_routes(&self) -> Vec<(String, String)> {
        let mut routes: Vec<(String, String)> = self
            .routes
            .keys()
            .filter_map(|key| {
                let key = key.as_str();
                if key.len() != 6 || !key.is_ascii() {
                    return None;
                }
                let (origin, destination) = key.split_at(3);
                let known = self.airports.find_by_iata(origin).is_some()
                    && self.airports.find_by_iata(destination).is_some();
                (known && origin != destination)
                    .then(|| (origin.to_string(), destination.to_string()))
            })
            .collect();
        routes.sort();
        routes
    }

    pub fn set_pitch(&mut self, pitch: u8) -> Result<(), SimError> {
        self.view.set_pitch(pitch)
    }

    pub fn set_bearing(&mut self, bearing: u16) -> Result<(), SimError> {
        self.view.set_bearing(bearing)
    }

    /// Camera for the selected route, with the current pitch and bearing.
    pub fn camera(&self) -> Result<CameraState, SimError> {
        let selection = self.selection.as_ref().ok_or(SimError::NoRouteSelected)?;
        Ok(CameraState {
            bearing: self.view.bearing(),
            pitch: self.view.pitch(),
            ..selection.camera
        })
    }

    pub fn is_running(&self) -> bool {
        self.selection
            .as_ref()
            .is_some_and(|selection| selection.controller.is_running())
    }

    pub fn phase(&self) -> Option<Phase> {
        self.selection
            .as_ref()
            .map(|selection| selection.controller.phase())
    }

    /// Starts animating the selected route. Only routes with a direct flight can be flown.
    pub fn start(&mut self) -> Result<(), SimError> {
        let selection = self.selection.as_mut().ok_or(SimError::NoRouteSelected)?;
        if !selection.has_direct_flight() {
            return Err(SimError::NoDirectFlight {
                origin: selection.origin.iata_code.clone(),
                destination: selection.destination.iata_code.clone(),
            });
        }

        selection.controller.start();
        let message = format!(
            "Simulation started {} -> {}",
            selection.origin.iata_code, selection.destination.iata_code
        );
        self.log(Level::Info, &message)
    }

    pub fn cancel(&mut self) -> Result<(), SimError> {
        let Some(selection) = self.selection.as_mut() else {
            return Ok(());
        };
        if !selection.controller.is_running() {
            return Ok(());
        }

        selection.controller.cancel();
        let message = format!("Simulation cancelled after {} ticks", selection.controller.ticks());
        self.log(Level::Info, &message)
    }

    /// Runs one controller tick and draws it. When the destination is reached
    /// the renderer is also notified of the arrival.
    pub fn tick<R: Renderer + ?Sized>(&mut self, renderer: &mut R) -> Result<TickOutcome, SimError> {
        let camera = self.camera()?;
        let selection = self.selection.as_mut().ok_or(SimError::NoRouteSelected)?;

        let outcome = selection.controller.tick();
        renderer.render(&Frame::new(camera, outcome.position(), &selection.layers))?;

        match outcome {
            TickOutcome::Advanced(position) => {
                let message = format!("Tick {}: {}", selection.controller.ticks(), position);
                self.log(Level::Debug, &message)?;
            }
            TickOutcome::Arrived { .. } => {
                renderer.arrived(&selection.destination)?;
                let message = format!(
                    "Reached {} after {} ticks",
                    selection.destination.iata_code,
                    selection.controller.ticks()
                );
                self.log(Level::Info, &message)?;
            }
            TickOutcome::Static(_) => {}
        }

        Ok(outcome)
    }

    /// Ticks until the run ends, returning the number of ticks taken.
    ///
    /// Without a running simulation this draws the origin once and returns 0.
    pub fn run_to_arrival<R: Renderer + ?Sized>(&mut self, renderer: &mut R) -> Result<usize, SimError> {
        let max_ticks = self
            .selection
            .as_ref()
            .ok_or(SimError::NoRouteSelected)?
            .controller
            .max_ticks();

        let mut ticks = 0;
        loop {
            match self.tick(renderer)? {
                TickOutcome::Static(_) => return Ok(ticks),
                TickOutcome::Arrived { .. } => return Ok(ticks + 1),
                TickOutcome::Advanced(_) => ticks += 1,
            }
            if ticks > max_ticks {
                self.cancel()?;
                return Err(SimError::Other(format!(
                    "run did not arrive within {} ticks",
                    max_ticks
                )));
            }
        }
    }

    fn log(&self, level: Level, message: &str) -> Result<(), SimError> {
        let Some(logger) = &self.logger else {
            return Ok(());
        };
        match level {
            Level::Debug => logger.debug(message)?,
            Level::Info => logger.info(message)?,
            Level::Warn => logger.warn(message)?,
            Level::Error => logger.error(message)?,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::geo_point::GeoPoint;

    fn airport(code: &str, latitude: f64, longitude: f64) -> Airport {
        Airport::new(
            code.to_string(),
            "Region".to_string(),
            format!("City {}", code),
            GeoPoint::new(latitude, longitude).unwrap(),
        )
    }

    fn simulation(config: TrajectoryConfig) -> Simulation {
        let airports = AirportTable::from_airports(vec![
            airport("AAA", 0.0, 0.0),
            airport("BBB", 0.0, 0.0001),
            airport("CCC", 1.0, 1.0),
        ]);
        let mut routes = RouteTable::default();
        routes.insert("AAA", "BBB", FlightDuration::from_minutes(45.0).unwrap());
        Simulation::new(airports, routes, config, ViewSettings::default(), None)
    }

    #[derive(Default)]
    struct Recorder {
        positions: Vec<GeoPoint>,
        arrivals: Vec<String>,
    }

    impl Renderer for Recorder {
        fn render(&mut self, frame: &Frame<'_>) -> Result<(), SimError> {
            self.positions.push(frame.position);
            Ok(())
        }

        fn arrived(&mut self, destination: &Airport) -> Result<(), SimError> {
            self.arrivals.push(destination.iata_code.clone());
            Ok(())
        }
    }

    #[test]
    fn test_select_computes_route_summary() {
        let mut sim = simulation(TrajectoryConfig::default());
        let selection = sim.select("AAA", "BBB").unwrap();
        assert!(selection.has_direct_flight());
        assert_eq!(selection.distance, Distance { km: 0, miles: 0 });
        assert_eq!(selection.layers.arcs[0].name, "Region, City AAA (AAA)");
    }

    #[test]
    fn test_same_airport_is_rejected() {
        let mut sim = simulation(TrajectoryConfig::default());
        assert!(matches!(
            sim.select("AAA", "aaa"),
            Err(SimError::SameAirport(_))
        ));
        assert!(sim.selection().is_none());
    }

    #[test]
    fn test_start_requires_direct_flight() {
        let mut sim = simulation(TrajectoryConfig::default());
        assert!(matches!(sim.start(), Err(SimError::NoRouteSelected)));

        sim.select("BBB", "AAA").unwrap();
        assert!(matches!(sim.start(), Err(SimError::NoDirectFlight { .. })));

        let mut recorder = Recorder::default();
        assert_eq!(sim.run_to_arrival(&mut recorder).unwrap(), 0);
        assert_eq!(recorder.positions, vec![GeoPoint::new(0.0, 0.0001).unwrap()]);
    }

    #[test]
    fn test_run_notifies_arrival_once() {
        let mut sim = simulation(TrajectoryConfig::with_steps_per_tick(1).unwrap());
        sim.select("AAA", "BBB").unwrap();
        sim.start().unwrap();

        let mut recorder = Recorder::default();
        let ticks = sim.run_to_arrival(&mut recorder).unwrap();

        assert_eq!(ticks, 10);
        assert_eq!(recorder.positions.len(), 10);
        assert_eq!(recorder.arrivals, vec!["BBB".to_string()]);
        assert_eq!(sim.phase(), Some(Phase::Arrived));
        assert!(!sim.is_running());
    }

    #[test]
    fn test_run_after_arrival_only_counts_its_own_ticks() {
        let mut sim = simulation(TrajectoryConfig::with_steps_per_tick(1).unwrap());
        sim.select("AAA", "BBB").unwrap();
        sim.start().unwrap();

        let mut recorder = Recorder::default();
        assert_eq!(sim.run_to_arrival(&mut recorder).unwrap(), 10);

        let mut idle = Recorder::default();
        assert_eq!(sim.run_to_arrival(&mut idle).unwrap(), 0);
        assert_eq!(idle.positions, vec![GeoPoint::new(0.0, 0.0).unwrap()]);
        assert!(idle.arrivals.is_empty());

        sim.start().unwrap();
        assert_eq!(sim.run_to_arrival(&mut recorder).unwrap(), 10);
        assert_eq!(recorder.arrivals.len(), 2);
    }

    #[test]
    fn test_view_changes_reach_the_camera() {
        let mut sim = simulation(TrajectoryConfig::default());
        sim.select("AAA", "CCC").unwrap();
        sim.set_pitch(45).unwrap();
        sim.set_bearing(180).unwrap();

        let camera = sim.camera().unwrap();
        assert_eq!(camera.pitch, 45);
        assert_eq!(camera.bearing, 180);
        assert_eq!(camera.zoom, 5);
        assert!(sim.set_pitch(61).is_err());
    }

    #[test]
    fn test_random_route_uses_direct_routes() {
        let mut sim = simulation(TrajectoryConfig::default());
        assert_eq!(
            sim.direct_routes(),
            vec![("AAA".to_string(), "BBB".to_string())]
        );

        let selection = sim.select_random(&mut rand::thread_rng()).unwrap();
        assert_eq!(selection.origin.iata_code, "AAA");
        assert_eq!(selection.destination.iata_code, "BBB");
    }

    #[test]
    fn test_cancel_stops_a_run() {
        let mut sim = simulation(TrajectoryConfig::with_steps_per_tick(1).unwrap());
        sim.select("AAA", "BBB").unwrap();
        sim.start().unwrap();

        let mut recorder = Recorder::default();
        sim.tick(&mut recorder).unwrap();
        sim.cancel().unwrap();

        assert!(!sim.is_running());
        assert_eq!(
            sim.tick(&mut recorder).unwrap(),
            TickOutcome::Static(GeoPoint::new(0.0, 0.0).unwrap())
        );
        assert!(recorder.arrivals.is_empty());
    }
}
