//! Tick-driven movement of the simulated aircraft from origin to destination.

use crate::stepper::{CoordinateStepper, Direction, DEFAULT_STEPS_PER_TICK};
use crate::types::geo_point::GeoPoint;
use crate::types::sim_error::SimError;

/// Phase of the controller's state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Advancing,
    Arrived,
}

/// Positions tracked for one origin/destination pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationState {
    pub current: GeoPoint,
    pub target: GeoPoint,
    pub origin_reset: GeoPoint,
    pub running: bool,
}

/// What a single tick produced, to be handed to the renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// Not running; the position is drawn without moving.
    Static(GeoPoint),
    /// Still on the way.
    Advanced(GeoPoint),
    /// Destination reached on this tick. The controller has already moved
    /// back to `reset_to`.
    Arrived { position: GeoPoint, reset_to: GeoPoint },
}

impl TickOutcome {
    /// Position to draw for this tick.
    pub fn position(&self) -> GeoPoint {
        match *self {
            TickOutcome::Static(position)
            | TickOutcome::Advanced(position)
            | TickOutcome::Arrived { position, .. } => position,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrajectoryConfig {
    pub stepper: CoordinateStepper,
    pub steps_per_tick: usize,
}

impl Default for TrajectoryConfig {
    fn default() -> Self {
        TrajectoryConfig {
            stepper: CoordinateStepper::default(),
            steps_per_tick: DEFAULT_STEPS_PER_TICK,
        }
    }
}

impl TrajectoryConfig {
    pub fn with_steps_per_tick(steps_per_tick: usize) -> Result<Self, SimError> {
        if steps_per_tick == 0 {
            return Err(SimError::InvalidInput);
        }
        Ok(TrajectoryConfig {
            steps_per_tick,
            ..Default::default()
        })
    }
}

/// Advances a position towards the destination one tick at a time.
///
/// Each axis moves independently by at most `steps_per_tick` steps per tick.
/// A tick whose bounded range reaches or passes the destination value snaps
/// that axis to the exact destination value, so the last emitted position is
/// the destination itself.
#[derive(Debug, Clone)]
pub struct TrajectoryController {
    config: TrajectoryConfig,
    phase: Phase,
    state: SimulationState,
    ticks: usize,
}

impl TrajectoryController {
    /// Creates an idle controller parked at `origin`.
    pub fn new(
        origin: GeoPoint,
        destination: GeoPoint,
        config: TrajectoryConfig,
    ) -> Result<Self, SimError> {
        origin.validate()?;
        destination.validate()?;
        if config.steps_per_tick == 0 {
            return Err(SimError::InvalidInput);
        }
        if origin == destination {
            return Err(SimError::SameAirport(origin.to_string()));
        }

        Ok(TrajectoryController {
            config,
            phase: Phase::Idle,
            state: SimulationState {
                current: origin,
                target: destination,
                origin_reset: origin,
                running: false,
            },
            ticks: 0,
        })
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn current(&self) -> GeoPoint {
        self.state.current
    }

    pub fn is_running(&self) -> bool {
        self.state.running
    }

    /// Ticks taken by the current (or last) run.
    pub fn ticks(&self) -> usize {
        self.ticks
    }

    /// Upper bound on the ticks a run needs to arrive.
    pub fn max_ticks(&self) -> usize {
        let per_tick = self.config.stepper.step_unit() * self.config.steps_per_tick as f64;
        let origin = self.state.origin_reset;
        let target = self.state.target;
        let gap = (origin.latitude - target.latitude)
            .abs()
            .max((origin.longitude - target.longitude).abs());
        (gap / per_tick).ceil() as usize + 1
    }

    /// Begins a run from the origin.
    pub fn start(&mut self) {
        self.state.current = self.state.origin_reset;
        self.state.running = true;
        self.phase = Phase::Advancing;
        self.ticks = 0;
    }

    /// Stops a run and moves back to the origin.
    pub fn cancel(&mut self) {
        self.state.current = self.state.origin_reset;
        self.state.running = false;
        self.phase = Phase::Idle;
    }

    /// Runs one tick of the state machine.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.state.running {
            return TickOutcome::Static(self.state.current);
        }

        self.ticks += 1;
        let target = self.state.target;
        let current = self.state.current;
        let next = GeoPoint {
            latitude: self.advance_axis(current.latitude, target.latitude),
            longitude: self.advance_axis(current.longitude, target.longitude),
        };

        if next == target {
            self.state.current = self.state.origin_reset;
            self.state.running = false;
            self.phase = Phase::Arrived;
            return TickOutcome::Arrived {
                position: next,
                reset_to: self.state.origin_reset,
            };
        }

        self.state.current = next;
        TickOutcome::Advanced(next)
    }

    fn advance_axis(&self, current: f64, target: f64) -> f64 {
        let Some(direction) = Direction::towards(current, target) else {
            return current;
        };

        let stepper = &self.config.stepper;
        let first = stepper.next_step(current, direction);
        let mut last = current;
        for value in stepper.step_range(first, direction, self.config.steps_per_tick) {
            let reached = match direction {
                Direction::Increasing => value >= target,
                Direction::Decreasing => value <= target,
            };
            if reached {
                return target;
            }
            last = value;
        }
        last
    }
}
