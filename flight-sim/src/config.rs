use std::path::PathBuf;

use clap::Parser;
use logger::Level;

use crate::camera::{ViewSettings, DEFAULT_BEARING, DEFAULT_PITCH, MAX_BEARING, MAX_PITCH};
use crate::stepper::DEFAULT_STEPS_PER_TICK;
use crate::trajectory::TrajectoryConfig;
use crate::types::sim_error::SimError;
use crate::types::TICK_FREQUENCY_MILLIS;

/// Startup options of the flight path simulator.
#[derive(Debug, Clone, Parser)]
#[command(name = "flight-sim", about = "Simulates a flight path between two airports")]
pub struct Config {
    /// CSV file with region_name, municipality, iata_code, latitude_deg and longitude_deg columns
    #[arg(long, default_value = "data/airports.csv")]
    pub airports: PathBuf,

    /// JSON object mapping origin+destination IATA codes to average minutes
    #[arg(long, default_value = "data/routes.json")]
    pub routes: PathBuf,

    /// Directory for the session log file; logging is off when omitted
    #[arg(long)]
    pub log_dir: Option<PathBuf>,

    /// Minimum level written to the log (debug, info, warn, error)
    #[arg(long, default_value = "info", value_parser = parse_level)]
    pub log_level: Level,

    /// Also print log lines to the console, colored by level
    #[arg(long)]
    pub log_console: bool,

    /// Milliseconds between ticks of a running simulation
    #[arg(long, default_value_t = TICK_FREQUENCY_MILLIS, value_parser = clap::value_parser!(u64).range(1..=10000))]
    pub tick_millis: u64,

    /// Coordinate steps taken per tick on each axis
    #[arg(long, default_value_t = DEFAULT_STEPS_PER_TICK)]
    pub steps_per_tick: usize,

    /// Initial map pitch in degrees
    #[arg(long, default_value_t = DEFAULT_PITCH, value_parser = clap::value_parser!(u8).range(0..=MAX_PITCH as i64))]
    pub pitch: u8,

    /// Initial map bearing in degrees
    #[arg(long, default_value_t = DEFAULT_BEARING, value_parser = clap::value_parser!(u16).range(0..=MAX_BEARING as i64))]
    pub bearing: u16,
}

fn parse_level(name: &str) -> Result<Level, String> {
    Level::from_name(name).ok_or_else(|| format!("unknown log level '{}'", name))
}

impl Config {
    pub fn trajectory(&self) -> Result<TrajectoryConfig, SimError> {
        TrajectoryConfig::with_steps_per_tick(self.steps_per_tick)
    }

    pub fn view(&self) -> Result<ViewSettings, SimError> {
        ViewSettings::new(self.pitch, self.bearing)
    }
}
