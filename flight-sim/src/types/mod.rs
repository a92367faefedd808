pub(crate) const TICK_FREQUENCY_MILLIS: u64 = 200;

pub mod airport;

pub mod geo_point;

pub mod route;

pub mod sim_error;

pub mod timer;

pub mod simulation;
