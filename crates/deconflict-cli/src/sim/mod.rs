//! Simulation module for demo missions.
//!
//! Provides flight paths and scenarios that are sampled into time-indexed
//! trajectories for the deconfliction core.

mod paths;
mod scenarios;

pub use paths::{sample, CircularPath, FlightPath, LinearPath};
pub use scenarios::{
    create_converging_scenario, create_crossing_scenario, create_parallel_scenario, Scenario,
};
