//! Deconfliction CLI - command line front end for the deconfliction core.
//!
//! This crate provides:
//! - config: environment defaults for the run
//! - sim: sampled flight paths and built-in demo scenarios
//! - the `deconflict` binary

pub mod config;
pub mod sim;

pub use config::Config;
