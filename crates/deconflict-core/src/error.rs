//! Error types for deconfliction.

use crate::models::Field;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading, detecting or rerouting.
///
/// Failing to find a conflict-free reroute is not an error; see
/// [`crate::reroute::RerouteOutcome`].
#[derive(Debug, Error)]
pub enum DeconflictError {
    /// A waypoint carries a non-finite value.
    #[error("invalid waypoint for {vehicle_id} at t={index}: {field} is not finite")]
    InvalidWaypoint {
        vehicle_id: String,
        index: usize,
        field: Field,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Fleet documents must name each vehicle once.
    #[error("duplicate vehicle id {0}")]
    DuplicateVehicle(String),

    #[error("vehicle #{0} in fleet document has no id")]
    UnnamedVehicle(usize),

    /// Mission data did not match any accepted shape.
    #[error("malformed mission data: {0}")]
    Mission(#[from] serde_json::Error),
}

impl DeconflictError {
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig(reason.into())
    }
}

pub type Result<T> = std::result::Result<T, DeconflictError>;
