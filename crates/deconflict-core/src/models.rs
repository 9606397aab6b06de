//! Core data models for trajectory deconfliction.

use crate::error::{DeconflictError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Identifier used for the primary vehicle in reports and error context.
pub const PRIMARY_ID: &str = "Primary";

/// Other vehicles keyed by identifier.
///
/// Iteration is in ascending identifier order, which is both the detection
/// order and the rerouting order.
pub type Fleet = BTreeMap<String, Trajectory>;

/// A point in the shared simulation frame.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Return a copy moved by the given deltas.
    pub fn offset(self, dx: f64, dy: f64, dz: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            z: self.z + dz,
        }
    }

    /// Bitwise identity of the coordinate triple, with `-0.0` folded into `0.0`.
    pub(crate) fn key(&self) -> (u64, u64, u64) {
        (
            (self.x + 0.0).to_bits(),
            (self.y + 0.0).to_bits(),
            (self.z + 0.0).to_bits(),
        )
    }
}

/// A waypoint field, used to locate invalid input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    X,
    Y,
    Z,
    Time,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::X => write!(f, "x"),
            Field::Y => write!(f, "y"),
            Field::Z => write!(f, "z"),
            Field::Time => write!(f, "time"),
        }
    }
}

/// A position at a point in time.
///
/// Index-time missions use the waypoint's sequence index as `time`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    #[serde(flatten)]
    pub position: Position,
    pub time: f64,
}

impl Waypoint {
    pub const fn new(x: f64, y: f64, z: f64, time: f64) -> Self {
        Self {
            position: Position::new(x, y, z),
            time,
        }
    }

    /// First non-finite field, if any.
    pub fn non_finite_field(&self) -> Option<Field> {
        [
            (Field::X, self.position.x),
            (Field::Y, self.position.y),
            (Field::Z, self.position.z),
            (Field::Time, self.time),
        ]
        .into_iter()
        .find(|(_, value)| !value.is_finite())
        .map(|(field, _)| field)
    }
}

/// Ordered waypoints flown by one vehicle.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Trajectory {
    waypoints: Vec<Waypoint>,
}

impl Trajectory {
    pub fn new(waypoints: Vec<Waypoint>) -> Self {
        Self { waypoints }
    }

    /// Build an index-time trajectory: waypoint `i` gets `time = i`.
    pub fn from_positions(positions: impl IntoIterator<Item = Position>) -> Self {
        let waypoints = positions
            .into_iter()
            .enumerate()
            .map(|(index, position)| Waypoint {
                position,
                time: index as f64,
            })
            .collect();
        Self { waypoints }
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Waypoint> {
        self.waypoints.get(index)
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Waypoint> {
        self.waypoints.iter()
    }

    /// Reject any waypoint carrying NaN or infinity.
    pub fn validate(&self, vehicle_id: &str) -> Result<()> {
        for (index, waypoint) in self.waypoints.iter().enumerate() {
            if let Some(field) = waypoint.non_finite_field() {
                return Err(DeconflictError::InvalidWaypoint {
                    vehicle_id: vehicle_id.to_string(),
                    index,
                    field,
                });
            }
        }
        Ok(())
    }
}

impl FromIterator<Waypoint> for Trajectory {
    fn from_iter<I: IntoIterator<Item = Waypoint>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Trajectory {
    type Item = &'a Waypoint;
    type IntoIter = std::slice::Iter<'a, Waypoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.waypoints.iter()
    }
}

/// Validate the primary trajectory and every fleet member.
pub fn validate_all(primary: &Trajectory, fleet: &Fleet) -> Result<()> {
    primary.validate(PRIMARY_ID)?;
    for (vehicle_id, trajectory) in fleet {
        trajectory.validate(vehicle_id)?;
    }
    Ok(())
}
