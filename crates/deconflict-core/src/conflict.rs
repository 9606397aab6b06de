//! Conflict detection module.
//!
//! Compares the primary trajectory against every fleet trajectory at
//! matching times and reports each pair closer than the safety threshold.

use crate::error::Result;
use crate::models::{validate_all, Fleet, Position, Trajectory, Waypoint};
use crate::rules::{DeconflictConfig, TimeMode};
use crate::spatial::euclidean_distance;
use serde::{Deserialize, Serialize};

/// Detected loss of separation between the primary and another vehicle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conflict {
    /// Index of the primary waypoint involved
    pub time_index: usize,
    pub time: f64,
    /// Primary position at the conflict
    pub position: Position,
    pub vehicle_id: String,
    pub distance: f64,
}

/// Stateless detector bound to one set of separation rules.
#[derive(Debug, Clone, Default)]
pub struct ConflictDetector {
    config: DeconflictConfig,
}

impl ConflictDetector {
    pub fn new(config: DeconflictConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DeconflictConfig {
        &self.config
    }

    /// Check the primary trajectory against every fleet trajectory.
    ///
    /// Conflicts come out ordered by primary index, then fleet order, then
    /// the other trajectory's own sequence order. Fails on the first
    /// non-finite waypoint instead of letting NaN hide a conflict.
    pub fn detect(&self, primary: &Trajectory, fleet: &Fleet) -> Result<Vec<Conflict>> {
        self.config.validate()?;
        validate_all(primary, fleet)?;
        let conflicts = self.scan(primary, fleet);
        tracing::debug!(
            "Detected {} conflict(s) across {} vehicle(s)",
            conflicts.len(),
            fleet.len()
        );
        Ok(conflicts)
    }

    /// Detection over input that has already been validated.
    pub(crate) fn scan(&self, primary: &Trajectory, fleet: &Fleet) -> Vec<Conflict> {
        let mut conflicts = Vec::new();
        for (time_index, p_point) in primary.iter().enumerate() {
            for (vehicle_id, path) in fleet {
                for d_point in counterparts(self.config.time_mode, time_index, p_point.time, path) {
                    let distance = euclidean_distance(&p_point.position, &d_point.position);
                    if self.config.violates(distance) {
                        conflicts.push(Conflict {
                            time_index,
                            time: p_point.time,
                            position: p_point.position,
                            vehicle_id: vehicle_id.clone(),
                            distance,
                        });
                    }
                }
            }
        }
        conflicts
    }

    /// Whether `candidate` at `index`/`time` breaks separation with any
    /// matching waypoint of `other`.
    pub(crate) fn conflicts_with(
        &self,
        index: usize,
        candidate: &Waypoint,
        other: &Trajectory,
    ) -> bool {
        counterparts(self.config.time_mode, index, candidate.time, other).any(|wp| {
            self.config
                .violates(euclidean_distance(&candidate.position, &wp.position))
        })
    }
}

/// Run detection with the given rules.
pub fn detect_conflicts(
    primary: &Trajectory,
    fleet: &Fleet,
    config: &DeconflictConfig,
) -> Result<Vec<Conflict>> {
    ConflictDetector::new(config.clone()).detect(primary, fleet)
}

/// Waypoints of `other` that share a time with the waypoint at `index`.
fn counterparts<'a>(
    mode: TimeMode,
    index: usize,
    time: f64,
    other: &'a Trajectory,
) -> impl Iterator<Item = &'a Waypoint> + 'a {
    let candidates = match mode {
        TimeMode::Index => other.waypoints().get(index..=index).unwrap_or(&[]),
        TimeMode::Stamped => other.waypoints(),
    };
    candidates
        .iter()
        .filter(move |wp| mode == TimeMode::Index || wp.time == time)
}
