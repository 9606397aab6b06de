//! Mission session: the current primary/fleet snapshot and its conflicts.

use crate::conflict::{Conflict, ConflictDetector};
use crate::error::Result;
use crate::models::{Fleet, Trajectory};
use crate::report::{max_frames, visible_conflicts};
use crate::reroute::{RerouteOutcome, Rerouter};
use crate::rules::DeconflictConfig;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Overall verdict for the loaded mission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissionStatus {
    ClearToFly,
    ConflictDetected,
}

impl fmt::Display for MissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissionStatus::ClearToFly => write!(f, "Clear to Fly"),
            MissionStatus::ConflictDetected => write!(f, "Conflict Detected"),
        }
    }
}

/// Holds the latest mission snapshot.
///
/// Conflicts are recomputed from scratch whenever the snapshot changes; a
/// reroute replaces the fleet wholesale.
#[derive(Debug, Clone)]
pub struct Deconflictor {
    detector: ConflictDetector,
    primary: Trajectory,
    fleet: Fleet,
    conflicts: Vec<Conflict>,
}

impl Deconflictor {
    pub fn new(config: DeconflictConfig, primary: Trajectory, fleet: Fleet) -> Result<Self> {
        let detector = ConflictDetector::new(config);
        let conflicts = detector.detect(&primary, &fleet)?;
        Ok(Self {
            detector,
            primary,
            fleet,
            conflicts,
        })
    }

    /// Replace the mission snapshot, e.g. after loading another test case.
    ///
    /// On error the previous snapshot is kept.
    pub fn reload(&mut self, primary: Trajectory, fleet: Fleet) -> Result<()> {
        let conflicts = self.detector.detect(&primary, &fleet)?;
        self.primary = primary;
        self.fleet = fleet;
        self.conflicts = conflicts;
        tracing::info!(
            "Loaded mission. Total time steps: {}",
            self.max_frames()
        );
        Ok(())
    }

    /// Reroute the fleet, adopt the result and re-run detection on it.
    pub fn reroute<R: Rng>(&mut self, rng: &mut R) -> Result<RerouteOutcome> {
        let rerouter = Rerouter::new(self.detector.config().clone());
        let outcome = rerouter.reroute(&self.primary, &self.fleet, rng)?;
        self.conflicts = self.detector.detect(&self.primary, &outcome.fleet)?;
        self.fleet = outcome.fleet.clone();
        Ok(outcome)
    }

    pub fn config(&self) -> &DeconflictConfig {
        self.detector.config()
    }

    pub fn primary(&self) -> &Trajectory {
        &self.primary
    }

    pub fn fleet(&self) -> &Fleet {
        &self.fleet
    }

    pub fn conflicts(&self) -> &[Conflict] {
        &self.conflicts
    }

    pub fn status(&self) -> MissionStatus {
        if self.conflicts.is_empty() {
            MissionStatus::ClearToFly
        } else {
            MissionStatus::ConflictDetected
        }
    }

    pub fn max_frames(&self) -> usize {
        max_frames(&self.primary, &self.fleet)
    }

    pub fn conflicts_until(&self, frame: usize) -> impl Iterator<Item = &Conflict> {
        visible_conflicts(&self.conflicts, frame)
    }
}
