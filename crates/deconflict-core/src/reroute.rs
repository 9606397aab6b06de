//! Randomized local-search rerouting.
//!
//! Each fleet trajectory is revised waypoint by waypoint: a waypoint that
//! breaks separation with any other vehicle at the same time, or repeats a
//! coordinate already used earlier in its own path, is nudged by one step
//! until it is clear or its attempt budget runs out. A round revises every
//! vehicle in ascending identifier order, so later vehicles are checked
//! against the already revised paths of earlier ones. Rounds always restart
//! from the original paths and stop at the first conflict-free result.

use crate::conflict::{Conflict, ConflictDetector};
use crate::error::Result;
use crate::models::{validate_all, Fleet, Position, Trajectory, Waypoint};
use crate::rules::DeconflictConfig;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A waypoint left in place after its perturbation budget ran out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnresolvedWaypoint {
    pub vehicle_id: String,
    pub time_index: usize,
    /// Best-effort position kept for this waypoint
    pub position: Position,
}

/// Result of a reroute run.
///
/// `resolved == false` is a normal outcome: `fleet` then holds the last
/// round's best effort and `remaining` the conflicts it still has.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RerouteOutcome {
    pub fleet: Fleet,
    pub resolved: bool,
    pub remaining: Vec<Conflict>,
    /// Rounds actually run
    pub rounds: u32,
    /// Waypoints that exhausted their budget in the returned round.
    ///
    /// May be non-empty even when `resolved` is true: a waypoint can still be
    /// too close to another fleet vehicle, or repeat an earlier coordinate of
    /// its own path, while being clear of the primary.
    pub unresolved_waypoints: Vec<UnresolvedWaypoint>,
}

/// Fleet rerouter bound to one set of rules and search bounds.
#[derive(Debug, Clone, Default)]
pub struct Rerouter {
    detector: ConflictDetector,
}

impl Rerouter {
    pub fn new(config: DeconflictConfig) -> Self {
        Self {
            detector: ConflictDetector::new(config),
        }
    }

    pub fn config(&self) -> &DeconflictConfig {
        self.detector.config()
    }

    /// Search for fleet paths with no conflict against `primary`.
    ///
    /// Neither input is modified. All sign choices are drawn from `rng`, so a
    /// seeded generator gives identical results for identical input.
    pub fn reroute<R: Rng>(
        &self,
        primary: &Trajectory,
        fleet: &Fleet,
        rng: &mut R,
    ) -> Result<RerouteOutcome> {
        let config = self.config();
        config.validate()?;
        validate_all(primary, fleet)?;

        if config.max_retries == 0 {
            let remaining = self.detector.scan(primary, fleet);
            return Ok(RerouteOutcome {
                fleet: fleet.clone(),
                resolved: remaining.is_empty(),
                remaining,
                rounds: 0,
                unresolved_waypoints: Vec::new(),
            });
        }

        let mut round = 0;
        loop {
            round += 1;
            tracing::info!(
                "Attempt {} of {} to generate conflict-free paths",
                round,
                config.max_retries
            );

            let (revised, unresolved_waypoints) = self.revise_fleet(primary, fleet, rng);
            let remaining = self.detector.scan(primary, &revised);
            let resolved = remaining.is_empty();

            if resolved {
                tracing::info!("Conflict-free paths generated after {} round(s)", round);
            } else {
                tracing::warn!(
                    "{} conflict(s) still exist after attempt {}",
                    remaining.len(),
                    round
                );
            }

            if resolved || round >= config.max_retries {
                if !resolved {
                    tracing::warn!(
                        "Could not generate conflict-free paths after {} attempt(s)",
                        round
                    );
                }
                return Ok(RerouteOutcome {
                    fleet: revised,
                    resolved,
                    remaining,
                    rounds: round,
                    unresolved_waypoints,
                });
            }
        }
    }

    /// One round: revise every vehicle, in order, starting from `original`.
    fn revise_fleet<R: Rng>(
        &self,
        primary: &Trajectory,
        original: &Fleet,
        rng: &mut R,
    ) -> (Fleet, Vec<UnresolvedWaypoint>) {
        let mut current = original.clone();
        let mut unresolved = Vec::new();

        for (vehicle_id, path) in original {
            let revised =
                self.revise_path(vehicle_id, path, primary, &current, rng, &mut unresolved);
            current.insert(vehicle_id.clone(), revised);
        }

        (current, unresolved)
    }

    fn revise_path<R: Rng>(
        &self,
        vehicle_id: &str,
        path: &Trajectory,
        primary: &Trajectory,
        current: &Fleet,
        rng: &mut R,
        unresolved: &mut Vec<UnresolvedWaypoint>,
    ) -> Trajectory {
        let config = self.config();
        let mut used = HashSet::with_capacity(path.len());
        let mut revised = Vec::with_capacity(path.len());

        for (index, waypoint) in path.iter().enumerate() {
            let mut candidate = *waypoint;
            let mut attempts = 0;

            while self.is_blocked(vehicle_id, index, &candidate, primary, current)
                || used.contains(&candidate.position.key())
            {
                if attempts >= config.max_attempts {
                    tracing::warn!("Conflict not resolved at t={} for {}", index, vehicle_id);
                    unresolved.push(UnresolvedWaypoint {
                        vehicle_id: vehicle_id.to_string(),
                        time_index: index,
                        position: candidate.position,
                    });
                    break;
                }
                candidate.position = perturb(candidate.position, attempts, config.step, rng);
                attempts += 1;
            }

            used.insert(candidate.position.key());
            revised.push(candidate);
        }

        Trajectory::new(revised)
    }

    /// Whether `candidate` breaks separation with the primary or with any
    /// other vehicle's current path.
    fn is_blocked(
        &self,
        vehicle_id: &str,
        index: usize,
        candidate: &Waypoint,
        primary: &Trajectory,
        current: &Fleet,
    ) -> bool {
        self.detector.conflicts_with(index, candidate, primary)
            || current
                .iter()
                .filter(|(id, _)| id.as_str() != vehicle_id)
                .any(|(_, other)| self.detector.conflicts_with(index, candidate, other))
    }
}

/// Reroute with a generator seeded from `config.seed`.
pub fn reroute_fleet(
    primary: &Trajectory,
    fleet: &Fleet,
    config: &DeconflictConfig,
) -> Result<RerouteOutcome> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    Rerouter::new(config.clone()).reroute(primary, fleet, &mut rng)
}

/// Move `position` by one step: z on every attempt, plus x on attempts
/// ≡ 1 (mod 3) and y on attempts ≡ 2 (mod 3). The z sign is drawn first.
fn perturb<R: Rng>(position: Position, attempt: u32, step: f64, rng: &mut R) -> Position {
    let mut signed_step = || if rng.random_bool(0.5) { step } else { -step };
    let dz = signed_step();
    let (dx, dy) = match attempt % 3 {
        1 => (signed_step(), 0.0),
        2 => (0.0, signed_step()),
        _ => (0.0, 0.0),
    };
    position.offset(dx, dy, dz)
}
