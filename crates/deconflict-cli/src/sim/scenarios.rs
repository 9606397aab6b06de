//! Pre-defined missions for demos and testing.
//!
//! All scenarios live in a 100 x 100 x 100 box; the primary crosses it
//! west to east at mid altitude.

use super::paths::{sample, CircularPath, LinearPath};
use super::FlightPath;
use deconflict_core::{Fleet, Position, Trajectory};
use std::sync::Arc;

const CRUISE_ALTITUDE: f64 = 50.0;
const PRIMARY_SPEED: f64 = 5.0;

/// A named scenario: the primary path plus the surrounding traffic.
pub struct Scenario {
    pub name: String,
    pub primary: Arc<dyn FlightPath>,
    pub drones: Vec<(String, Arc<dyn FlightPath>)>,
}

impl Scenario {
    /// Frames needed for every finite path to reach its end.
    pub fn default_steps(&self) -> usize {
        let longest = std::iter::once(&self.primary)
            .chain(self.drones.iter().map(|(_, path)| path))
            .filter_map(|path| path.duration())
            .fold(0.0, f64::max);
        longest.ceil() as usize + 1
    }

    /// Sample every path into a time-indexed mission.
    pub fn sample(&self, steps: usize) -> (Trajectory, Fleet) {
        let primary = sample(self.primary.as_ref(), steps);
        let fleet = self
            .drones
            .iter()
            .map(|(id, path)| (id.clone(), sample(path.as_ref(), steps)))
            .collect();
        (primary, fleet)
    }
}

fn primary_path() -> Arc<dyn FlightPath> {
    Arc::new(LinearPath::new(
        Position::new(0.0, 50.0, CRUISE_ALTITUDE),
        Position::new(100.0, 50.0, CRUISE_ALTITUDE),
        PRIMARY_SPEED,
    ))
}

/// DroneA crosses the primary's path at the center; DroneB loiters clear.
///
/// - DroneA: South to North through the center, meeting the primary at t=10
/// - DroneB: circling in the north-east corner
pub fn create_crossing_scenario() -> Scenario {
    let drone_a: Arc<dyn FlightPath> = Arc::new(LinearPath::new(
        Position::new(50.0, 0.0, CRUISE_ALTITUDE),
        Position::new(50.0, 100.0, CRUISE_ALTITUDE),
        PRIMARY_SPEED,
    ));
    let drone_b: Arc<dyn FlightPath> = Arc::new(CircularPath::new(
        Position::new(80.0, 85.0, 70.0),
        10.0,
        3.0,
        0.0,
        true,
    ));

    Scenario {
        name: "crossing".to_string(),
        primary: primary_path(),
        drones: vec![
            ("DroneA".to_string(), drone_a),
            ("DroneB".to_string(), drone_b),
        ],
    }
}

/// Two drones flying parallel to the primary (no conflict).
pub fn create_parallel_scenario() -> Scenario {
    let separation = 20.0;

    let drones = [("DroneA", separation), ("DroneB", -separation)]
        .into_iter()
        .map(|(id, offset)| {
            let path = Arc::new(LinearPath::new(
                Position::new(0.0, 50.0 + offset, CRUISE_ALTITUDE),
                Position::new(100.0, 50.0 + offset, CRUISE_ALTITUDE),
                PRIMARY_SPEED,
            )) as Arc<dyn FlightPath>;
            (id.to_string(), path)
        })
        .collect();

    Scenario {
        name: "parallel".to_string(),
        primary: primary_path(),
        drones,
    }
}

/// Four drones converging on the center from the cardinal directions,
/// arriving together with the primary.
pub fn create_converging_scenario() -> Scenario {
    let center = Position::new(50.0, 50.0, CRUISE_ALTITUDE);
    let offset = 40.0;
    let angles: [f64; 4] = [0.0, 90.0, 180.0, 270.0];
    let speed = offset / (50.0 / PRIMARY_SPEED);

    let drones = angles
        .iter()
        .enumerate()
        .map(|(i, &angle)| {
            let angle_rad = angle.to_radians();
            let start = Position::new(
                center.x + offset * angle_rad.sin(),
                center.y + offset * angle_rad.cos(),
                CRUISE_ALTITUDE + (i as f64 - 1.5) * 2.0,
            );
            let path = Arc::new(LinearPath::new(start, center, speed)) as Arc<dyn FlightPath>;
            (format!("Drone{:03}", i + 1), path)
        })
        .collect();

    Scenario {
        name: "converging".to_string(),
        primary: primary_path(),
        drones,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deconflict_core::{detect_conflicts, DeconflictConfig};

    fn conflicts_of(scenario: &Scenario) -> usize {
        let (primary, fleet) = scenario.sample(scenario.default_steps());
        detect_conflicts(&primary, &fleet, &DeconflictConfig::default())
            .unwrap()
            .len()
    }

    #[test]
    fn test_crossing_scenario_conflicts_with_drone_a_only() {
        let scenario = create_crossing_scenario();
        assert_eq!(scenario.drones.len(), 2);
        assert_eq!(scenario.name, "crossing");
        assert_eq!(scenario.default_steps(), 21);

        let (primary, fleet) = scenario.sample(scenario.default_steps());
        let conflicts = detect_conflicts(&primary, &fleet, &DeconflictConfig::default()).unwrap();
        assert!(!conflicts.is_empty());
        assert!(conflicts.iter().all(|c| c.vehicle_id == "DroneA"));
        assert!(conflicts.iter().any(|c| c.time_index == 10));
    }

    #[test]
    fn test_parallel_scenario_is_clear() {
        let scenario = create_parallel_scenario();
        assert_eq!(scenario.drones.len(), 2);
        assert_eq!(conflicts_of(&scenario), 0);
    }

    #[test]
    fn test_converging_scenario_creates_four_drones() {
        let scenario = create_converging_scenario();
        assert_eq!(scenario.drones.len(), 4);
        assert_eq!(scenario.name, "converging");
        assert!(conflicts_of(&scenario) >= 4);
    }
}
