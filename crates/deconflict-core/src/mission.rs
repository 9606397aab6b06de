//! Mission loading.
//!
//! Accepted shapes:
//! - a plain array of `{ "x", "y", "z" }` records, optionally with `"time"`
//!   (a missing time becomes the record's index);
//! - a vehicle document `{ "id", "waypoints": [{ "pos": [x, y, z], "time" }] }`,
//!   either alone or as an array of such documents.

use crate::error::{DeconflictError, Result};
use crate::models::{Fleet, Trajectory, Waypoint};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// File names of a test-case directory, paired with their vehicle ids.
pub const TEST_CASE_FILES: [(&str, &str); 2] =
    [("DroneA", "droneA.json"), ("DroneB", "droneB.json")];
pub const TEST_CASE_PRIMARY: &str = "primary_mission.json";

#[derive(Debug, Deserialize)]
struct PointRecord {
    x: f64,
    y: f64,
    z: f64,
    #[serde(default)]
    time: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct StampedRecord {
    pos: [f64; 3],
    time: f64,
}

#[derive(Debug, Deserialize)]
struct VehicleDocument {
    #[serde(default)]
    id: Option<String>,
    waypoints: Vec<StampedRecord>,
}

impl VehicleDocument {
    fn into_trajectory(self) -> (Option<String>, Trajectory) {
        let path = self
            .waypoints
            .into_iter()
            .map(|wp| Waypoint::new(wp.pos[0], wp.pos[1], wp.pos[2], wp.time))
            .collect();
        (self.id, path)
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TrajectoryFile {
    Points(Vec<PointRecord>),
    Vehicle(VehicleDocument),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FleetFile {
    Many(Vec<VehicleDocument>),
    One(VehicleDocument),
}

/// Parse a single trajectory in either accepted shape.
pub fn parse_trajectory(json: &str) -> Result<Trajectory> {
    let path = match serde_json::from_str::<TrajectoryFile>(json)? {
        TrajectoryFile::Points(records) => records
            .into_iter()
            .enumerate()
            .map(|(index, r)| Waypoint::new(r.x, r.y, r.z, r.time.unwrap_or(index as f64)))
            .collect(),
        TrajectoryFile::Vehicle(doc) => doc.into_trajectory().1,
    };
    Ok(path)
}

/// Parse a fleet document. Every vehicle needs a unique id.
pub fn parse_fleet(json: &str) -> Result<Fleet> {
    let docs = match serde_json::from_str::<FleetFile>(json)? {
        FleetFile::Many(docs) => docs,
        FleetFile::One(doc) => vec![doc],
    };

    let mut fleet = Fleet::new();
    for (position, doc) in docs.into_iter().enumerate() {
        let (id, path) = doc.into_trajectory();
        let id = id.ok_or(DeconflictError::UnnamedVehicle(position))?;
        if fleet.contains_key(&id) {
            return Err(DeconflictError::DuplicateVehicle(id));
        }
        fleet.insert(id, path);
    }
    Ok(fleet)
}

pub fn load_trajectory(path: impl AsRef<Path>) -> Result<Trajectory> {
    parse_trajectory(&read(path.as_ref())?)
}

pub fn load_fleet(path: impl AsRef<Path>) -> Result<Fleet> {
    parse_fleet(&read(path.as_ref())?)
}

/// Load `primary_mission.json`, `droneA.json` and `droneB.json` from `dir`.
pub fn load_test_case(dir: impl AsRef<Path>) -> Result<(Trajectory, Fleet)> {
    let dir = dir.as_ref();
    let primary = load_trajectory(dir.join(TEST_CASE_PRIMARY))?;
    let mut fleet = Fleet::new();
    for (vehicle_id, file) in TEST_CASE_FILES {
        fleet.insert(vehicle_id.to_string(), load_trajectory(dir.join(file))?);
    }
    tracing::info!(
        "Loaded test case {} ({} vehicle(s))",
        dir.display(),
        fleet.len()
    );
    Ok((primary, fleet))
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| DeconflictError::Io {
        path: path.to_path_buf(),
        source,
    })
}
