//! End-to-end runs over the bundled mission data.
//!
//! Exercises loading, detection, rerouting and persistence the same way the
//! `deconflict` binary strings them together.

use deconflict_core::mission::load_test_case;
use deconflict_core::report::{format_updated_paths, write_updated_paths};
use deconflict_core::{DeconflictConfig, Deconflictor, MissionStatus};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;

fn mission_dir(case: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../mission_data")
        .join(case)
}

#[test]
fn test_case1_conflicts_then_resolves() {
    let (primary, fleet) = load_test_case(mission_dir("test_case1")).unwrap();
    let mut session = Deconflictor::new(DeconflictConfig::default(), primary, fleet).unwrap();

    let seen: Vec<(usize, String)> = session
        .conflicts()
        .iter()
        .map(|c| (c.time_index, c.vehicle_id.clone()))
        .collect();
    assert_eq!(
        seen,
        vec![(4, "DroneA".to_string()), (7, "DroneB".to_string())]
    );
    assert_eq!(session.max_frames(), 10);

    let mut rng = StdRng::seed_from_u64(session.config().seed);
    let outcome = session.reroute(&mut rng).unwrap();

    assert!(outcome.resolved);
    assert_eq!(session.status(), MissionStatus::ClearToFly);
    assert_eq!(session.fleet()["DroneA"].len(), 10);
    assert_eq!(session.fleet()["DroneB"].len(), 10);
}

#[test]
fn test_case2_is_clear_to_fly() {
    let (primary, fleet) = load_test_case(mission_dir("test_case2")).unwrap();
    let session = Deconflictor::new(DeconflictConfig::default(), primary, fleet).unwrap();

    assert_eq!(session.status(), MissionStatus::ClearToFly);
    assert_eq!(session.fleet()["DroneB"].len(), 8);
}

#[test]
fn test_updated_paths_are_persisted() {
    let (primary, fleet) = load_test_case(mission_dir("test_case2")).unwrap();
    let session = Deconflictor::new(DeconflictConfig::default(), primary, fleet).unwrap();

    let out = std::env::temp_dir().join(format!("deconflict-{}-paths.txt", std::process::id()));
    write_updated_paths(&out, session.fleet()).unwrap();
    let written = std::fs::read_to_string(&out).unwrap();
    let _ = std::fs::remove_file(&out);

    assert_eq!(written, format_updated_paths(session.fleet()));
    assert_eq!(written.lines().count(), 18);
    assert_eq!(
        written.lines().next(),
        Some("DroneA, x=0.00, y=80.00, z=50.00, t=0")
    );
}
