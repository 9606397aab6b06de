//! Text formatting for conflicts and updated paths.

use crate::conflict::Conflict;
use crate::error::{DeconflictError, Result};
use crate::models::{Fleet, Trajectory};
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

/// One-line description of a conflict.
pub fn format_conflict(conflict: &Conflict) -> String {
    let p = &conflict.position;
    format!(
        "Conflict at ({:.2}, {:.2}, {:.2}) at t={} with {}",
        p.x, p.y, p.z, conflict.time_index, conflict.vehicle_id
    )
}

/// One line per waypoint: `id, x=.., y=.., z=.., t=index`.
pub fn format_updated_paths(fleet: &Fleet) -> String {
    let mut out = String::new();
    for (vehicle_id, path) in fleet {
        for (t, wp) in path.iter().enumerate() {
            let p = &wp.position;
            // Writing to a String cannot fail.
            let _ = writeln!(
                out,
                "{}, x={:.2}, y={:.2}, z={:.2}, t={}",
                vehicle_id, p.x, p.y, p.z, t
            );
        }
    }
    out
}

/// Persist the updated paths in the line format of [`format_updated_paths`].
pub fn write_updated_paths(path: impl AsRef<Path>, fleet: &Fleet) -> Result<()> {
    let path = path.as_ref();
    fs::write(path, format_updated_paths(fleet)).map_err(|source| DeconflictError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!("Updated paths saved to {}", path.display());
    Ok(())
}

/// Number of playback frames needed to show every trajectory.
pub fn max_frames(primary: &Trajectory, fleet: &Fleet) -> usize {
    fleet
        .values()
        .map(Trajectory::len)
        .fold(primary.len(), usize::max)
}

/// Conflicts already reached by playback at `frame`.
pub fn visible_conflicts(conflicts: &[Conflict], frame: usize) -> impl Iterator<Item = &Conflict> {
    conflicts.iter().filter(move |c| c.time_index <= frame)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Position;

    fn conflict(time_index: usize, vehicle_id: &str) -> Conflict {
        Conflict {
            time_index,
            time: time_index as f64,
            position: Position::new(10.0, 2.5, -1.0),
            vehicle_id: vehicle_id.to_string(),
            distance: 1.0,
        }
    }

    #[test]
    fn conflict_line_uses_two_decimals() {
        assert_eq!(
            format_conflict(&conflict(3, "DroneA")),
            "Conflict at (10.00, 2.50, -1.00) at t=3 with DroneA"
        );
    }

    #[test]
    fn updated_paths_one_line_per_waypoint() {
        let mut fleet = Fleet::new();
        fleet.insert(
            "DroneB".to_string(),
            Trajectory::from_positions([Position::new(1.0, 2.0, 3.0)]),
        );
        fleet.insert(
            "DroneA".to_string(),
            Trajectory::from_positions([
                Position::new(0.0, 0.0, 0.0),
                Position::new(1.234, 5.678, -9.1),
            ]),
        );

        let text = format_updated_paths(&fleet);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "DroneA, x=0.00, y=0.00, z=0.00, t=0",
                "DroneA, x=1.23, y=5.68, z=-9.10, t=1",
                "DroneB, x=1.00, y=2.00, z=3.00, t=0",
            ]
        );
    }

    #[test]
    fn frames_cover_longest_path() {
        let primary = Trajectory::from_positions([Position::default(); 2]);
        let mut fleet = Fleet::new();
        fleet.insert("A".to_string(), Trajectory::from_positions([Position::default(); 5]));
        assert_eq!(max_frames(&primary, &fleet), 5);
        assert_eq!(max_frames(&primary, &Fleet::new()), 2);
    }

    #[test]
    fn visible_conflicts_respect_frame() {
        let conflicts = vec![conflict(0, "A"), conflict(2, "B"), conflict(4, "A")];
        let shown: Vec<usize> = visible_conflicts(&conflicts, 2).map(|c| c.time_index).collect();
        assert_eq!(shown, vec![0, 2]);
    }
}
