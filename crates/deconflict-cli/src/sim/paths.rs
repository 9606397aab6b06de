//! Flight path implementations.

use deconflict_core::{euclidean_distance, Position, Trajectory};
use std::f64::consts::PI;

/// Trait for flight path implementations.
pub trait FlightPath: Send + Sync {
    /// Position at `t` time steps from start.
    fn position(&self, t: f64) -> Position;

    /// Steps until the path ends, or `None` if it never does.
    fn duration(&self) -> Option<f64> {
        None
    }
}

/// Sample a path at integer steps `0..steps` into an index-time trajectory.
pub fn sample(path: &dyn FlightPath, steps: usize) -> Trajectory {
    Trajectory::from_positions((0..steps).map(|t| path.position(t as f64)))
}

/// Circular flight path around a center point, at constant altitude.
pub struct CircularPath {
    pub center: Position,
    pub radius: f64,
    /// Distance covered per time step
    pub speed: f64,
    pub start_angle: f64,
    pub clockwise: bool,
    period: f64,
}

impl CircularPath {
    /// Create a new circular flight path.
    ///
    /// # Arguments
    /// * `center` - Center point; its `z` is the flight altitude
    /// * `radius` - Radius in simulation units
    /// * `speed` - Units per time step
    /// * `start_angle` - Starting angle in radians
    /// * `clockwise` - Direction of flight
    pub fn new(
        center: Position,
        radius: f64,
        speed: f64,
        start_angle: f64,
        clockwise: bool,
    ) -> Self {
        let circumference = 2.0 * PI * radius;
        let period = if speed > 0.0 {
            circumference / speed
        } else {
            f64::INFINITY
        };

        Self {
            center,
            radius,
            speed,
            start_angle,
            clockwise,
            period,
        }
    }

    pub fn period(&self) -> f64 {
        self.period
    }
}

impl FlightPath for CircularPath {
    fn position(&self, t: f64) -> Position {
        let mut angle = self.start_angle + (2.0 * PI * t / self.period);
        if self.clockwise {
            angle = -angle;
        }

        Position::new(
            self.center.x + self.radius * angle.cos(),
            self.center.y + self.radius * angle.sin(),
            self.center.z,
        )
    }
}

/// Linear flight path between two points.
pub struct LinearPath {
    pub start: Position,
    pub end: Position,
    pub speed: f64,
    pub distance: f64,
    duration: f64,
}

impl LinearPath {
    /// Create a new linear flight path flown at `speed` units per step.
    pub fn new(start: Position, end: Position, speed: f64) -> Self {
        let distance = euclidean_distance(&start, &end);
        let duration = if speed > 0.0 { distance / speed } else { 0.0 };

        Self {
            start,
            end,
            speed,
            distance,
            duration,
        }
    }
}

impl FlightPath for LinearPath {
    fn position(&self, t: f64) -> Position {
        // Clamp progress to [0, 1]
        let progress = if self.duration > 0.0 {
            (t / self.duration).clamp(0.0, 1.0)
        } else {
            0.0
        };

        Position::new(
            self.start.x + progress * (self.end.x - self.start.x),
            self.start.y + progress * (self.end.y - self.start.y),
            self.start.z + progress * (self.end.z - self.start.z),
        )
    }

    fn duration(&self) -> Option<f64> {
        Some(self.duration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_path_start_position() {
        let path = LinearPath::new(
            Position::new(0.0, 0.0, 50.0),
            Position::new(100.0, 0.0, 50.0),
            5.0,
        );
        assert_eq!(path.position(0.0), Position::new(0.0, 0.0, 50.0));
        assert_eq!(path.duration(), Some(20.0));
    }

    #[test]
    fn test_linear_path_end_position() {
        let path = LinearPath::new(
            Position::new(0.0, 0.0, 50.0),
            Position::new(100.0, 0.0, 60.0),
            5.0,
        );
        let end = path.position(1_000.0); // Past end

        assert!((end.x - 100.0).abs() < 1e-9);
        assert!((end.z - 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_circular_path() {
        let path = CircularPath::new(Position::new(50.0, 50.0, 30.0), 10.0, 2.0, 0.0, false);

        // Should return to approximately start after one period
        let a = path.position(0.0);
        let b = path.position(path.period());

        assert!(euclidean_distance(&a, &b) < 1e-6);
        assert!((a.x - 60.0).abs() < 1e-9);
        assert_eq!(path.duration(), None);
    }

    #[test]
    fn test_sample_uses_integer_steps() {
        let path =
            LinearPath::new(Position::new(0.0, 0.0, 0.0), Position::new(10.0, 0.0, 0.0), 5.0);
        let trajectory = sample(&path, 4);

        let xs: Vec<f64> = trajectory.iter().map(|wp| wp.position.x).collect();
        assert_eq!(xs, vec![0.0, 5.0, 10.0, 10.0]);
        assert_eq!(trajectory.get(3).map(|wp| wp.time), Some(3.0));
    }
}
