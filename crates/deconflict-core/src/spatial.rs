//! Spatial helpers for the local Cartesian frame.

use crate::models::Position;

/// Euclidean distance between two positions.
///
/// Chained `hypot` avoids overflow and keeps precision for large coordinates.
pub fn euclidean_distance(a: &Position, b: &Position) -> f64 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    let dz = a.z - b.z;
    dx.hypot(dy).hypot(dz)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_known_triangle() {
        let a = Position::new(0.0, 0.0, 0.0);
        let b = Position::new(3.0, 4.0, 12.0);
        assert!((euclidean_distance(&a, &b) - 13.0).abs() < 1e-12);
    }

    #[test]
    fn test_distance_is_symmetric() {
        let samples = [
            Position::new(1.5, -2.0, 7.25),
            Position::new(-40.0, 0.0, 3.0),
            Position::new(9_999.0, -9_999.0, 10_000.0),
            Position::new(0.0, 0.0, 0.0),
        ];
        for a in &samples {
            for b in &samples {
                assert_eq!(euclidean_distance(a, b), euclidean_distance(b, a));
            }
        }
    }

    #[test]
    fn test_distance_stable_at_large_magnitudes() {
        let a = Position::new(10_000.0, 10_000.0, 10_000.0);
        let b = Position::new(10_003.0, 10_004.0, 10_000.0);
        assert!((euclidean_distance(&a, &b) - 5.0).abs() < 1e-9);
    }
}
