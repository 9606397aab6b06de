//! Separation rules and search bounds for deconfliction.

use crate::error::{DeconflictError, Result};
use serde::{Deserialize, Serialize};

/// How waypoints of two trajectories are paired in time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeMode {
    /// Same position in the sequence
    #[default]
    Index,
    /// Exactly equal `time` fields
    Stamped,
}

/// Comparison applied between a measured distance and the threshold.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Comparison {
    /// Conflict when `distance < threshold`
    #[default]
    Strict,
    /// Conflict when `distance <= threshold`
    Inclusive,
}

impl Comparison {
    /// Whether `distance` breaks separation under this comparison.
    pub fn violates(self, distance: f64, threshold: f64) -> bool {
        match self {
            Comparison::Strict => distance < threshold,
            Comparison::Inclusive => distance <= threshold,
        }
    }
}

/// Configuration shared by the detector and the rerouter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeconflictConfig {
    /// Minimum separation between two vehicles at the same time
    pub threshold: f64,
    pub comparison: Comparison,
    pub time_mode: TimeMode,
    /// Distance moved along an axis by one perturbation
    pub step: f64,
    /// Perturbations allowed per waypoint before giving up on it
    pub max_attempts: u32,
    /// Whole-fleet reroute rounds
    pub max_retries: u32,
    pub seed: u64,
}

impl Default for DeconflictConfig {
    fn default() -> Self {
        Self {
            threshold: 5.0,
            comparison: Comparison::Strict,
            time_mode: TimeMode::Index,
            step: 1.0,
            max_attempts: 30,
            max_retries: 20,
            seed: 42,
        }
    }
}

impl DeconflictConfig {
    /// Preset for missions whose waypoints carry explicit timestamps.
    pub fn stamped_time() -> Self {
        Self {
            threshold: 10.0,
            comparison: Comparison::Inclusive,
            time_mode: TimeMode::Stamped,
            ..Self::default()
        }
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_comparison(mut self, comparison: Comparison) -> Self {
        self.comparison = comparison;
        self
    }

    /// Set the per-waypoint and per-fleet search bounds.
    pub fn with_bounds(mut self, max_attempts: u32, max_retries: u32) -> Self {
        self.max_attempts = max_attempts;
        self.max_retries = max_retries;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Whether a measured distance is a conflict under these rules.
    pub fn violates(&self, distance: f64) -> bool {
        self.comparison.violates(distance, self.threshold)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.threshold.is_finite() || self.threshold <= 0.0 {
            return Err(DeconflictError::invalid_config(format!(
                "threshold must be positive and finite, got {}",
                self.threshold
            )));
        }
        if !self.step.is_finite() || self.step <= 0.0 {
            return Err(DeconflictError::invalid_config(format!(
                "perturbation step must be positive and finite, got {}",
                self.step
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundary_depends_on_comparison() {
        assert!(!Comparison::Strict.violates(5.0, 5.0));
        assert!(Comparison::Inclusive.violates(5.0, 5.0));
        assert!(Comparison::Strict.violates(4.999, 5.0));
        assert!(!Comparison::Inclusive.violates(5.001, 5.0));
    }

    #[test]
    fn presets_use_their_own_defaults() {
        let index = DeconflictConfig::default();
        assert_eq!(index.threshold, 5.0);
        assert_eq!(index.comparison, Comparison::Strict);
        assert_eq!(index.time_mode, TimeMode::Index);

        let stamped = DeconflictConfig::stamped_time();
        assert_eq!(stamped.threshold, 10.0);
        assert_eq!(stamped.comparison, Comparison::Inclusive);
        assert_eq!(stamped.max_attempts, 30);
        assert_eq!(stamped.max_retries, 20);
    }

    #[test]
    fn validate_rejects_bad_threshold() {
        assert!(DeconflictConfig::default().validate().is_ok());
        assert!(DeconflictConfig::default().with_threshold(0.0).validate().is_err());
        assert!(DeconflictConfig::default().with_threshold(f64::NAN).validate().is_err());
        let mut config = DeconflictConfig::default();
        config.step = -1.0;
        assert!(config.validate().is_err());
    }
}
