//! Run configuration from environment.

use deconflict_core::{DeconflictConfig, TimeMode};
use std::env;
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct Config {
    pub time_mode: TimeMode,
    /// Unset means the time mode's own default
    pub threshold: Option<f64>,
    pub max_attempts: u32,
    pub max_retries: u32,
    pub seed: u64,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; unparsable values fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = DeconflictConfig::default();
        Self {
            time_mode: match lookup("DECONFLICT_TIME_MODE").as_deref() {
                Some("stamped") => TimeMode::Stamped,
                _ => TimeMode::Index,
            },
            threshold: parsed(lookup("DECONFLICT_THRESHOLD")),
            max_attempts: parsed(lookup("DECONFLICT_MAX_ATTEMPTS"))
                .unwrap_or(defaults.max_attempts),
            max_retries: parsed(lookup("DECONFLICT_MAX_RETRIES")).unwrap_or(defaults.max_retries),
            seed: parsed(lookup("DECONFLICT_SEED")).unwrap_or(defaults.seed),
        }
    }

    /// Rules for the core, starting from the preset of the time mode.
    pub fn rules(&self) -> DeconflictConfig {
        let preset = match self.time_mode {
            TimeMode::Index => DeconflictConfig::default(),
            TimeMode::Stamped => DeconflictConfig::stamped_time(),
        };
        let threshold = self.threshold.unwrap_or(preset.threshold);
        preset
            .with_threshold(threshold)
            .with_bounds(self.max_attempts, self.max_retries)
            .with_seed(self.seed)
    }
}

fn parsed<T: FromStr>(value: Option<String>) -> Option<T> {
    value.and_then(|s| s.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use deconflict_core::Comparison;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_uses_index_defaults() {
        let rules = Config::from_lookup(lookup(&[])).rules();
        assert_eq!(rules.threshold, 5.0);
        assert_eq!(rules.max_attempts, 30);
        assert_eq!(rules.max_retries, 20);
        assert_eq!(rules.time_mode, TimeMode::Index);
    }

    #[test]
    fn stamped_mode_keeps_its_preset() {
        let rules = Config::from_lookup(lookup(&[
            ("DECONFLICT_TIME_MODE", "stamped"),
            ("DECONFLICT_SEED", "7"),
        ]))
        .rules();
        assert_eq!(rules.threshold, 10.0);
        assert_eq!(rules.comparison, Comparison::Inclusive);
        assert_eq!(rules.seed, 7);
    }

    #[test]
    fn bad_values_fall_back() {
        let config = Config::from_lookup(lookup(&[
            ("DECONFLICT_THRESHOLD", "12.5"),
            ("DECONFLICT_MAX_RETRIES", "many"),
        ]));
        assert_eq!(config.threshold, Some(12.5));
        assert_eq!(config.max_retries, 20);
    }
}
