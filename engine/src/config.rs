use serde::{Deserialize, Serialize};

use crate::error::EngineError;

pub const DEFAULT_WINDOW_CAPACITY: usize = 10;
pub const DEFAULT_THRESHOLD: f64 = 0.05;

pub const ENV_WINDOW_CAPACITY: &str = "SIGNAL_WINDOW_CAPACITY";
pub const ENV_THRESHOLD: &str = "SIGNAL_THRESHOLD";

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EngineConfig {
    /// Number of recent ratios kept for the moving average.
    ///
    /// Fixed for the lifetime of an engine. Must be at least 1.
    pub window_capacity: usize,

    /// Fractional deviation from 1.0 that counts as a breach.
    ///
    /// With the default of 0.05 the ratio must leave (0.95, 1.05) before
    /// an alert fires. Must lie strictly inside (0, 1).
    pub threshold: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            window_capacity: DEFAULT_WINDOW_CAPACITY,
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

impl EngineConfig {
    pub fn new(window_capacity: usize, threshold: f64) -> Result<Self, EngineError> {
        let cfg = Self {
            window_capacity,
            threshold,
        };
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load configuration from the environment (and `.env` if present).
    ///
    /// Missing variables fall back to the defaults; present but malformed
    /// values are rejected.
    pub fn from_env() -> Result<Self, EngineError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`EngineConfig::from_env`] with an explicit variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, EngineError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let window_capacity = match lookup(ENV_WINDOW_CAPACITY) {
            Some(raw) => raw.trim().parse::<usize>().map_err(|_| {
                EngineError::InvalidConfiguration(format!(
                    "{ENV_WINDOW_CAPACITY} must be a positive integer, got {raw:?}"
                ))
            })?,
            None => DEFAULT_WINDOW_CAPACITY,
        };

        let threshold = match lookup(ENV_THRESHOLD) {
            Some(raw) => raw.trim().parse::<f64>().map_err(|_| {
                EngineError::InvalidConfiguration(format!(
                    "{ENV_THRESHOLD} must be a number, got {raw:?}"
                ))
            })?,
            None => DEFAULT_THRESHOLD,
        };

        Self::new(window_capacity, threshold)
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if self.window_capacity < 1 {
            return Err(EngineError::InvalidConfiguration(
                "window_capacity must be >= 1".into(),
            ));
        }

        // NaN fails both comparisons and is rejected here too
        if !(self.threshold > 0.0 && self.threshold < 1.0) {
            return Err(EngineError::InvalidConfiguration(format!(
                "threshold must be within (0, 1), got {}",
                self.threshold
            )));
        }

        Ok(())
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::from_threshold(self.threshold)
    }
}

/// Breach bounds, symmetric around 1.0.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub upper: f64,
    pub lower: f64,
}

impl Bounds {
    pub fn from_threshold(threshold: f64) -> Self {
        Self {
            upper: 1.0 + threshold,
            lower: 1.0 - threshold,
        }
    }

    /// Strictly above `upper` or strictly below `lower`.
    pub fn is_breached(&self, ratio: f64) -> bool {
        ratio > self.upper || ratio < self.lower
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_are_valid() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.window_capacity, 10);
        assert_eq!(cfg.threshold, 0.05);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn default_bounds_are_symmetric_around_one() {
        let b = EngineConfig::default().bounds();
        assert!((b.upper - 1.05).abs() < 1e-12);
        assert!((b.lower - 0.95).abs() < 1e-12);
        assert!(((b.upper - 1.0) - (1.0 - b.lower)).abs() < 1e-12);
    }

    #[test]
    fn zero_capacity_is_rejected() {
        let err = EngineConfig::new(0, 0.05).unwrap_err();
        assert!(matches!(err, EngineError::InvalidConfiguration(_)));
    }

    #[test]
    fn threshold_outside_open_unit_interval_is_rejected() {
        for t in [0.0, 1.0, -0.1, 1.5, f64::NAN, f64::INFINITY] {
            assert!(
                EngineConfig::new(10, t).is_err(),
                "threshold {t} should be rejected"
            );
        }
    }

    #[test]
    fn lookup_falls_back_to_defaults() {
        let cfg = EngineConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(cfg, EngineConfig::default());
    }

    #[test]
    fn lookup_reads_both_values() {
        let cfg = EngineConfig::from_lookup(lookup_from(&[
            (ENV_WINDOW_CAPACITY, "25"),
            (ENV_THRESHOLD, " 0.1 "),
        ]))
        .unwrap();

        assert_eq!(cfg.window_capacity, 25);
        assert_eq!(cfg.threshold, 0.1);
    }

    #[test]
    fn lookup_rejects_malformed_values() {
        let err = EngineConfig::from_lookup(lookup_from(&[(ENV_WINDOW_CAPACITY, "ten")]))
            .unwrap_err();
        assert!(err.to_string().contains(ENV_WINDOW_CAPACITY));

        let err =
            EngineConfig::from_lookup(lookup_from(&[(ENV_THRESHOLD, "2")])).unwrap_err();
        assert!(matches!(err, EngineError::InvalidConfiguration(_)));
    }

    #[test]
    fn bounds_are_exclusive() {
        let b = Bounds {
            upper: 1.05,
            lower: 0.95,
        };
        assert!(!b.is_breached(1.05));
        assert!(!b.is_breached(0.95));
        assert!(!b.is_breached(1.0));
        assert!(b.is_breached(1.0500001));
        assert!(b.is_breached(0.9499999));
    }
}
