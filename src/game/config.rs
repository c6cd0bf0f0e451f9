//! Crash Model Configuration
//!
//! Parameters of the two-branch crash model. Defaults give a 3% house edge,
//! a 1.00x-1000.00x range and a 0.5% jackpot branch over [100, 1000).

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::core::multiplier::{
    is_exact_hundredths, DEFAULT_MAX_MULTIPLIER, DEFAULT_MIN_MULTIPLIER, MAX_REPRESENTABLE,
};

/// Default house edge (RTP = 97%).
pub const DEFAULT_HOUSE_EDGE: f64 = 0.03;

/// Default probability of the jackpot branch.
pub const DEFAULT_JACKPOT_PROBABILITY: f64 = 0.005;

/// Default lower bound of the jackpot range (inclusive).
pub const DEFAULT_JACKPOT_MIN: f64 = 100.0;

/// Default upper bound of the jackpot range (exclusive before rounding).
pub const DEFAULT_JACKPOT_MAX: f64 = 1000.0;

/// Crash model parameters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrashConfig {
    /// Fraction of the fair payout withheld by the house.
    pub house_edge: f64,
    /// Floor applied to the base branch.
    pub min_multiplier: f64,
    /// Ceiling applied to the base branch.
    pub max_multiplier: f64,
    /// Probability of taking the jackpot branch.
    pub jackpot_probability: f64,
    /// Jackpot range lower bound.
    pub jackpot_min: f64,
    /// Jackpot range upper bound.
    pub jackpot_max: f64,
}

impl Default for CrashConfig {
    fn default() -> Self {
        Self {
            house_edge: DEFAULT_HOUSE_EDGE,
            min_multiplier: DEFAULT_MIN_MULTIPLIER,
            max_multiplier: DEFAULT_MAX_MULTIPLIER,
            jackpot_probability: DEFAULT_JACKPOT_PROBABILITY,
            jackpot_min: DEFAULT_JACKPOT_MIN,
            jackpot_max: DEFAULT_JACKPOT_MAX,
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A parameter is NaN or infinite.
    #[error("{0} must be finite")]
    NotFinite(&'static str),
    /// A range bound is not a whole number of hundredths.
    #[error("{field} = {value} is not a multiple of 0.01")]
    NotHundredths {
        /// Field name.
        field: &'static str,
        /// Configured value.
        value: f64,
    },
    /// House edge outside `[0, 1)`.
    #[error("house edge {0} outside [0, 1)")]
    HouseEdge(f64),
    /// Floor below 1.00x.
    #[error("minimum multiplier {0} below 1.00")]
    FloorBelowOne(f64),
    /// Floor above ceiling.
    #[error("minimum multiplier {min} exceeds maximum {max}")]
    InvertedRange {
        /// Configured floor.
        min: f64,
        /// Configured ceiling.
        max: f64,
    },
    /// Ceiling too large to represent in hundredths.
    #[error("maximum multiplier {0} exceeds 1000000")]
    CeilingTooLarge(f64),
    /// Jackpot probability outside `[0, 1]`.
    #[error("jackpot probability {0} outside [0, 1]")]
    JackpotProbability(f64),
    /// Jackpot range empty, inverted, or outside the multiplier range.
    #[error("jackpot range [{min}, {max}) invalid for multiplier range [{floor}, {ceiling}]")]
    JackpotRange {
        /// Jackpot lower bound.
        min: f64,
        /// Jackpot upper bound.
        max: f64,
        /// Multiplier floor.
        floor: f64,
        /// Multiplier ceiling.
        ceiling: f64,
    },
    /// Environment variable could not be parsed.
    #[error("invalid value for {var}: {value:?}")]
    InvalidEnv {
        /// Variable name.
        var: &'static str,
        /// Raw value.
        value: String,
    },
    /// JSON could not be parsed.
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl CrashConfig {
    /// Create config from environment variables.
    ///
    /// Unset variables keep their default. The result is validated.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let config = Self {
            house_edge: env_f64("CRASH_HOUSE_EDGE", defaults.house_edge)?,
            min_multiplier: env_f64("CRASH_MIN_MULTIPLIER", defaults.min_multiplier)?,
            max_multiplier: env_f64("CRASH_MAX_MULTIPLIER", defaults.max_multiplier)?,
            jackpot_probability: env_f64(
                "CRASH_JACKPOT_PROBABILITY",
                defaults.jackpot_probability,
            )?,
            jackpot_min: env_f64("CRASH_JACKPOT_MIN", defaults.jackpot_min)?,
            jackpot_max: env_f64("CRASH_JACKPOT_MAX", defaults.jackpot_max)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Parse config from JSON. Missing fields keep their default.
    pub fn from_json(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Target return to player of the base model.
    #[inline]
    pub fn rtp(&self) -> f64 {
        1.0 - self.house_edge
    }

    /// Check every parameter.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("house_edge", self.house_edge),
            ("min_multiplier", self.min_multiplier),
            ("max_multiplier", self.max_multiplier),
            ("jackpot_probability", self.jackpot_probability),
            ("jackpot_min", self.jackpot_min),
            ("jackpot_max", self.jackpot_max),
        ];
        if let Some(&(name, _)) = fields.iter().find(|(_, v)| !v.is_finite()) {
            return Err(ConfigError::NotFinite(name));
        }

        if !(0.0..1.0).contains(&self.house_edge) {
            return Err(ConfigError::HouseEdge(self.house_edge));
        }
        if self.min_multiplier < 1.0 {
            return Err(ConfigError::FloorBelowOne(self.min_multiplier));
        }
        if self.min_multiplier > self.max_multiplier {
            return Err(ConfigError::InvertedRange {
                min: self.min_multiplier,
                max: self.max_multiplier,
            });
        }
        if self.max_multiplier > MAX_REPRESENTABLE {
            return Err(ConfigError::CeilingTooLarge(self.max_multiplier));
        }
        if !(0.0..=1.0).contains(&self.jackpot_probability) {
            return Err(ConfigError::JackpotProbability(self.jackpot_probability));
        }
        if self.jackpot_min >= self.jackpot_max
            || self.jackpot_min < self.min_multiplier
            || self.jackpot_max > self.max_multiplier
        {
            return Err(ConfigError::JackpotRange {
                min: self.jackpot_min,
                max: self.jackpot_max,
                floor: self.min_multiplier,
                ceiling: self.max_multiplier,
            });
        }

        // Rounding happens after clamping, so bounds must already sit on the grid
        let bounds = [
            ("min_multiplier", self.min_multiplier),
            ("max_multiplier", self.max_multiplier),
            ("jackpot_min", self.jackpot_min),
            ("jackpot_max", self.jackpot_max),
        ];
        if let Some(&(field, value)) = bounds.iter().find(|(_, v)| !is_exact_hundredths(*v)) {
            return Err(ConfigError::NotHundredths { field, value });
        }
        Ok(())
    }
}

fn env_f64(var: &'static str, default: f64) -> Result<f64, ConfigError> {
    match std::env::var(var) {
        Ok(value) => {
            debug!("{} overridden from environment: {}", var, value);
            value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidEnv { var, value })
        }
        Err(_) => Ok(default),
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = CrashConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.house_edge, 0.03);
        assert_eq!(config.min_multiplier, 1.0);
        assert_eq!(config.max_multiplier, 1000.0);
        assert_eq!(config.jackpot_probability, 0.005);
        assert_eq!(config.jackpot_min, 100.0);
        assert_eq!(config.jackpot_max, 1000.0);
        assert!((config.rtp() - 0.97).abs() < 1e-12);
    }

    #[test]
    fn test_validation_failures() {
        let base = CrashConfig::default();

        let c = CrashConfig { house_edge: 1.0, ..base };
        assert!(matches!(c.validate(), Err(ConfigError::HouseEdge(_))));

        let c = CrashConfig { house_edge: -0.1, ..base };
        assert!(matches!(c.validate(), Err(ConfigError::HouseEdge(_))));

        let c = CrashConfig { min_multiplier: 0.5, ..base };
        assert!(matches!(c.validate(), Err(ConfigError::FloorBelowOne(_))));

        let c = CrashConfig { min_multiplier: 5.0, max_multiplier: 2.0, ..base };
        assert!(matches!(c.validate(), Err(ConfigError::InvertedRange { .. })));

        let c = CrashConfig { max_multiplier: 2e6, jackpot_max: 1000.0, ..base };
        assert!(matches!(c.validate(), Err(ConfigError::CeilingTooLarge(_))));

        let c = CrashConfig { jackpot_probability: 1.5, ..base };
        assert!(matches!(c.validate(), Err(ConfigError::JackpotProbability(_))));

        let c = CrashConfig { jackpot_min: 500.0, jackpot_max: 500.0, ..base };
        assert!(matches!(c.validate(), Err(ConfigError::JackpotRange { .. })));

        let c = CrashConfig { jackpot_max: 2000.0, ..base };
        assert!(matches!(c.validate(), Err(ConfigError::JackpotRange { .. })));

        let c = CrashConfig { house_edge: f64::NAN, ..base };
        assert!(matches!(c.validate(), Err(ConfigError::NotFinite("house_edge"))));
    }

    #[test]
    fn test_bounds_must_be_hundredths() {
        let base = CrashConfig::default();
        let cases = [
            ("min_multiplier", CrashConfig { min_multiplier: 1.004, ..base }),
            ("max_multiplier", CrashConfig { max_multiplier: 1000.005, ..base }),
            ("jackpot_min", CrashConfig { jackpot_min: 100.005, ..base }),
            ("jackpot_max", CrashConfig { jackpot_max: 999.995, ..base }),
        ];
        for (name, config) in cases {
            match config.validate() {
                Err(ConfigError::NotHundredths { field, .. }) => assert_eq!(field, name),
                other => panic!("{name}: expected NotHundredths, got {other:?}"),
            }
        }

        let on_grid = CrashConfig {
            min_multiplier: 1.5,
            max_multiplier: 999.99,
            jackpot_min: 100.01,
            jackpot_max: 999.99,
            ..base
        };
        assert!(on_grid.validate().is_ok());
    }

    #[test]
    fn test_edge_cases_accepted() {
        let base = CrashConfig::default();
        assert!(CrashConfig { house_edge: 0.0, ..base }.validate().is_ok());
        assert!(CrashConfig { jackpot_probability: 0.0, ..base }.validate().is_ok());
        assert!(CrashConfig { jackpot_probability: 1.0, ..base }.validate().is_ok());
    }

    #[test]
    fn test_from_json_partial() {
        let config = CrashConfig::from_json(r#"{"house_edge": 0.01}"#).unwrap();
        assert_eq!(config.house_edge, 0.01);
        assert_eq!(config.max_multiplier, 1000.0);

        let json = CrashConfig::default().to_json().unwrap();
        assert_eq!(CrashConfig::from_json(&json).unwrap(), CrashConfig::default());
    }

    #[test]
    fn test_from_json_rejects() {
        assert!(matches!(
            CrashConfig::from_json("not json"),
            Err(ConfigError::Json(_))
        ));
        assert!(matches!(
            CrashConfig::from_json(r#"{"house_edge": 2.0}"#),
            Err(ConfigError::HouseEdge(_))
        ));
    }

    #[test]
    fn test_from_env() {
        // Only this test touches CRASH_* variables.
        std::env::set_var("CRASH_HOUSE_EDGE", "0.05");
        let config = CrashConfig::from_env().unwrap();
        assert_eq!(config.house_edge, 0.05);
        assert_eq!(config.jackpot_probability, 0.005);

        std::env::set_var("CRASH_HOUSE_EDGE", "lots");
        let err = CrashConfig::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnv { var: "CRASH_HOUSE_EDGE", .. }));

        std::env::remove_var("CRASH_HOUSE_EDGE");
        assert_eq!(CrashConfig::from_env().unwrap(), CrashConfig::default());
    }
}
