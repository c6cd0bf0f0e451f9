//! Crash Point Generation
//!
//! Decides the multiplier at which a round ends. The model is a mixture of
//! two independent branches selected by a Bernoulli switch:
//!
//! ```text
//!   j ~ U[0,1)
//!   ├── j <  p_jackpot ─► Jackpot:    v ~ U[0,1), a + v * (b - a)
//!   └── j >= p_jackpot ─► BasePareto: u = 1 - U[0,1), (1 - edge) / u,
//!                                     clamped to [min, max]
//!   both ─► rounded to 0.01
//! ```
//!
//! The base branch is the inverse-transform solution of
//! `P(M >= x) = (1 - edge) / x`, so a player cashing out at any fixed
//! target `x` gets back `1 - edge` of their stake on average. The jackpot
//! branch sits on top of that and is resolved before the base model runs.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::multiplier::{Multiplier, HUNDREDTHS_PER_UNIT, MAX_REPRESENTABLE};
use crate::core::rng::{SystemSource, UniformSource};
use crate::game::config::{ConfigError, CrashConfig};

/// Which branch produced a crash point.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "branch", content = "multiplier", rename_all = "snake_case")]
pub enum CrashOutcome {
    /// Uniform draw from the jackpot range.
    Jackpot(Multiplier),
    /// House-edge-adjusted Pareto draw.
    BasePareto(Multiplier),
}

impl CrashOutcome {
    /// The crash multiplier, whichever branch produced it.
    #[inline]
    pub fn multiplier(self) -> Multiplier {
        match self {
            CrashOutcome::Jackpot(m) | CrashOutcome::BasePareto(m) => m,
        }
    }

    /// The crash multiplier as a float.
    #[inline]
    pub fn as_f64(self) -> f64 {
        self.multiplier().as_f64()
    }

    /// True for the jackpot branch.
    #[inline]
    pub fn is_jackpot(self) -> bool {
        matches!(self, CrashOutcome::Jackpot(_))
    }
}

/// Crash generation errors.
///
/// Source faults are passed through untouched; they are never coerced into
/// a valid-looking multiplier.
#[derive(Debug, Error)]
pub enum CrashError<E: std::error::Error + 'static> {
    /// The randomness source failed.
    #[error("randomness source failed: {0}")]
    Source(#[source] E),
    /// The randomness source returned a value outside `[0, 1)`.
    #[error("randomness source returned {0}, expected a draw in [0, 1)")]
    DrawOutOfRange(f64),
}

/// Stateless crash point generator over a validated [`CrashConfig`].
///
/// Holds only immutable parameters, so one instance can be shared by any
/// number of threads. Each call draws exactly two values from the source.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CrashPointGenerator {
    config: CrashConfig,
}

impl CrashPointGenerator {
    /// Create a generator, validating the configuration.
    pub fn new(config: CrashConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Model parameters.
    #[inline]
    pub fn config(&self) -> &CrashConfig {
        &self.config
    }

    /// Sample one round, keeping track of which branch fired.
    pub fn sample<S: UniformSource>(
        &self,
        source: &mut S,
    ) -> Result<CrashOutcome, CrashError<S::Error>> {
        let config = &self.config;

        let switch = draw(source)?;
        if switch < config.jackpot_probability {
            let v = draw(source)?;
            let jackpot = config.jackpot_min + v * (config.jackpot_max - config.jackpot_min);
            return Ok(CrashOutcome::Jackpot(to_multiplier(jackpot)));
        }

        // 1 - raw lies in (0, 1], so the division is always defined
        let u = 1.0 - draw(source)?;
        let crash = (config.rtp() / u).clamp(config.min_multiplier, config.max_multiplier);

        Ok(CrashOutcome::BasePareto(to_multiplier(crash)))
    }

    /// Sample one round and return the multiplier as a float.
    #[inline]
    pub fn crash_point<S: UniformSource>(
        &self,
        source: &mut S,
    ) -> Result<f64, CrashError<S::Error>> {
        self.sample(source).map(CrashOutcome::as_f64)
    }
}

/// Draw one value and reject anything outside `[0, 1)`.
#[inline]
fn draw<S: UniformSource>(source: &mut S) -> Result<f64, CrashError<S::Error>> {
    let value = source.next_unit().map_err(CrashError::Source)?;
    if (0.0..1.0).contains(&value) {
        Ok(value)
    } else {
        Err(CrashError::DrawOutOfRange(value))
    }
}

/// Round a value already inside the validated multiplier range.
#[inline]
fn to_multiplier(value: f64) -> Multiplier {
    // Validated configs and in-range draws keep this in [1, MAX_REPRESENTABLE]
    debug_assert!(
        (1.0..=MAX_REPRESENTABLE).contains(&value),
        "crash value {value} escaped the validated range"
    );
    Multiplier::from_hundredths((value * HUNDREDTHS_PER_UNIT as f64).round() as u32)
}

/// Generate a crash point with the default model and an injected source.
pub fn generate_crash_point_with<S: UniformSource>(
    source: &mut S,
) -> Result<f64, CrashError<S::Error>> {
    CrashPointGenerator::default().crash_point(source)
}

/// Generate a crash point with the default model and the system source.
///
/// Always in `[1.00, 1000.00]` and a multiple of 0.01.
pub fn generate_crash_point() -> f64 {
    match generate_crash_point_with(&mut SystemSource) {
        Ok(point) => point,
        Err(CrashError::Source(never)) => match never {},
        Err(CrashError::DrawOutOfRange(value)) => {
            unreachable!("rand produced {value} outside [0, 1)")
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
