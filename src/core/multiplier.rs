//! Hundredths-Precision Multipliers
//!
//! Crash multipliers are always multiples of 0.01. They are stored as an
//! integer count of hundredths so the granularity is exact, and converted
//! to `f64` only at the boundary.
//!
//! ## Format
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Multiplier(u32) = value * 100                              │
//! ├─────────────────────────────────────────────────────────────┤
//! │  1.00x    ->      100                                       │
//! │  1.94x    ->      194                                       │
//! │  1000.00x -> 100_000                                        │
//! │                                                             │
//! │  Range: 0.00 to 42_949_672.95                               │
//! │  Precision: 0.01                                            │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Rounding
//!
//! Conversion from `f64` rounds half away from zero (`f64::round`). On the
//! positive values used here that is the same as round-half-up. The
//! scaling multiply itself rounds: `1.945 * 100.0` lands exactly on `194.5`
//! and rounds up to `1.95`, while `1.005 * 100.0` lands just below `100.5`
//! and rounds down to `1.00`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Hundredths per whole multiplier.
pub const HUNDREDTHS_PER_UNIT: u32 = 100;

/// Largest multiplier value a [`Multiplier`] can be built from.
pub const MAX_REPRESENTABLE: f64 = 1_000_000.0;

/// Default floor: a round always pays at least 1.00x.
pub const DEFAULT_MIN_MULTIPLIER: f64 = 1.0;

/// Default ceiling: 1000.00x.
pub const DEFAULT_MAX_MULTIPLIER: f64 = 1000.0;

/// A crash multiplier at 0.01 granularity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Multiplier(u32);

impl Multiplier {
    /// 1.00x
    pub const ONE: Multiplier = Multiplier(HUNDREDTHS_PER_UNIT);

    /// Build from a raw hundredths count.
    #[inline]
    pub const fn from_hundredths(hundredths: u32) -> Self {
        Self(hundredths)
    }

    /// Round a positive finite value to the nearest hundredth.
    ///
    /// Returns `None` for NaN, infinities, negatives and values above
    /// [`MAX_REPRESENTABLE`].
    pub fn from_f64_rounded(value: f64) -> Option<Self> {
        if !value.is_finite() || value < 0.0 || value > MAX_REPRESENTABLE {
            return None;
        }
        let hundredths = (value * HUNDREDTHS_PER_UNIT as f64).round();
        Some(Self(hundredths as u32))
    }

    /// Raw hundredths count.
    #[inline]
    pub const fn hundredths(self) -> u32 {
        self.0
    }

    /// Value as a float, e.g. `1.94`.
    #[inline]
    pub fn as_f64(self) -> f64 {
        self.0 as f64 / HUNDREDTHS_PER_UNIT as f64
    }
}

impl fmt::Display for Multiplier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{:02}x",
            self.0 / HUNDREDTHS_PER_UNIT,
            self.0 % HUNDREDTHS_PER_UNIT
        )
    }
}

/// Round to two decimal places, half away from zero.
///
/// Same expression the round pipeline uses: `round(x * 100) / 100`.
#[inline]
pub fn round_to_hundredths(value: f64) -> f64 {
    (value * HUNDREDTHS_PER_UNIT as f64).round() / HUNDREDTHS_PER_UNIT as f64
}

/// True if `value` is a whole number of hundredths, within float tolerance.
pub fn is_hundredths_aligned(value: f64) -> bool {
    let scaled = value * HUNDREDTHS_PER_UNIT as f64;
    (scaled - scaled.round()).abs() < 1e-6
}

/// True if `value` is exactly the `f64` a [`Multiplier`] converts to.
///
/// Bounds that pass this check survive round-after-clamp unchanged: any
/// value clamped to them rounds back onto them, never past them.
pub fn is_exact_hundredths(value: f64) -> bool {
    Multiplier::from_f64_rounded(value).map_or(false, |m| m.as_f64() == value)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_display() {
        let m = Multiplier::from_hundredths(194);
        assert_eq!(m.as_f64(), 1.94);
        assert_eq!(m.to_string(), "1.94x");
        assert_eq!(Multiplier::from_hundredths(100_000).to_string(), "1000.00x");
        assert_eq!(Multiplier::from_hundredths(105).to_string(), "1.05x");
    }

    #[test]
    fn test_rounding_boundaries() {
        // 1.945 * 100.0 rounds to exactly 194.5 before the half-up step
        assert_eq!(round_to_hundredths(1.945), 1.95);
        assert_eq!(Multiplier::from_f64_rounded(1.945), Some(Multiplier::from_hundredths(195)));

        // 2.125 * 100 == 212.5 exactly: half rounds away from zero
        assert_eq!(round_to_hundredths(2.125), 2.13);
        assert_eq!(Multiplier::from_f64_rounded(2.125), Some(Multiplier::from_hundredths(213)));

        // 1.005 * 100.0 lands slightly below the midpoint
        assert_eq!(round_to_hundredths(1.005), 1.0);

        assert_eq!(round_to_hundredths(0.97 / 0.5), 1.94);
    }

    #[test]
    fn test_from_f64_rejects_invalid() {
        assert_eq!(Multiplier::from_f64_rounded(f64::NAN), None);
        assert_eq!(Multiplier::from_f64_rounded(f64::INFINITY), None);
        assert_eq!(Multiplier::from_f64_rounded(-1.0), None);
        assert_eq!(Multiplier::from_f64_rounded(MAX_REPRESENTABLE * 2.0), None);
        assert!(Multiplier::from_f64_rounded(MAX_REPRESENTABLE).is_some());
    }

    #[test]
    fn test_alignment() {
        assert!(is_hundredths_aligned(1.94));
        assert!(is_hundredths_aligned(550.0));
        assert!(is_hundredths_aligned(Multiplier::from_hundredths(99_999).as_f64()));
        assert!(!is_hundredths_aligned(1.945));
    }

    #[test]
    fn test_exact_hundredths() {
        assert!(is_exact_hundredths(1.0));
        assert!(is_exact_hundredths(1.94));
        assert!(is_exact_hundredths(1000.0));
        assert!(!is_exact_hundredths(1.004));
        assert!(!is_exact_hundredths(1000.005));
        // Within the alignment tolerance, but not an exact hundredth
        assert!(is_hundredths_aligned(1.000_000_000_1));
        assert!(!is_exact_hundredths(1.000_000_000_1));
        assert!(!is_exact_hundredths(f64::NAN));
    }

    #[test]
    fn test_ordering() {
        assert!(Multiplier::ONE < Multiplier::from_hundredths(101));
        assert_eq!(Multiplier::ONE.as_f64(), DEFAULT_MIN_MULTIPLIER);
    }
}
