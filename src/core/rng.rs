//! Randomness Sources
//!
//! The crash generator never reaches for ambient randomness. Every draw
//! comes from a [`UniformSource`] passed in by the caller:
//!
//! - [`SystemSource`] - production wiring over the thread-local `rand` generator
//! - [`DeterministicRng`] - seeded Xorshift128+, replayable on any platform
//! - [`RandSource`] - adapter for any `rand` generator
//! - [`ScriptedSource`] - fixed list of draws for tests and stubs

use std::collections::VecDeque;
use std::convert::Infallible;

use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// A source of uniform draws.
///
/// Each call should return an independent value in `[0, 1)`. Consumers
/// check the range themselves and report violations rather than clamping.
pub trait UniformSource {
    /// Failure type of the underlying source.
    type Error: std::error::Error + 'static;

    /// Draw the next uniform value.
    fn next_unit(&mut self) -> Result<f64, Self::Error>;
}

impl<S: UniformSource + ?Sized> UniformSource for &mut S {
    type Error = S::Error;

    #[inline]
    fn next_unit(&mut self) -> Result<f64, Self::Error> {
        (**self).next_unit()
    }
}

/// Convert 64 random bits to a float in `[0, 1)` using the top 53 bits.
#[inline]
fn unit_from_bits(bits: u64) -> f64 {
    (bits >> 11) as f64 / (1u64 << 53) as f64
}

/// Deterministic PRNG using Xorshift128+ algorithm.
///
/// # Determinism Guarantee
///
/// Given the same seed, this RNG will produce the exact same sequence
/// of random numbers on any platform.
///
/// # Example
///
/// ```
/// use crash_point::core::rng::DeterministicRng;
///
/// let mut rng = DeterministicRng::new(12345);
/// let value = rng.next_u64();
/// assert_eq!(value, 6233086606872742541); // Always the same!
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DeterministicRng {
    state: [u64; 2],
}

impl Default for DeterministicRng {
    fn default() -> Self {
        Self::new(0)
    }
}

impl DeterministicRng {
    /// Create a new RNG from a 64-bit seed.
    ///
    /// Uses SplitMix64 to initialize the internal state, ensuring
    /// good distribution even from weak seeds.
    pub fn new(seed: u64) -> Self {
        let mut s = seed;
        let state0 = splitmix64(&mut s);
        let state1 = splitmix64(&mut s);

        // Ensure state is never all zeros
        let state = if state0 == 0 && state1 == 0 {
            [1, 1]
        } else {
            [state0, state1]
        };

        Self { state }
    }

    /// Create the RNG for one round of a seeded run.
    ///
    /// See [`derive_round_seed`].
    pub fn for_round(master_seed: &[u8], round: u64) -> Self {
        Self::new(derive_round_seed(master_seed, round))
    }

    /// Generate the next 64-bit random value.
    #[inline]
    pub fn next_u64(&mut self) -> u64 {
        let s0 = self.state[0];
        let mut s1 = self.state[1];
        let result = s0.wrapping_add(s1);

        s1 ^= s0;
        self.state[0] = s0.rotate_left(24) ^ s1 ^ (s1 << 16);
        self.state[1] = s1.rotate_left(37);

        result
    }

    /// Generate a float in `[0, 1)` with 53 bits of precision.
    #[inline]
    pub fn next_f64(&mut self) -> f64 {
        unit_from_bits(self.next_u64())
    }

    /// Get current state (for checkpointing/debugging).
    pub fn state(&self) -> [u64; 2] {
        self.state
    }

    /// Restore from saved state.
    pub fn set_state(&mut self, state: [u64; 2]) {
        self.state = state;
    }
}

impl UniformSource for DeterministicRng {
    type Error = Infallible;

    #[inline]
    fn next_unit(&mut self) -> Result<f64, Infallible> {
        Ok(self.next_f64())
    }
}

/// Process-wide production source backed by `rand::thread_rng()`.
///
/// Each thread owns its generator, so concurrent callers never contend.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemSource;

impl UniformSource for SystemSource {
    type Error = Infallible;

    #[inline]
    fn next_unit(&mut self) -> Result<f64, Infallible> {
        Ok(rand::thread_rng().gen::<f64>())
    }
}

/// Adapter exposing any `rand` generator as a [`UniformSource`].
#[derive(Clone, Debug)]
pub struct RandSource<R>(pub R);

impl<R: RngCore> UniformSource for RandSource<R> {
    type Error = Infallible;

    #[inline]
    fn next_unit(&mut self) -> Result<f64, Infallible> {
        Ok(self.0.gen::<f64>())
    }
}

/// Returned when a [`ScriptedSource`] runs out of draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("scripted source exhausted after {consumed} draws")]
pub struct ScriptExhausted {
    /// Number of draws handed out before running dry.
    pub consumed: usize,
}

/// Hands out a fixed list of draws in order.
///
/// Values are returned as given, even outside `[0, 1)`, so callers can
/// exercise their own range checks.
#[derive(Clone, Debug, Default)]
pub struct ScriptedSource {
    draws: VecDeque<f64>,
    consumed: usize,
}

impl ScriptedSource {
    /// Create a source that will return `draws` in order.
    pub fn new(draws: impl IntoIterator<Item = f64>) -> Self {
        Self {
            draws: draws.into_iter().collect(),
            consumed: 0,
        }
    }

    /// Draws not yet handed out.
    pub fn remaining(&self) -> usize {
        self.draws.len()
    }

    /// Draws handed out so far.
    pub fn consumed(&self) -> usize {
        self.consumed
    }
}

impl UniformSource for ScriptedSource {
    type Error = ScriptExhausted;

    fn next_unit(&mut self) -> Result<f64, ScriptExhausted> {
        match self.draws.pop_front() {
            Some(value) => {
                self.consumed += 1;
                Ok(value)
            }
            None => Err(ScriptExhausted {
                consumed: self.consumed,
            }),
        }
    }
}

/// SplitMix64 for seed initialization.
/// Produces well-distributed values from sequential seeds.
#[inline]
fn splitmix64(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9E3779B97F4A7C15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
    z ^ (z >> 31)
}

/// Domain separator for per-round seeds.
const ROUND_SEED_DOMAIN: &[u8] = b"CRASH_POINT_ROUND_V1";

/// Derive the seed for one round of a seeded run.
///
/// SHA-256 over the domain separator, `master_seed`, and the little-endian
/// round index. The first 8 bytes of the digest, little-endian, are the seed.
/// Rounds are independent of each other and can be replayed in any order.
pub fn derive_round_seed(master_seed: &[u8], round: u64) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(ROUND_SEED_DOMAIN);
    hasher.update(master_seed);
    hasher.update(round.to_le_bytes());
    let hash = hasher.finalize();

    let mut seed = [0u8; 8];
    seed.copy_from_slice(&hash[..8]);
    u64::from_le_bytes(seed)
}

// =============================================================================
// TESTS
// =============================================================================
