//! Core primitives.
//!
//! Exact-granularity multipliers and the randomness sources every draw
//! flows through.

pub mod multiplier;
pub mod rng;

// Re-export core types
pub use multiplier::{round_to_hundredths, Multiplier};
pub use rng::{
    derive_round_seed, DeterministicRng, RandSource, ScriptExhausted, ScriptedSource,
    SystemSource, UniformSource,
};
