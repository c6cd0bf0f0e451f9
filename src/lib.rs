//! # Crash Point
//!
//! Crash multiplier generation for the "Crash" game: a house-edge-adjusted
//! Pareto draw with an independent jackpot branch, plus tooling to verify
//! the payout guarantees it is built around.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       CRASH POINT                            │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/             - Primitives                              │
//! │  ├── multiplier.rs - Hundredths-precision multipliers        │
//! │  └── rng.rs        - Injected uniform sources, Xorshift128+  │
//! │                                                              │
//! │  game/             - Crash model                             │
//! │  ├── config.rs     - Parameters, validation, env/JSON        │
//! │  └── crash.rs      - Two-branch crash point generator        │
//! │                                                              │
//! │  analysis/         - Verification                            │
//! │  ├── distribution.rs - Histograms, analytic survival/RTP     │
//! │  └── simulate.rs   - Fixed-cashout simulation, replay        │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Guarantees
//!
//! Every crash point is in `[1.00, 1000.00]` and a multiple of `0.01`.
//! The generator keeps no state between calls: all randomness comes from
//! the [`UniformSource`] it is handed, and [`generate_crash_point`] wires
//! in the thread-local system generator.
//!
//! ```
//! use crash_point::{CrashPointGenerator, ScriptedSource};
//!
//! let generator = CrashPointGenerator::default();
//! let mut source = ScriptedSource::new([0.5, 0.5]);
//! assert_eq!(generator.crash_point(&mut source).unwrap(), 1.94);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod analysis;
pub mod core;
pub mod game;

// Re-export commonly used types
pub use crate::core::multiplier::Multiplier;
pub use crate::core::rng::{DeterministicRng, ScriptedSource, SystemSource, UniformSource};
pub use game::config::{ConfigError, CrashConfig};
pub use game::crash::{
    generate_crash_point, generate_crash_point_with, CrashError, CrashOutcome,
    CrashPointGenerator,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
