//! Crash game model.
//!
//! - `config` - model parameters and validation
//! - `crash` - the two-branch crash point generator

pub mod config;
pub mod crash;

pub use config::{ConfigError, CrashConfig};
pub use crash::{
    generate_crash_point, generate_crash_point_with, CrashError, CrashOutcome,
    CrashPointGenerator,
};
