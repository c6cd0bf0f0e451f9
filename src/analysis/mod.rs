//! Statistical verification of the crash model.
//!
//! Nothing here is needed to generate a crash point. These modules check
//! that generated points follow the intended distribution and payout ratio.

pub mod distribution;
pub mod simulate;

pub use distribution::{survival_probability, theoretical_rtp, DistributionSummary};
pub use simulate::{
    replay_round, simulate_cashout, simulate_seeded, CashoutStrategy, SimulationError,
    SimulationReport,
};
