//! Cashout Simulation
//!
//! Plays many rounds against a fixed cashout strategy and reports the
//! realized return to player. Seeded runs derive an independent source per
//! round, so any single round can be replayed on its own.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::analysis::distribution::DistributionSummary;
use crate::core::rng::{DeterministicRng, UniformSource};
use crate::game::crash::{CrashError, CrashOutcome, CrashPointGenerator};

/// Always cash out at `target` with a flat `stake`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CashoutStrategy {
    /// Cashout multiplier.
    pub target: f64,
    /// Amount wagered each round.
    pub stake: f64,
}

impl CashoutStrategy {
    /// Create a validated strategy.
    pub fn new(target: f64, stake: f64) -> Result<Self, SimulationError> {
        if !target.is_finite() || target < 1.0 {
            return Err(SimulationError::InvalidTarget(target));
        }
        if !stake.is_finite() || stake <= 0.0 {
            return Err(SimulationError::InvalidStake(stake));
        }
        Ok(Self { target, stake })
    }

    /// Payout for a round that crashed at `crash`.
    #[inline]
    pub fn payout(&self, crash: f64) -> f64 {
        if crash >= self.target {
            self.stake * self.target
        } else {
            0.0
        }
    }
}

/// Simulation errors.
#[derive(Debug, Error)]
pub enum SimulationError {
    /// Cashout target below 1.00 or not finite.
    #[error("cashout target {0} must be a finite value >= 1.00")]
    InvalidTarget(f64),
    /// Stake not positive.
    #[error("stake {0} must be positive")]
    InvalidStake(f64),
    /// Generator failed.
    #[error("round {round} failed: {source}")]
    Round {
        /// Round index.
        round: u64,
        /// Generator error, typically a [`CrashError`].
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Outcome of a simulation run.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationReport {
    /// Rounds played.
    pub rounds: u64,
    /// Rounds where the crash point reached the target.
    pub wins: u64,
    /// Total staked.
    pub total_wagered: f64,
    /// Total paid back.
    pub total_returned: f64,
    /// Crash point distribution.
    pub summary: DistributionSummary,
}

impl SimulationReport {
    /// Realized return to player.
    pub fn rtp(&self) -> f64 {
        if self.total_wagered == 0.0 {
            return 0.0;
        }
        self.total_returned / self.total_wagered
    }

    /// Wagered minus returned.
    pub fn house_profit(&self) -> f64 {
        self.total_wagered - self.total_returned
    }

    /// Fraction of rounds won.
    pub fn win_rate(&self) -> f64 {
        if self.rounds == 0 {
            return 0.0;
        }
        self.wins as f64 / self.rounds as f64
    }

    fn record(&mut self, round: u64, outcome: CrashOutcome, strategy: &CashoutStrategy) {
        let crash = outcome.as_f64();
        let payout = strategy.payout(crash);

        if outcome.is_jackpot() {
            debug!("Round {} hit jackpot at {}", round, outcome.multiplier());
        }

        self.rounds += 1;
        self.total_wagered += strategy.stake;
        self.total_returned += payout;
        if payout > 0.0 {
            self.wins += 1;
        }
        self.summary.record_outcome(outcome);
    }

    fn log(&self, strategy: &CashoutStrategy) {
        info!(
            "Simulated {} rounds at {:.2}x: rtp {:.4}, win rate {:.4}, {} jackpots",
            self.rounds,
            strategy.target,
            self.rtp(),
            self.win_rate(),
            self.summary.jackpots
        );
    }
}

fn round_error<E>(round: u64, err: CrashError<E>) -> SimulationError
where
    E: std::error::Error + Send + Sync + 'static,
{
    SimulationError::Round {
        round,
        source: Box::new(err),
    }
}

/// Play `rounds` rounds drawing from one shared source.
pub fn simulate_cashout<S>(
    generator: &CrashPointGenerator,
    source: &mut S,
    strategy: &CashoutStrategy,
    rounds: u64,
) -> Result<SimulationReport, SimulationError>
where
    S: UniformSource,
    S::Error: Send + Sync,
{
    let mut report = SimulationReport::default();
    for round in 0..rounds {
        let outcome = generator
            .sample(source)
            .map_err(|e| round_error(round, e))?;
        report.record(round, outcome, strategy);
    }
    report.log(strategy);
    Ok(report)
}

/// Play `rounds` rounds, each with its own source derived from `master_seed`.
pub fn simulate_seeded(
    generator: &CrashPointGenerator,
    master_seed: &[u8],
    strategy: &CashoutStrategy,
    rounds: u64,
) -> SimulationReport {
    info!("Seeded simulation, master seed {}", hex::encode(master_seed));

    let mut report = SimulationReport::default();
    for round in 0..rounds {
        let outcome = replay_round(generator, master_seed, round);
        report.record(round, outcome, strategy);
    }
    report.log(strategy);
    report
}

/// Recompute a single round of a seeded run.
pub fn replay_round(
    generator: &CrashPointGenerator,
    master_seed: &[u8],
    round: u64,
) -> CrashOutcome {
    let mut rng = DeterministicRng::for_round(master_seed, round);
    match generator.sample(&mut rng) {
        Ok(outcome) => outcome,
        Err(CrashError::Source(never)) => match never {},
        Err(CrashError::DrawOutOfRange(value)) => {
            unreachable!("deterministic rng produced {value} outside [0, 1)")
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
