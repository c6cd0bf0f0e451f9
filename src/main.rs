//! Crash Simulator
//!
//! Runs the crash model against a fixed cashout strategy and reports the
//! realized return to player, or replays a single round of a seeded run.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use rand::RngCore;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crash_point::{
    analysis::{
        distribution::{survival_probability, theoretical_rtp, BUCKET_EDGES},
        replay_round, simulate_seeded, CashoutStrategy,
    },
    CrashConfig, CrashPointGenerator, VERSION,
};

/// Crash point simulator.
#[derive(Debug, Parser)]
#[command(name = "crash-sim", version, about)]
struct Args {
    /// Rounds to simulate.
    #[arg(long, default_value_t = 100_000)]
    rounds: u64,

    /// Cashout multiplier of the simulated player.
    #[arg(long, default_value_t = 1.5)]
    cashout: f64,

    /// Stake per round.
    #[arg(long, default_value_t = 100.0)]
    stake: f64,

    /// Master seed (hex, or any text). Random when omitted.
    #[arg(long)]
    seed: Option<String>,

    /// JSON file with model parameters.
    #[arg(long, conflicts_with = "env")]
    config: Option<PathBuf>,

    /// Read model parameters from CRASH_* environment variables.
    #[arg(long)]
    env: bool,

    /// Replay a single round of the seeded run instead of simulating.
    #[arg(long)]
    replay: Option<u64>,

    /// Print the report as JSON.
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    info!("Crash Simulator v{}", VERSION);

    let config = load_config(&args)?;
    let generator = CrashPointGenerator::new(config).context("invalid crash model")?;
    info!(
        "House edge: {:.2}%, range [{:.2}, {:.2}], jackpot {:.3}% over [{}, {})",
        config.house_edge * 100.0,
        config.min_multiplier,
        config.max_multiplier,
        config.jackpot_probability * 100.0,
        config.jackpot_min,
        config.jackpot_max
    );

    let master_seed = master_seed(args.seed.as_deref());

    if let Some(round) = args.replay {
        let outcome = replay_round(&generator, &master_seed, round);
        if args.json {
            println!("{}", serde_json::to_string(&outcome)?);
        } else {
            info!("Round {}: {:?}", round, outcome);
        }
        return Ok(());
    }

    let strategy = CashoutStrategy::new(args.cashout, args.stake)?;
    let report = simulate_seeded(&generator, &master_seed, &strategy, args.rounds);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    info!("=== Results ===");
    info!("Wagered: {:.2}, returned: {:.2}", report.total_wagered, report.total_returned);
    info!(
        "RTP: {:.4} (model {:.4}), house profit {:.2}",
        report.rtp(),
        theoretical_rtp(&config, strategy.target),
        report.house_profit()
    );
    if let Some(mean) = report.summary.mean() {
        info!("Mean crash point: {:.2}", mean);
    }

    for (i, edge) in BUCKET_EDGES.iter().enumerate() {
        let upper = BUCKET_EDGES.get(i + 1).copied();
        let expected = survival_probability(&config, *edge)
            - upper.map_or(0.0, |u| survival_probability(&config, u));
        info!(
            "[{:>6.2}, {:>7}) {:>7.3}% (model {:>7.3}%)",
            edge,
            upper.map_or("inf".to_string(), |u| format!("{:.2}", u)),
            report.summary.fraction_in(i) * 100.0,
            expected * 100.0
        );
    }

    Ok(())
}

fn load_config(args: &Args) -> Result<CrashConfig> {
    if let Some(path) = &args.config {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        return CrashConfig::from_json(&raw).with_context(|| format!("parsing {}", path.display()));
    }
    if args.env {
        return Ok(CrashConfig::from_env()?);
    }
    Ok(CrashConfig::default())
}

/// Decode a hex seed, fall back to the raw text, or draw a fresh one.
fn master_seed(seed: Option<&str>) -> Vec<u8> {
    match seed {
        Some(text) => hex::decode(text).unwrap_or_else(|_| text.as_bytes().to_vec()),
        None => {
            let mut seed = vec![0u8; 32];
            rand::thread_rng().fill_bytes(&mut seed);
            info!("Generated master seed {}", hex::encode(&seed));
            seed
        }
    }
}
