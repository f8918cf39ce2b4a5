use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// WRES forecast verification.
#[derive(Parser)]
#[command(
    name = "wres",
    version,
    about = "Verify hydrologic forecasts against observations"
)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Pair forecasts with observations and compute verification statistics.
    Evaluate(EvaluateArgs),
}

/// Arguments for the `evaluate` subcommand.
#[derive(clap::Args)]
pub struct EvaluateArgs {
    /// Path to TOML configuration file.
    #[arg(short, long, default_value = "wres.toml")]
    pub config: PathBuf,

    /// Override the time series JSON path from config.
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Override the statistics JSON path from config. Without either, statistics are
    /// written to stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Override the rank histogram tie-break seed from config.
    #[arg(short, long)]
    pub seed: Option<u64>,
}
