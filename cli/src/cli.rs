use std::path::PathBuf;

/// ReCom ensemble and short-burst CLI (argument schema only)
#[derive(clap::Parser, Debug)]
#[command(name = "recomchain", version, about, propagate_version = true)]
pub struct Cli {
    /// Increase output verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Run a ReCom chain and record per-step statistics
    Ensemble(EnsembleArgs),

    /// Search for high-scoring plans with short bursts
    ShortBurst(ShortBurstArgs),

    /// Run a threshold x burst-length grid of short-burst searches in parallel
    Sweep(SweepArgs),
}

/// Inputs shared by every command.
#[derive(clap::Args, Debug)]
pub struct RunArgs {
    /// Dual graph JSON file (nodes with attributes, adjacency edges)
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub graph: PathBuf,

    /// Run configuration JSON file; defaults apply when omitted
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Override the configured random seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Override the configured number of steps
    #[arg(long)]
    pub steps: Option<usize>,
}

#[derive(clap::Args, Debug)]
pub struct EnsembleArgs {
    #[command(flatten)]
    pub run: RunArgs,

    /// Output JSON file, defaults to "./ensemble.json"
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
pub struct ShortBurstArgs {
    #[command(flatten)]
    pub run: RunArgs,

    /// Output JSON file, defaults to "./short_burst.json"
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
pub struct SweepArgs {
    #[command(flatten)]
    pub run: RunArgs,

    /// Output directory for one JSON file per task, defaults to "."
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    pub output: Option<PathBuf>,

    /// Override the configured worker limit
    #[arg(short = 'j', long)]
    pub workers: Option<usize>,
}
