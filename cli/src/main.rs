mod cli;
mod commands;

use cli::{Cli, Commands};
use commands::{ensemble, short_burst, sweep};

fn init_tracing(verbose: u8) {
    use tracing_subscriber::{EnvFilter, fmt};

    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("recomchain={level}")));

    fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

pub fn run() -> anyhow::Result<()> {
    use clap::Parser;

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match &cli.command {
        Commands::Ensemble(args) => ensemble::run(&cli, args),
        Commands::ShortBurst(args) => short_burst::run(&cli, args),
        Commands::Sweep(args) => sweep::run(&cli, args),
    }
}

fn main() -> anyhow::Result<()> { run() }
