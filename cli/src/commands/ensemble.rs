use anyhow::Result;
use serde::Serialize;
use tracing::info;

use recomchain::{
    Acceptance, MarkovChain,
    config::{ChainConfig, ChainSetup},
    summary::Ensemble,
};

use crate::commands::io;

#[derive(Serialize)]
struct EnsembleOutput<'a> {
    config: &'a ChainConfig,
    ensemble: &'a Ensemble,
    final_assignment: Vec<(&'a str, u32)>,
}

pub fn run(_cli: &crate::cli::Cli, args: &crate::cli::EnsembleArgs) -> Result<()> {
    let out_path = args.output.clone().unwrap_or("./ensemble.json".into());

    let mut config: ChainConfig = io::read_config(args.run.config.as_deref())?;
    if let Some(seed) = args.run.seed { config.seed = seed }
    if let Some(steps) = args.run.steps { config.total_steps = steps }

    info!(graph = %args.run.graph.display(), "loading graph");
    let graph = io::read_graph(&args.run.graph)?;

    let ChainSetup { initial, proposal, constraints } = config.setup(graph, config.updaters()?)?;
    info!(
        districts = initial.num_districts(),
        ideal = proposal.pop_target(),
        epsilon = config.epsilon,
        steps = config.total_steps,
        "running chain"
    );

    let mut ensemble = Ensemble::new(config.summarizer(), &initial, config.total_steps)?;
    let chain = MarkovChain::new(proposal, constraints, Acceptance::Always, initial, config.total_steps, config.seed)?
        .with_log_every(config.log_every);
    let final_state = chain.run(&mut ensemble);

    info!(path = %out_path.display(), "writing ensemble");
    io::write_json(&out_path, &EnsembleOutput {
        config: &config,
        ensemble: &ensemble,
        final_assignment: final_state.labeled_assignments(),
    })
}
