use anyhow::{Context, Result};
use tracing::{info, warn};

use recomchain::{config::SweepConfig, sweep::run_sweep};

use crate::commands::{io, short_burst};

pub fn run(_cli: &crate::cli::Cli, args: &crate::cli::SweepArgs) -> Result<()> {
    let out_dir = args.output.clone().unwrap_or(".".into());

    let mut config: SweepConfig = io::read_config(args.run.config.as_deref())?;
    if let Some(seed) = args.run.seed { config.base.chain.seed = seed }
    if let Some(steps) = args.run.steps { config.base.chain.total_steps = steps }
    if let Some(workers) = args.workers { config.max_workers = workers }
    config.validate()?;

    std::fs::create_dir_all(&out_dir).with_context(|| format!("creating output directory {}", out_dir.display()))?;

    info!(graph = %args.run.graph.display(), "loading graph");
    let graph = io::read_graph(&args.run.graph)?;
    let tasks = config.tasks();
    info!(tasks = tasks.len(), workers = config.max_workers, "running sweep");

    let results = run_sweep(&tasks, config.max_workers, |task| {
        let output = short_burst::search(graph.clone(), task)?;
        let path = out_dir.join(format!("{}.json", output.params));
        io::write_json(&path, &output)?;
        info!(params = %output.params, best_score = output.best_score, "task finished");
        anyhow::Ok(())
    })?;

    let failures = results.into_iter().filter_map(|r| r.err()).collect::<Vec<_>>();
    for err in &failures {
        warn!("task failed: {err:#}");
    }
    match failures.into_iter().next() {
        Some(err) => Err(err.context("sweep finished with failed tasks")),
        None => Ok(()),
    }
}
