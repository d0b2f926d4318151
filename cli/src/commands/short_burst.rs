use std::{collections::BTreeMap, sync::Arc};

use anyhow::Result;
use serde::Serialize;
use tracing::info;

use recomchain::{DualGraph, chain::ChainStats, config::ShortBurstConfig};

use crate::commands::io;

/// Result of one short-burst search, ready to write out.
#[derive(Serialize)]
pub(crate) struct SearchOutput {
    pub params: String,
    pub config: ShortBurstConfig,
    pub scores: Vec<f64>,
    pub burst_bests: Vec<f64>,
    pub initial_score: f64,
    pub best_score: f64,
    pub stats: ChainStats,
    /// Minority and total tallies at the best plan.
    pub best_tallies: BTreeMap<String, Vec<f64>>,
    pub best_assignment: Vec<(String, u32)>,
}

/// File stem describing a search's parameters.
pub(crate) fn params_name(config: &ShortBurstConfig) -> String {
    format!(
        "{}opt_{}_{}_sbl{}_score{}_{}",
        config.minority, config.chain.epsilon, config.chain.total_steps, config.burst_length, config.score, config.threshold,
    )
}

/// Run the search described by `config`.
pub(crate) fn search(graph: Arc<DualGraph>, config: &ShortBurstConfig) -> recomchain::Result<SearchOutput> {
    let (bursts, initial) = config.setup(graph)?;
    info!(
        score = %bursts.score_function(),
        burst_length = bursts.burst_length(),
        num_bursts = bursts.num_bursts(),
        "running short bursts"
    );

    let result = match config.tilt_probability {
        Some(probability) => bursts.tilted_run(&initial, probability)?,
        None => bursts.run(&initial)?,
    };

    Ok(SearchOutput {
        params: params_name(config),
        config: config.clone(),
        best_tallies: result.best_tallies([config.minority.as_str(), config.minority_total.as_str()]),
        best_assignment: result.best.labeled_assignments().into_iter().map(|(id, label)| (id.to_string(), label)).collect(),
        scores: result.scores,
        burst_bests: result.burst_bests,
        initial_score: result.initial_score,
        best_score: result.best_score,
        stats: result.stats,
    })
}

pub fn run(_cli: &crate::cli::Cli, args: &crate::cli::ShortBurstArgs) -> Result<()> {
    let out_path = args.output.clone().unwrap_or("./short_burst.json".into());

    let mut config: ShortBurstConfig = io::read_config(args.run.config.as_deref())?;
    if let Some(seed) = args.run.seed { config.chain.seed = seed }
    if let Some(steps) = args.run.steps { config.chain.total_steps = steps }

    info!(graph = %args.run.graph.display(), "loading graph");
    let graph = io::read_graph(&args.run.graph)?;
    let output = search(graph, &config)?;

    info!(best_score = output.best_score, path = %out_path.display(), "writing result");
    io::write_json(&out_path, &output)
}
