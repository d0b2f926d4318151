//! Per-step records of a chain run.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
    chain::{ChainObserver, ChainStats, StepOutcome},
    error::{Error, Result},
    partition::Partition,
    updaters::{ElectionResults, metrics},
};

/// Which derived values to record for each step.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Summarizer {
    /// Tally updater whose sorted district totals are recorded.
    #[serde(default)]
    pub population: Option<String>,
    /// Election updaters to summarize.
    #[serde(default)]
    pub elections: Vec<String>,
    /// Pair of tally updaters compared per district; ties count for the first.
    #[serde(default)]
    pub majority: Option<(String, String)>,
}

/// Summary of one election at one step.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ElectionSummary {
    /// Districts won by each party.
    pub wins: BTreeMap<String, usize>,
    /// First party's district vote shares, ascending.
    pub percents: Vec<f64>,
    pub mean_median: f64,
    pub efficiency_gap: f64,
}

impl From<&ElectionResults> for ElectionSummary {
    fn from(results: &ElectionResults) -> Self {
        let parties = results.election().parties();
        let mut percents = results.percents(&parties[0]);
        percents.sort_by(f64::total_cmp);
        Self {
            wins: parties.iter().map(|p| (p.clone(), results.wins(p))).collect(),
            percents,
            mean_median: results.mean_median(),
            efficiency_gap: results.efficiency_gap(),
        }
    }
}

/// Derived values of one emitted state.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StepSummary {
    pub step: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<StepOutcome>,
    pub cut_edges: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub populations: Vec<f64>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub elections: BTreeMap<String, ElectionSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub majority: Option<(usize, usize)>,
}

impl Summarizer {
    /// Check that every named updater exists with the right kind.
    pub fn validate(&self, partition: &Partition) -> Result<()> {
        if let Some(name) = &self.population {
            if partition.tally(name).is_none() {
                return Err(Error::config("summary.population", name, "no tally updater of that name"));
            }
        }
        for name in &self.elections {
            match partition.election(name) {
                Some(results) if results.election().parties().len() >= 2 => {}
                Some(_) => return Err(Error::config("summary.elections", name, "needs at least two parties")),
                None => return Err(Error::config("summary.elections", name, "no election updater of that name")),
            }
        }
        if let Some((first, second)) = &self.majority {
            if let Some(missing) = [first, second].into_iter().find(|name| partition.tally(name).is_none()) {
                return Err(Error::config("summary.majority", missing, "no tally updater of that name"));
            }
        }
        Ok(())
    }

    /// Summarize one state. Assumes `validate` passed on a partition with the same updaters.
    pub fn summarize(&self, step: usize, partition: &Partition, outcome: Option<StepOutcome>) -> StepSummary {
        StepSummary {
            step,
            outcome,
            cut_edges: partition.cut_edges().len(),
            populations: self.population.as_deref()
                .and_then(|name| partition.sorted_tally(name))
                .unwrap_or_default(),
            elections: self.elections.iter()
                .filter_map(|name| Some((name.clone(), ElectionSummary::from(partition.election(name)?))))
                .collect(),
            majority: self.majority.as_ref().and_then(|(first, second)| {
                Some(metrics::majority_counts(partition.tally(first)?, partition.tally(second)?))
            }),
        }
    }
}

/// Collects a `StepSummary` for every state of a run.
#[derive(Clone, Debug, Serialize)]
pub struct Ensemble {
    #[serde(skip)]
    summarizer: Summarizer,
    initial: StepSummary,
    steps: Vec<StepSummary>,
    stats: ChainStats,
}

impl Ensemble {
    /// Start an ensemble of `total_steps` states from `initial`.
    pub fn new(summarizer: Summarizer, initial: &Partition, total_steps: usize) -> Result<Self> {
        summarizer.validate(initial)?;
        let initial = summarizer.summarize(0, initial, None);
        Ok(Self { summarizer, initial, steps: Vec::with_capacity(total_steps), stats: ChainStats::default() })
    }

    /// Summary of the starting partition.
    #[inline] pub fn initial(&self) -> &StepSummary { &self.initial }

    #[inline] pub fn steps(&self) -> &[StepSummary] { &self.steps }

    #[inline] pub fn stats(&self) -> ChainStats { self.stats }

    #[inline] pub fn len(&self) -> usize { self.steps.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.steps.is_empty() }

    /// Cut-edge count of every step.
    pub fn cut_edges(&self) -> Vec<usize> {
        self.steps.iter().map(|s| s.cut_edges).collect()
    }

    /// Wins of `party` in `election` at every step.
    pub fn wins(&self, election: &str, party: &str) -> Vec<usize> {
        self.steps.iter()
            .map(|s| s.elections.get(election).and_then(|e| e.wins.get(party)).copied().unwrap_or(0))
            .collect()
    }
}

impl ChainObserver for Ensemble {
    fn observe(&mut self, step: usize, state: &Partition, outcome: StepOutcome) {
        self.stats.record(outcome);
        self.steps.push(self.summarizer.summarize(step, state, Some(outcome)));
    }
}
