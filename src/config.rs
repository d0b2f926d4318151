//! Serializable run configuration.
//!
//! Defaults reproduce the Ohio congressional analysis: 2% population tolerance,
//! two spanning trees per pair, 20,000 steps, and a threshold by burst-length grid
//! for the short-burst search.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::{
    constraints::{Constraint, Constraints},
    error::{Error, Result},
    graph::DualGraph,
    optimizer::{ScoreFunction, ScoreKind, ShortBursts},
    partition::Partition,
    proposal::Recom,
    summary::Summarizer,
    updaters::{Election, Updater, Updaters},
};

/// Name of the population tally every configured run registers.
pub const POPULATION: &str = "population";

/// Add `updater` under `name` unless the name already holds a different updater.
fn register(updaters: &mut Updaters, field: &str, name: &str, updater: Updater) -> Result<()> {
    match updaters.get(name) {
        Some(existing) if *existing == updater => Ok(()),
        Some(_) => Err(Error::config(field, name, "reserved updater name")),
        None => {
            updaters.insert(name, updater);
            Ok(())
        }
    }
}

/// A party and the node attribute holding its votes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartyConfig {
    pub party: String,
    pub column: String,
}

/// An election updater.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElectionConfig {
    /// Updater name, also used in summaries.
    pub name: String,
    /// Parties in order; the first two are compared by the bias metrics.
    pub parties: Vec<PartyConfig>,
}

impl ElectionConfig {
    pub fn validate(&self) -> Result<()> {
        if self.parties.len() < 2 {
            return Err(Error::config(format!("elections.{}", self.name), self.parties.len(), "need at least two parties"));
        }
        Ok(())
    }

    pub fn to_election(&self) -> Election {
        Election::new(&self.name, self.parties.iter().map(|p| (p.party.as_str(), p.column.as_str())))
    }
}

/// Parameters of a plain ensemble run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainConfig {
    /// Node attribute holding the initial district of each node.
    #[serde(default = "default_assignment")]
    pub assignment: String,
    /// Node attribute balanced by the proposal and constraint.
    #[serde(default = "default_pop_col")]
    pub pop_col: String,
    /// Allowed fractional deviation from the ideal district population.
    #[serde(default = "default_epsilon")]
    pub epsilon: f64,
    /// Spanning trees drawn per district pair before giving up.
    #[serde(default = "default_node_repeats")]
    pub node_repeats: usize,
    /// District pairs tried per step; values above 1 enable pair reselection.
    #[serde(default = "default_max_pair_attempts")]
    pub max_pair_attempts: usize,
    #[serde(default = "default_total_steps")]
    pub total_steps: usize,
    #[serde(default)]
    pub seed: u64,
    /// Progress log interval in steps.
    #[serde(default = "default_log_every")]
    pub log_every: usize,
    /// Extra tally updaters, named after their attribute.
    #[serde(default)]
    pub tallies: Vec<String>,
    #[serde(default)]
    pub elections: Vec<ElectionConfig>,
    /// Per-step values to record.
    #[serde(default)]
    pub summary: Option<Summarizer>,
}

fn default_assignment() -> String { "CONG_DIST".to_string() }

fn default_pop_col() -> String { "TOTPOP".to_string() }

fn default_epsilon() -> f64 { 0.02 }

fn default_node_repeats() -> usize { 2 }

fn default_max_pair_attempts() -> usize { 1 }

fn default_total_steps() -> usize { 20_000 }

fn default_log_every() -> usize { 1000 }

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            assignment: default_assignment(),
            pop_col: default_pop_col(),
            epsilon: default_epsilon(),
            node_repeats: default_node_repeats(),
            max_pair_attempts: default_max_pair_attempts(),
            total_steps: default_total_steps(),
            seed: 0,
            log_every: default_log_every(),
            tallies: Vec::new(),
            elections: Vec::new(),
            summary: None,
        }
    }
}

/// Everything needed to start a chain.
#[derive(Debug, Clone)]
pub struct ChainSetup {
    pub initial: Partition,
    pub proposal: Recom,
    pub constraints: Constraints,
}

impl ChainConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.epsilon.is_finite() && self.epsilon > 0.0) {
            return Err(Error::config("epsilon", self.epsilon, "must be greater than 0"));
        }
        if self.node_repeats == 0 {
            return Err(Error::config("node_repeats", self.node_repeats, "must be at least 1"));
        }
        if self.max_pair_attempts == 0 {
            return Err(Error::config("max_pair_attempts", self.max_pair_attempts, "must be at least 1"));
        }
        self.elections.iter().try_for_each(ElectionConfig::validate)?;
        self.updaters().map(|_| ())
    }

    /// Updater table: the population tally, extra tallies, then elections.
    /// Fails if a name is reserved or already taken by a different updater.
    pub fn updaters(&self) -> Result<Updaters> {
        let mut updaters = Updaters::new().with(POPULATION, Updater::tally(&self.pop_col));
        for series in &self.tallies {
            register(&mut updaters, "tallies", series, Updater::tally(series))?;
        }
        for election in &self.elections {
            register(&mut updaters, "elections", &election.name, Updater::election(election.to_election()))?;
        }
        Ok(updaters)
    }

    /// Summary fields, defaulting to population and every election.
    pub fn summarizer(&self) -> Summarizer {
        self.summary.clone().unwrap_or_else(|| Summarizer {
            population: Some(POPULATION.to_string()),
            elections: self.elections.iter().map(|e| e.name.clone()).collect(),
            majority: None,
        })
    }

    /// Build the initial partition, proposal, and population constraint on `graph`.
    pub fn setup(&self, graph: Arc<DualGraph>, updaters: Updaters) -> Result<ChainSetup> {
        self.validate()?;
        let initial = Partition::from_attribute(graph, &self.assignment, updaters)?;
        let ideal = initial.ideal_population(POPULATION)
            .ok_or_else(|| Error::config("pop_col", &self.pop_col, "population tally missing"))?;

        let proposal = Recom::new(&self.pop_col, ideal, self.epsilon, self.node_repeats)?
            .with_pair_reselection(self.max_pair_attempts);
        let constraints = Constraints::new()
            .with(Constraint::within_percent_of_ideal(&initial, POPULATION, self.epsilon)?);

        Ok(ChainSetup { initial, proposal, constraints })
    }
}

/// Parameters of a short-burst search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShortBurstConfig {
    #[serde(flatten)]
    pub chain: ChainConfig,
    #[serde(default = "default_score")]
    pub score: ScoreKind,
    /// Minority population attribute, e.g. BVAP.
    #[serde(default = "default_minority")]
    pub minority: String,
    /// Attribute the minority share is taken over, e.g. VAP.
    #[serde(default = "default_minority_total")]
    pub minority_total: String,
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    #[serde(default = "default_burst_length")]
    pub burst_length: usize,
    /// Defaults to `total_steps / burst_length`.
    #[serde(default)]
    pub num_bursts: Option<usize>,
    #[serde(default = "default_maximize")]
    pub maximize: bool,
    /// When set, run one tilted chain with this acceptance probability instead of bursts.
    #[serde(default)]
    pub tilt_probability: Option<f64>,
}

fn default_score() -> ScoreKind { ScoreKind::NumOpportunityDistricts }

fn default_minority() -> String { "BVAP".to_string() }

fn default_minority_total() -> String { "VAP".to_string() }

fn default_threshold() -> f64 { 0.5 }

fn default_burst_length() -> usize { 10 }

fn default_maximize() -> bool { true }

impl Default for ShortBurstConfig {
    fn default() -> Self {
        Self {
            chain: ChainConfig::default(),
            score: default_score(),
            minority: default_minority(),
            minority_total: default_minority_total(),
            threshold: default_threshold(),
            burst_length: default_burst_length(),
            num_bursts: None,
            maximize: default_maximize(),
            tilt_probability: None,
        }
    }
}

impl ShortBurstConfig {
    /// Name of the share updater the score reads, e.g. `BVAP_perc`.
    pub fn share_name(&self) -> String { format!("{}_perc", self.minority) }

    pub fn num_bursts(&self) -> usize {
        self.num_bursts.unwrap_or(self.chain.total_steps / self.burst_length.max(1))
    }

    pub fn validate(&self) -> Result<()> {
        self.chain.validate()?;
        if self.burst_length == 0 {
            return Err(Error::config("burst_length", self.burst_length, "must be at least 1"));
        }
        if self.num_bursts() == 0 {
            return Err(Error::config("num_bursts", self.num_bursts(), "must be at least 1"));
        }
        if let Some(p) = self.tilt_probability {
            if !(0.0..=1.0).contains(&p) {
                return Err(Error::config("tilt_probability", p, "must lie in [0, 1]"));
            }
        }
        ScoreFunction::new(self.score, self.share_name(), self.threshold)?;
        self.updaters().map(|_| ())
    }

    /// Chain updaters plus the minority and total tallies and their share.
    pub fn updaters(&self) -> Result<Updaters> {
        let mut updaters = self.chain.updaters()?;
        register(&mut updaters, "minority", &self.minority, Updater::tally(&self.minority))?;
        register(&mut updaters, "minority_total", &self.minority_total, Updater::tally(&self.minority_total))?;
        register(&mut updaters, "minority", &self.share_name(), Updater::share(&self.minority, &self.minority_total))?;
        Ok(updaters)
    }

    /// Build the optimizer and its starting partition on `graph`.
    pub fn setup(&self, graph: Arc<DualGraph>) -> Result<(ShortBursts<Recom>, Partition)> {
        self.validate()?;
        let ChainSetup { initial, proposal, constraints } = self.chain.setup(graph, self.updaters()?)?;
        let score = ScoreFunction::new(self.score, self.share_name(), self.threshold)?;
        let bursts = ShortBursts::new(
            proposal,
            constraints,
            score,
            self.burst_length,
            self.num_bursts(),
            self.maximize,
            self.chain.seed,
        )?;
        Ok((bursts, initial))
    }
}

/// A grid of short-burst runs over thresholds and burst lengths.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepConfig {
    #[serde(flatten)]
    pub base: ShortBurstConfig,
    #[serde(default = "default_thresholds")]
    pub thresholds: Vec<f64>,
    #[serde(default = "default_burst_lengths")]
    pub burst_lengths: Vec<usize>,
    /// Upper bound on concurrently running tasks.
    #[serde(default = "default_max_workers")]
    pub max_workers: usize,
}

fn default_thresholds() -> Vec<f64> { vec![0.4, 0.45, 0.5] }

fn default_burst_lengths() -> Vec<usize> { vec![5, 10, 15] }

fn default_max_workers() -> usize { 20 }

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            base: ShortBurstConfig::default(),
            thresholds: default_thresholds(),
            burst_lengths: default_burst_lengths(),
            max_workers: default_max_workers(),
        }
    }
}

impl SweepConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_workers == 0 {
            return Err(Error::config("max_workers", self.max_workers, "must be at least 1"));
        }
        if self.thresholds.is_empty() || self.burst_lengths.is_empty() {
            return Err(Error::config("thresholds", self.thresholds.len() * self.burst_lengths.len(), "sweep has no tasks"));
        }
        self.tasks().iter().try_for_each(ShortBurstConfig::validate)
    }

    /// One config per (threshold, burst length), thresholds outermost.
    /// Each task gets its own seed and `total_steps / burst_length` bursts.
    pub fn tasks(&self) -> Vec<ShortBurstConfig> {
        self.thresholds.iter()
            .flat_map(|&threshold| self.burst_lengths.iter().map(move |&burst_length| (threshold, burst_length)))
            .enumerate()
            .map(|(i, (threshold, burst_length))| {
                let mut task = self.base.clone();
                task.threshold = threshold;
                task.burst_length = burst_length;
                task.num_bursts = None;
                task.chain.seed = self.base.chain.seed.wrapping_add(i as u64);
                task
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_analysis() {
        let config: ChainConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.assignment, "CONG_DIST");
        assert_eq!(config.epsilon, 0.02);
        assert_eq!(config.node_repeats, 2);
        assert_eq!(config.total_steps, 20_000);
        assert!(config.validate().is_ok());

        let sweep: SweepConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(sweep.thresholds, vec![0.4, 0.45, 0.5]);
        assert_eq!(sweep.burst_lengths, vec![5, 10, 15]);
        assert_eq!(sweep.base.num_bursts(), 2_000);
    }

    #[test]
    fn flattened_fields_parse() {
        let config: ShortBurstConfig = serde_json::from_str(r#"{
            "epsilon": 0.05,
            "total_steps": 50,
            "burst_length": 10,
            "score": "reward_partial_district",
            "elections": [{"name": "pres", "parties": [{"party": "Dem", "column": "D"}, {"party": "Rep", "column": "R"}]}]
        }"#).unwrap();
        assert_eq!(config.chain.epsilon, 0.05);
        assert_eq!(config.num_bursts(), 5);
        assert_eq!(config.score, ScoreKind::RewardPartialDistrict);
        assert_eq!(config.share_name(), "BVAP_perc");

        let names = config.updaters().unwrap().iter().map(|(name, _)| name.to_string()).collect::<Vec<_>>();
        assert_eq!(names, vec!["cut_edges", "population", "pres", "BVAP", "VAP", "BVAP_perc"]);
    }

    #[test]
    fn invalid_values_are_rejected() {
        let mut config = ChainConfig { epsilon: 0.0, ..Default::default() };
        assert!(matches!(config.validate(), Err(Error::InvalidConfiguration { .. })));
        config.epsilon = 0.02;
        config.elections.push(ElectionConfig {
            name: "solo".into(),
            parties: vec![PartyConfig { party: "Dem".into(), column: "D".into() }],
        });
        assert!(config.validate().is_err());

        let bursts = ShortBurstConfig { burst_length: 0, ..Default::default() };
        assert!(bursts.validate().is_err());
        let bursts = ShortBurstConfig { threshold: 1.5, ..Default::default() };
        assert!(bursts.validate().is_err());
    }

    #[test]
    fn reserved_updater_names_are_rejected() {
        let config: ChainConfig = serde_json::from_str(r#"{"tallies": ["cut_edges"]}"#).unwrap();
        let err = config.updaters().unwrap_err();
        assert_eq!(err, Error::config("tallies", "cut_edges", "reserved updater name"));
        assert!(config.validate().is_err());

        let config = ChainConfig { tallies: vec![POPULATION.into()], ..Default::default() };
        assert!(matches!(config.validate(), Err(Error::InvalidConfiguration { field, .. }) if field == "tallies"));

        let bursts = ShortBurstConfig { minority_total: "cut_edges".into(), ..Default::default() };
        assert!(matches!(bursts.validate(), Err(Error::InvalidConfiguration { field, .. }) if field == "minority_total"));

        // Repeating an identical tally is harmless.
        let bursts = ShortBurstConfig { chain: ChainConfig { tallies: vec!["BVAP".into()], ..Default::default() }, ..Default::default() };
        assert!(bursts.validate().is_ok());
    }

    #[test]
    fn sweep_expands_grid_with_distinct_seeds() {
        let sweep = SweepConfig { base: ShortBurstConfig { chain: ChainConfig { seed: 100, ..Default::default() }, ..Default::default() }, ..Default::default() };
        let tasks = sweep.tasks();
        assert_eq!(tasks.len(), 9);
        assert_eq!((tasks[0].threshold, tasks[0].burst_length), (0.4, 5));
        assert_eq!((tasks[4].threshold, tasks[4].burst_length), (0.45, 10));
        assert_eq!(tasks[8].num_bursts(), 20_000 / 15);
        assert_eq!(tasks.iter().map(|t| t.chain.seed).collect::<Vec<_>>(), (100..109).collect::<Vec<_>>());
        assert!(sweep.validate().is_ok());
    }
}
