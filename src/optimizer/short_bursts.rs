use std::collections::BTreeMap;

use rand::{Rng, SeedableRng, rngs::StdRng};
use tracing::{debug, info};

use crate::{
    chain::{Acceptance, ChainStats, MarkovChain},
    constraints::Constraints,
    error::{Error, Result},
    optimizer::ScoreFunction,
    partition::Partition,
    proposal::Proposal,
};

/// Short-burst hill climbing over the chain.
///
/// Each burst runs the chain for `burst_length` steps; the next burst restarts from
/// the best state the previous burst emitted (ties to the first seen). The best state
/// of the whole run, the initial one included, is tracked separately.
#[derive(Clone, Debug)]
pub struct ShortBursts<P: Proposal + Clone> {
    proposal: P,
    constraints: Constraints,
    score: ScoreFunction,
    burst_length: usize,
    num_bursts: usize,
    maximize: bool,
    seed: u64,
}

/// Output of a short-burst or tilted run.
#[derive(Clone, Debug)]
pub struct ShortBurstResult {
    /// Score of every emitted state, `num_bursts * burst_length` long.
    pub scores: Vec<f64>,
    /// Score of each burst's restart state, one per burst.
    pub burst_bests: Vec<f64>,
    /// Score of the initial partition.
    pub initial_score: f64,
    /// Best partition seen over the whole run.
    pub best: Partition,
    pub best_score: f64,
    pub stats: ChainStats,
}

impl ShortBurstResult {
    /// Per-district values of the named tallies at the best state.
    /// Names that are not tally updaters are skipped.
    pub fn best_tallies<'a>(&self, names: impl IntoIterator<Item = &'a str>) -> BTreeMap<String, Vec<f64>> {
        names.into_iter()
            .filter_map(|name| Some((name.to_string(), self.best.tally(name)?.to_vec())))
            .collect()
    }
}

impl<P: Proposal + Clone> ShortBursts<P> {
    pub fn new(
        proposal: P,
        constraints: Constraints,
        score: ScoreFunction,
        burst_length: usize,
        num_bursts: usize,
        maximize: bool,
        seed: u64,
    ) -> Result<Self> {
        if burst_length == 0 {
            return Err(Error::config("burst_length", burst_length, "must be at least 1"));
        }
        if num_bursts == 0 {
            return Err(Error::config("num_bursts", num_bursts, "must be at least 1"));
        }
        Ok(Self { proposal, constraints, score, burst_length, num_bursts, maximize, seed })
    }

    #[inline] pub fn burst_length(&self) -> usize { self.burst_length }

    #[inline] pub fn num_bursts(&self) -> usize { self.num_bursts }

    #[inline] pub fn score_function(&self) -> &ScoreFunction { &self.score }

    /// True if `a` is strictly better than `b` in the optimization direction.
    #[inline]
    fn improves(&self, a: f64, b: f64) -> bool {
        if self.maximize { a > b } else { a < b }
    }

    /// Run all bursts from `initial`.
    pub fn run(&self, initial: &Partition) -> Result<ShortBurstResult> {
        self.score.validate(initial)?;

        let mut seeds = StdRng::seed_from_u64(self.seed);
        let initial_score = self.score.score(initial);
        let mut scores = Vec::with_capacity(self.burst_length * self.num_bursts);
        let mut burst_bests = Vec::with_capacity(self.num_bursts);
        let mut stats = ChainStats::default();

        let mut best = (initial.clone(), initial_score);
        let mut start = initial.clone();

        for burst in 0..self.num_bursts {
            let mut chain = MarkovChain::new(
                self.proposal.clone(),
                self.constraints.clone(),
                Acceptance::Always,
                start,
                self.burst_length,
                seeds.random::<u64>(),
            )?.with_log_every(0);

            let mut burst_best: Option<(Partition, f64)> = None;
            for state in chain.by_ref() {
                let score = self.score.score(&state);
                scores.push(score);
                if burst_best.as_ref().is_none_or(|(_, s)| self.improves(score, *s)) {
                    burst_best = Some((state, score));
                }
            }
            stats = stats.merged(chain.stats());

            let Some((burst_state, burst_score)) = burst_best else {
                unreachable!("a burst emits at least one state")
            };
            if self.improves(burst_score, best.1) {
                best = (burst_state.clone(), burst_score);
            }
            debug!(burst, burst_score, best_score = best.1, "burst finished");

            burst_bests.push(burst_score);
            start = burst_state;
        }

        info!(score = %self.score, initial_score, best_score = best.1, bursts = self.num_bursts, "short bursts finished");

        Ok(ShortBurstResult { scores, burst_bests, initial_score, best: best.0, best_score: best.1, stats })
    }

    /// A single chain of `num_bursts * burst_length` steps whose acceptance is tilted
    /// toward better scores: worse candidates pass with `probability`.
    pub fn tilted_run(&self, initial: &Partition, probability: f64) -> Result<ShortBurstResult> {
        let acceptance = Acceptance::tilted(probability, self.score.clone(), self.maximize)?;
        let total_steps = self.burst_length * self.num_bursts;
        let mut chain = MarkovChain::new(
            self.proposal.clone(),
            self.constraints.clone(),
            acceptance,
            initial.clone(),
            total_steps,
            self.seed,
        )?;

        let initial_score = self.score.score(initial);
        let mut scores = Vec::with_capacity(total_steps);
        let mut best = (initial.clone(), initial_score);
        for state in chain.by_ref() {
            let score = self.score.score(&state);
            scores.push(score);
            if self.improves(score, best.1) {
                best = (state, score);
            }
        }

        info!(score = %self.score, probability, initial_score, best_score = best.1, "tilted run finished");

        Ok(ShortBurstResult {
            scores,
            burst_bests: vec![best.1],
            initial_score,
            best: best.0,
            best_score: best.1,
            stats: chain.stats(),
        })
    }
}
