use rand::{SeedableRng, rngs::StdRng};
use serde::Serialize;
use tracing::{debug, info, trace, warn};

use crate::{
    chain::Acceptance,
    constraints::Constraints,
    error::{Error, Result},
    partition::Partition,
    proposal::Proposal,
};

/// What happened on one chain step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepOutcome {
    /// The candidate became the new state.
    Accepted,
    /// The proposal found no candidate; the state was kept.
    Exhausted,
    /// A constraint rejected the candidate; the state was kept.
    Rejected,
    /// The acceptance rule declined the candidate; the state was kept.
    Declined,
}

/// Running counts of step outcomes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ChainStats {
    pub accepted: usize,
    pub exhausted: usize,
    pub rejected: usize,
    pub declined: usize,
}

impl ChainStats {
    #[inline] pub fn steps(&self) -> usize { self.accepted + self.exhausted + self.rejected + self.declined }

    /// Number of steps that kept the previous state.
    #[inline] pub fn self_loops(&self) -> usize { self.steps() - self.accepted }

    pub(crate) fn record(&mut self, outcome: StepOutcome) {
        match outcome {
            StepOutcome::Accepted => self.accepted += 1,
            StepOutcome::Exhausted => self.exhausted += 1,
            StepOutcome::Rejected => self.rejected += 1,
            StepOutcome::Declined => self.declined += 1,
        }
    }

    /// Sum of two runs' counts.
    pub fn merged(self, other: Self) -> Self {
        Self {
            accepted: self.accepted + other.accepted,
            exhausted: self.exhausted + other.exhausted,
            rejected: self.rejected + other.rejected,
            declined: self.declined + other.declined,
        }
    }
}

/// Streaming consumer of chain states.
pub trait ChainObserver {
    /// Called once per step, after the transition, with the 0-based step index.
    fn observe(&mut self, step: usize, state: &Partition, outcome: StepOutcome);
}

impl<F> ChainObserver for F where F: FnMut(usize, &Partition, StepOutcome) {
    fn observe(&mut self, step: usize, state: &Partition, outcome: StepOutcome) { self(step, state, outcome) }
}

/// A Markov chain over partitions.
///
/// Each step proposes a candidate, checks the constraints, and applies the acceptance
/// rule. Any failure along the way is a self-loop: the current state is emitted again.
/// The chain therefore yields exactly `total_steps` states, and the sequence depends
/// only on the inputs and the seed.
#[derive(Debug)]
pub struct MarkovChain<P: Proposal> {
    proposal: P,
    constraints: Constraints,
    acceptance: Acceptance,
    state: Partition,
    total_steps: usize,
    step: usize,
    rng: StdRng,
    stats: ChainStats,
    log_every: usize,
}

impl<P: Proposal> MarkovChain<P> {
    /// Build a chain from an initial state that must itself satisfy every constraint.
    pub fn new(
        proposal: P,
        constraints: Constraints,
        acceptance: Acceptance,
        initial_state: Partition,
        total_steps: usize,
        seed: u64,
    ) -> Result<Self> {
        proposal.validate(&initial_state)?;
        acceptance.validate(&initial_state)?;
        if let Err(err) = constraints.check(&initial_state) {
            return Err(Error::config("initial_state", err, "initial partition must satisfy the constraints"));
        }

        Ok(Self {
            proposal,
            constraints,
            acceptance,
            state: initial_state,
            total_steps,
            step: 0,
            rng: StdRng::seed_from_u64(seed),
            stats: ChainStats::default(),
            log_every: 1000,
        })
    }

    /// Emit a progress line every `log_every` steps (0 disables it).
    pub fn with_log_every(mut self, log_every: usize) -> Self {
        self.log_every = log_every;
        self
    }

    /// The most recently emitted state (the initial state before the first step).
    #[inline] pub fn state(&self) -> &Partition { &self.state }

    /// Number of steps taken so far.
    #[inline] pub fn step_count(&self) -> usize { self.step }

    #[inline] pub fn total_steps(&self) -> usize { self.total_steps }

    #[inline] pub fn stats(&self) -> ChainStats { self.stats }

    /// Run to completion, handing each state to `observer`. Returns the final state.
    pub fn run<O: ChainObserver + ?Sized>(mut self, observer: &mut O) -> Partition {
        while self.step < self.total_steps {
            let outcome = self.advance();
            observer.observe(self.step - 1, &self.state, outcome);
        }
        self.state
    }

    /// Perform one transition.
    fn advance(&mut self) -> StepOutcome {
        let outcome = match self.proposal.propose(&self.state, &mut self.rng) {
            Err(err) => {
                if !err.is_recoverable() { warn!(step = self.step, %err, "proposal failed") }
                StepOutcome::Exhausted
            }
            Ok(candidate) => {
                if self.constraints.check(&candidate).is_err() {
                    StepOutcome::Rejected
                } else if !self.acceptance.accept(&self.state, &candidate, &mut self.rng) {
                    StepOutcome::Declined
                } else {
                    self.state = candidate;
                    StepOutcome::Accepted
                }
            }
        };

        self.stats.record(outcome);
        self.step += 1;
        trace!(step = self.step, ?outcome, "chain step");

        if self.log_every > 0 && self.step % self.log_every == 0 {
            debug!(
                step = self.step,
                total = self.total_steps,
                accepted = self.stats.accepted,
                cut_edges = self.state.cut_edges().len(),
                "chain progress"
            );
        }
        if self.step == self.total_steps {
            info!(
                steps = self.step,
                accepted = self.stats.accepted,
                exhausted = self.stats.exhausted,
                rejected = self.stats.rejected,
                declined = self.stats.declined,
                "chain finished"
            );
        }

        outcome
    }
}

impl<P: Proposal> Iterator for MarkovChain<P> {
    type Item = Partition;

    fn next(&mut self) -> Option<Self::Item> {
        if self.step >= self.total_steps { return None }
        self.advance();
        Some(self.state.clone())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.total_steps - self.step;
        (remaining, Some(remaining))
    }
}

impl<P: Proposal> ExactSizeIterator for MarkovChain<P> {}
