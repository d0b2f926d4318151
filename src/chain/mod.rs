//! The Markov chain driver.

mod accept;
mod chain;

pub use accept::Acceptance;
pub use chain::{ChainObserver, ChainStats, MarkovChain, StepOutcome};
