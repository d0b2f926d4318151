#![doc = "ReCom Markov chain ensembles and short-burst optimization for redistricting plans"]
pub mod chain;
pub mod config;
pub mod constraints;
mod error;
pub mod graph;
pub mod optimizer;
pub mod partition;
pub mod proposal;
pub mod summary;
pub mod sweep;
pub mod updaters;

#[doc(inline)]
pub use error::{Error, Result};

#[doc(inline)]
pub use graph::{DualGraph, GraphRecords};

#[doc(inline)]
pub use partition::{Flip, Partition};

#[doc(inline)]
pub use updaters::{Election, Updater, Updaters};

#[doc(inline)]
pub use proposal::{Proposal, Recom};

#[doc(inline)]
pub use constraints::{Constraint, Constraints};

#[doc(inline)]
pub use chain::{Acceptance, ChainObserver, MarkovChain};

#[doc(inline)]
pub use optimizer::{ScoreFunction, ScoreKind, ShortBurstResult, ShortBursts};
