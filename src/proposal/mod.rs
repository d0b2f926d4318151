//! Proposal functions: given the current partition, suggest a successor.

mod recom;
mod spanning_tree;

use rand::Rng;

use crate::{error::Result, partition::Partition};

pub use recom::Recom;

/// A source of candidate partitions for the chain.
pub trait Proposal {
    /// Check that the proposal can operate on `partition` at all.
    fn validate(&self, _partition: &Partition) -> Result<()> { Ok(()) }

    /// Suggest a successor of `partition`.
    /// A recoverable error means no candidate was found this step.
    fn propose<R: Rng>(&self, partition: &Partition, rng: &mut R) -> Result<Partition>;
}
