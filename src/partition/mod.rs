mod contiguity;
mod partition;
mod population;
mod structures;

pub use partition::{Flip, Partition};
pub use structures::EdgeSet;
pub(crate) use structures::PartitionSet;
