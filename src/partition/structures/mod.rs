mod edge_set;
mod partition_set;

pub use edge_set::EdgeSet;
pub(crate) use partition_set::PartitionSet;
