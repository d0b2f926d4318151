mod graph;
mod io;
mod weights;

pub use graph::DualGraph;
pub use io::{GraphRecords, NodeRecord};
pub use weights::{Column, WeightMatrix, WeightType};
