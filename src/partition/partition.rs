use std::sync::Arc;

use crate::{
    error::{Error, Result},
    graph::DualGraph,
    partition::{EdgeSet, PartitionSet},
    updaters::{ElectionResults, Shares, UpdaterValue, Updaters},
};

/// A single node's change of district.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Flip {
    pub node: usize,
    pub from: u32,
    pub to: u32,
}

/// An assignment of every graph node to one of `k` districts, plus the derived values
/// of its updaters.
///
/// Districts are dense indices `0..k`; the external label each one was created from is
/// kept for reporting. A partition never changes once built: `flip` returns a successor.
#[derive(Clone, Debug)]
pub struct Partition {
    graph: Arc<DualGraph>,
    updaters: Arc<Updaters>,
    labels: Arc<[u32]>,     // labels[d] = external label of district d
    parts: PartitionSet,    // district <-> nodes
    values: Vec<UpdaterValue>, // parallel to `updaters`
}

impl Partition {
    /// Build a partition from one external district label per node.
    /// Labels may be any integers; they are mapped to districts in ascending order.
    pub fn new(graph: impl Into<Arc<DualGraph>>, labels: &[u32], updaters: Updaters) -> Result<Self> {
        let graph: Arc<DualGraph> = graph.into();
        if labels.len() != graph.node_count() {
            return Err(Error::config("assignment", labels.len(), format!("expected one label per node ({})", graph.node_count())));
        }

        let mut distinct = labels.to_vec();
        distinct.sort_unstable();
        distinct.dedup();
        if distinct.len() < 2 {
            return Err(Error::config("num_districts", distinct.len(), "need at least two districts"));
        }

        updaters.validate(&graph)?;

        let assignments = labels.iter()
            .map(|label| distinct.binary_search(label).map(|d| d as u32))
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|_| Error::config("assignment", "?", "label lookup failed"))?;

        let parts = PartitionSet::from_assignments(distinct.len(), &assignments);
        let mut partition = Self {
            graph,
            updaters: Arc::new(updaters),
            labels: distinct.into(),
            parts,
            values: Vec::new(),
        };
        partition.values = partition.compute_values();
        Ok(partition)
    }

    /// Build a partition whose initial assignment is read from a node attribute,
    /// e.g. an enacted congressional district column.
    pub fn from_attribute(graph: impl Into<Arc<DualGraph>>, key: &str, updaters: Updaters) -> Result<Self> {
        let graph: Arc<DualGraph> = graph.into();
        let column = graph.node_weights().column(key)
            .ok_or_else(|| Error::config("assignment", key, "node attribute not found on graph"))?;

        let labels = graph.nodes()
            .map(|node| {
                let value = graph.node_weights().get(column, node);
                if value < 0.0 || value.fract() != 0.0 || value > u32::MAX as f64 {
                    Err(Error::config("assignment", value, format!("district label of node '{}' is not a non-negative integer", graph.node_id(node))))
                } else {
                    Ok(value as u32)
                }
            })
            .collect::<Result<Vec<_>>>()?;

        Self::new(graph, &labels, updaters)
    }

    /// Get the number of districts.
    #[inline] pub fn num_districts(&self) -> usize { self.parts.num_sets() }

    /// Get the number of nodes in the underlying graph.
    #[inline] pub fn num_nodes(&self) -> usize { self.graph.node_count() }

    /// Get a reference to the underlying graph.
    #[inline] pub fn graph(&self) -> &DualGraph { &self.graph }

    /// Get the updater table.
    #[inline] pub fn updaters(&self) -> &Updaters { &self.updaters }

    /// Get the district of a given node.
    #[inline] pub fn assignment(&self, node: usize) -> u32 { self.parts.find(node) }

    /// Get the district of every node.
    #[inline] pub fn assignments(&self) -> &[u32] { self.parts.assignments() }

    /// External label of a district.
    #[inline] pub fn label(&self, district: u32) -> u32 { self.labels[district as usize] }

    /// External labels, indexed by district.
    #[inline] pub fn labels(&self) -> &[u32] { &self.labels }

    /// Nodes currently in a district.
    #[inline] pub fn part(&self, district: u32) -> &[usize] { self.parts.get(district as usize) }

    /// Iterator over each district's nodes.
    #[inline] pub fn parts(&self) -> impl Iterator<Item = &[usize]> + '_ { self.parts.iter_sets() }

    /// `(node id, external label)` for every node, in node order.
    pub fn labeled_assignments(&self) -> Vec<(&str, u32)> {
        self.graph.nodes()
            .map(|node| (self.graph.node_id(node), self.label(self.assignment(node))))
            .collect()
    }

    /// Derived value of a named updater.
    pub fn value(&self, name: &str) -> Option<&UpdaterValue> {
        self.updaters.position(name).map(|i| &self.values[i])
    }

    /// Edges whose endpoints lie in different districts.
    pub fn cut_edges(&self) -> &EdgeSet {
        match &self.values[0] {
            UpdaterValue::CutEdges(cut) => cut,
            other => unreachable!("updater table must start with cut edges, found {other:?}"),
        }
    }

    /// Per-district sums of a named `Tally` updater.
    pub fn tally(&self, name: &str) -> Option<&[f64]> {
        match self.value(name)? {
            UpdaterValue::Tally(totals) => Some(totals),
            _ => None,
        }
    }

    /// Per-district ratios of a named `Share` updater.
    pub fn shares(&self, name: &str) -> Option<&Shares> {
        match self.value(name)? {
            UpdaterValue::Share(shares) => Some(shares),
            _ => None,
        }
    }

    /// Results of a named `Election` updater.
    pub fn election(&self, name: &str) -> Option<&ElectionResults> {
        match self.value(name)? {
            UpdaterValue::Election(results) => Some(results),
            _ => None,
        }
    }

    /// Apply a set of node flips, returning the successor partition.
    /// Updater values are derived incrementally from this partition's values.
    pub fn flip(&self, flips: &[Flip]) -> Self {
        let mut parts = self.parts.clone();
        for flip in flips {
            assert!((flip.to as usize) < self.num_districts(), "district {} out of range [0, {})", flip.to, self.num_districts());
            debug_assert!(self.assignment(flip.node) == flip.from, "flip of node {} does not start from its district", flip.node);
            parts.move_to(flip.node, flip.to);
        }
        debug_assert!(parts.iter_sets().all(|set| !set.is_empty()), "flip emptied a district");

        let values = self.updaters.iter().zip(&self.values)
            .map(|((_, updater), value)| {
                updater.evaluate(&self.graph, parts.assignments(), self.num_districts(), Some((value, flips)))
            })
            .collect();

        Self {
            graph: Arc::clone(&self.graph),
            updaters: Arc::clone(&self.updaters),
            labels: Arc::clone(&self.labels),
            parts,
            values,
        }
    }

    /// Same assignment with every updater value recomputed from scratch.
    pub fn recomputed(&self) -> Self {
        let mut partition = self.clone();
        partition.values = partition.compute_values();
        partition
    }

    fn compute_values(&self) -> Vec<UpdaterValue> {
        self.updaters.iter()
            .map(|(_, updater)| updater.evaluate(&self.graph, self.assignments(), self.num_districts(), None))
            .collect()
    }
}

/// Two partitions are equal when they share a graph and assign every node alike.
impl PartialEq for Partition {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.graph, &other.graph)
            && self.labels == other.labels
            && self.assignments() == other.assignments()
    }
}
