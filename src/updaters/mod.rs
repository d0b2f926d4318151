//! Derived values attached to a partition.
//!
//! Each updater is a named entry in a table. An entry declares the node
//! attributes it reads and knows two rules: a full computation from the
//! assignment, and an incremental rule from the previous value plus the nodes
//! that changed district. The partition invokes every entry uniformly on
//! construction and on each transition.

pub(crate) mod cut_edges;
mod election;
pub mod metrics;
mod tally;

use std::sync::Arc;

use ahash::AHashMap;

use crate::{
    error::{Error, Result},
    graph::DualGraph,
    partition::{EdgeSet, Flip},
};

pub use election::{Election, ElectionResults};
pub use tally::Shares;

/// Name of the built-in cut-edge updater, present in every table.
pub const CUT_EDGES: &str = "cut_edges";

/// A derived-value computation.
#[derive(Clone, Debug, PartialEq)]
pub enum Updater {
    /// Set of edges crossing district boundaries.
    CutEdges,
    /// Sum of a node attribute per district.
    Tally { series: String },
    /// Ratio of two attribute sums per district.
    Share { numerator: String, denominator: String },
    /// Per-party vote sums per district.
    Election(Arc<Election>),
}

/// The value an `Updater` produces for one partition.
#[derive(Clone, Debug, PartialEq)]
pub enum UpdaterValue {
    CutEdges(EdgeSet),
    Tally(Vec<f64>),
    Share(Shares),
    Election(ElectionResults),
}

impl Updater {
    pub fn tally(series: impl Into<String>) -> Self { Self::Tally { series: series.into() } }

    pub fn share(numerator: impl Into<String>, denominator: impl Into<String>) -> Self {
        Self::Share { numerator: numerator.into(), denominator: denominator.into() }
    }

    pub fn election(election: Election) -> Self { Self::Election(Arc::new(election)) }

    /// Node attributes this updater reads.
    pub fn dependencies(&self) -> Vec<&str> {
        match self {
            Self::CutEdges => vec![],
            Self::Tally { series } => vec![series.as_str()],
            Self::Share { numerator, denominator } => vec![numerator.as_str(), denominator.as_str()],
            Self::Election(election) => election.columns().iter().map(String::as_str).collect(),
        }
    }

    /// Compute this updater's value for `assignments`.
    /// With `previous = Some((value, flips))` the value is derived incrementally from the
    /// predecessor partition's value; otherwise it is computed from scratch.
    pub(crate) fn evaluate(&self,
        graph: &DualGraph,
        assignments: &[u32],
        num_districts: usize,
        previous: Option<(&UpdaterValue, &[Flip])>,
    ) -> UpdaterValue {
        let column = |series: &str| graph.node_weights().column(series)
            .unwrap_or_else(|| panic!("updater series '{series}' missing from graph"));

        match (self, previous) {
            (Self::CutEdges, Some((UpdaterValue::CutEdges(prev), flips))) =>
                UpdaterValue::CutEdges(cut_edges::update(graph, assignments, prev, flips)),
            (Self::CutEdges, _) =>
                UpdaterValue::CutEdges(cut_edges::compute(graph, assignments)),

            (Self::Tally { series }, Some((UpdaterValue::Tally(prev), flips))) =>
                UpdaterValue::Tally(tally::retally(graph, column(series.as_str()), prev, flips)),
            (Self::Tally { series }, _) =>
                UpdaterValue::Tally(tally::tally(graph, column(series.as_str()), assignments, num_districts)),

            (Self::Share { numerator, denominator }, Some((UpdaterValue::Share(prev), flips))) =>
                UpdaterValue::Share(Shares::new(
                    tally::retally(graph, column(numerator.as_str()), prev.numerator(), flips),
                    tally::retally(graph, column(denominator.as_str()), prev.denominator(), flips),
                )),
            (Self::Share { numerator, denominator }, _) =>
                UpdaterValue::Share(Shares::new(
                    tally::tally(graph, column(numerator.as_str()), assignments, num_districts),
                    tally::tally(graph, column(denominator.as_str()), assignments, num_districts),
                )),

            (Self::Election(election), Some((UpdaterValue::Election(prev), flips))) =>
                UpdaterValue::Election(election.retabulate(graph, prev, flips)),
            (Self::Election(election), _) =>
                UpdaterValue::Election(election.tabulate(graph, assignments, num_districts)),
        }
    }
}

/// Table of named updaters. Always holds the built-in `cut_edges` entry first.
#[derive(Clone, Debug)]
pub struct Updaters {
    entries: Vec<(String, Updater)>,
    index: AHashMap<String, usize>,
}

impl Default for Updaters {
    fn default() -> Self {
        Self {
            entries: vec![(CUT_EDGES.to_string(), Updater::CutEdges)],
            index: AHashMap::from_iter([(CUT_EDGES.to_string(), 0)]),
        }
    }
}

impl Updaters {
    pub fn new() -> Self { Self::default() }

    /// Builder form of `insert`.
    pub fn with(mut self, name: impl Into<String>, updater: Updater) -> Self {
        self.insert(name, updater);
        self
    }

    /// Register an updater under `name`, replacing any previous entry of that name.
    pub fn insert(&mut self, name: impl Into<String>, updater: Updater) {
        let name = name.into();
        assert!(name != CUT_EDGES || updater == Updater::CutEdges, "'{CUT_EDGES}' is reserved for the cut-edge updater");
        match self.index.get(&name) {
            Some(&i) => self.entries[i].1 = updater,
            None => {
                self.index.insert(name.clone(), self.entries.len());
                self.entries.push((name, updater));
            }
        }
    }

    /// Number of registered updaters (including `cut_edges`).
    #[inline] pub fn len(&self) -> usize { self.entries.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    /// Position of a named updater in the table.
    #[inline] pub fn position(&self, name: &str) -> Option<usize> { self.index.get(name).copied() }

    /// Look up an updater by name.
    pub fn get(&self, name: &str) -> Option<&Updater> {
        self.position(name).map(|i| &self.entries[i].1)
    }

    /// Iterate over `(name, updater)` entries in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Updater)> + '_ {
        self.entries.iter().map(|(name, updater)| (name.as_str(), updater))
    }

    /// Check that every declared dependency exists on the graph.
    pub(crate) fn validate(&self, graph: &DualGraph) -> Result<()> {
        for (name, updater) in self.iter() {
            if let Some(missing) = updater.dependencies().into_iter().find(|s| !graph.node_weights().contains(s)) {
                return Err(Error::config(format!("updaters.{name}"), missing, "node attribute not found on graph"));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_starts_with_cut_edges() {
        let updaters = Updaters::new();
        assert_eq!(updaters.len(), 1);
        assert_eq!(updaters.position(CUT_EDGES), Some(0));
        assert_eq!(updaters.get(CUT_EDGES), Some(&Updater::CutEdges));
    }

    #[test]
    fn insert_replaces_by_name() {
        let updaters = Updaters::new()
            .with("population", Updater::tally("TOTPOP"))
            .with("bvap", Updater::share("BVAP", "VAP"))
            .with("population", Updater::tally("POP20"));

        assert_eq!(updaters.len(), 3);
        assert_eq!(updaters.get("population"), Some(&Updater::tally("POP20")));
        assert_eq!(updaters.iter().map(|(n, _)| n).collect::<Vec<_>>(), vec![CUT_EDGES, "population", "bvap"]);
    }

    #[test]
    fn dependencies_are_declared() {
        let election = Updater::election(Election::new("sen", [("Dem", "USS16D"), ("Rep", "USS16R")]));
        assert_eq!(election.dependencies(), vec!["USS16D", "USS16R"]);
        assert_eq!(Updater::share("BVAP", "VAP").dependencies(), vec!["BVAP", "VAP"]);
        assert!(Updater::CutEdges.dependencies().is_empty());
    }

    #[test]
    #[should_panic(expected = "reserved")]
    fn cut_edges_name_is_reserved() {
        Updaters::new().with(CUT_EDGES, Updater::tally("TOTPOP"));
    }
}
