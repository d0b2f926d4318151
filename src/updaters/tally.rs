use serde::Serialize;

use crate::{graph::{Column, DualGraph}, partition::Flip};

/// Sum of one node attribute per district.
pub(crate) fn tally(graph: &DualGraph, column: Column, assignments: &[u32], num_districts: usize) -> Vec<f64> {
    let weights = graph.node_weights();
    let mut totals = vec![0.0; num_districts];
    for node in graph.nodes() {
        totals[assignments[node] as usize] += weights.get(column, node);
    }
    totals
}

/// Move each flipped node's weight from its old district to its new one.
pub(crate) fn retally(graph: &DualGraph, column: Column, previous: &[f64], flips: &[Flip]) -> Vec<f64> {
    let weights = graph.node_weights();
    let mut totals = previous.to_vec();
    for flip in flips {
        let w = weights.get(column, flip.node);
        totals[flip.from as usize] -= w;
        totals[flip.to as usize] += w;
    }
    totals
}

/// Per-district ratio of two tallies, e.g. minority voting-age population over total VAP.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Shares {
    numerator: Vec<f64>,
    denominator: Vec<f64>,
}

impl Shares {
    pub(crate) fn new(numerator: Vec<f64>, denominator: Vec<f64>) -> Self {
        assert!(numerator.len() == denominator.len(), "share tallies must cover the same districts");
        Self { numerator, denominator }
    }

    #[inline] pub fn numerator(&self) -> &[f64] { &self.numerator }

    #[inline] pub fn denominator(&self) -> &[f64] { &self.denominator }

    /// Share in one district; 0 when the denominator is 0.
    #[inline]
    pub fn share(&self, district: usize) -> f64 {
        let total = self.denominator[district];
        if total == 0.0 { 0.0 } else { self.numerator[district] / total }
    }

    /// Share in every district.
    pub fn shares(&self) -> Vec<f64> {
        (0..self.numerator.len()).map(|d| self.share(d)).collect()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::graph::WeightMatrix;

    fn make_graph() -> DualGraph {
        let weights = WeightMatrix::new(
            4,
            BTreeMap::from([("TOTPOP".to_string(), vec![10, 20, 30, 40])]),
            BTreeMap::new(),
        );
        DualGraph::new((0..4).map(|i| i.to_string()).collect(), &[(0, 1), (1, 2), (2, 3)], weights).unwrap()
    }

    #[test]
    fn tally_and_retally_agree() {
        let graph = make_graph();
        let column = graph.node_weights().column("TOTPOP").unwrap();

        let before = tally(&graph, column, &[0, 0, 1, 1], 2);
        assert_eq!(before, vec![30.0, 70.0]);

        let after = retally(&graph, column, &before, &[Flip { node: 2, from: 1, to: 0 }]);
        assert_eq!(after, tally(&graph, column, &[0, 0, 0, 1], 2));
        assert_eq!(after, vec![60.0, 40.0]);
    }

    #[test]
    fn shares_guard_empty_denominator() {
        let shares = Shares::new(vec![5.0, 0.0], vec![10.0, 0.0]);
        assert_eq!(shares.shares(), vec![0.5, 0.0]);
    }
}
