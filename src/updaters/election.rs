use std::sync::Arc;

use ndarray::Array2;

use crate::{
    graph::DualGraph,
    partition::Flip,
    updaters::metrics,
};

/// A named contest: each party's votes are read from one node attribute.
#[derive(Clone, Debug, PartialEq)]
pub struct Election {
    name: String,
    parties: Vec<String>,
    columns: Vec<String>,
}

impl Election {
    /// Create an election from `(party, vote attribute)` pairs, in party order.
    /// The first two parties are the ones compared by the bias metrics.
    pub fn new<P, C>(name: impl Into<String>, parties: impl IntoIterator<Item = (P, C)>) -> Self
    where P: Into<String>, C: Into<String> {
        let (parties, columns): (Vec<String>, Vec<String>) = parties.into_iter()
            .map(|(p, c)| (p.into(), c.into()))
            .unzip();
        assert!(!parties.is_empty(), "election must have at least one party");
        Self { name: name.into(), parties, columns }
    }

    #[inline] pub fn name(&self) -> &str { &self.name }

    #[inline] pub fn parties(&self) -> &[String] { &self.parties }

    /// Node attributes this election reads.
    #[inline] pub fn columns(&self) -> &[String] { &self.columns }

    /// Full tabulation of votes per (party, district).
    pub(crate) fn tabulate(self: &Arc<Self>, graph: &DualGraph, assignments: &[u32], num_districts: usize) -> ElectionResults {
        let weights = graph.node_weights();
        let mut votes = Array2::<f64>::zeros((self.parties.len(), num_districts));
        for (p, series) in self.columns.iter().enumerate() {
            let column = weights.column(series).expect("election column validated at partition construction");
            for node in graph.nodes() {
                votes[[p, assignments[node] as usize]] += weights.get(column, node);
            }
        }
        ElectionResults { election: Arc::clone(self), votes }
    }

    /// Incremental update: move each flipped node's votes between districts.
    pub(crate) fn retabulate(&self, graph: &DualGraph, previous: &ElectionResults, flips: &[Flip]) -> ElectionResults {
        let weights = graph.node_weights();
        let mut results = previous.clone();
        for (p, series) in self.columns.iter().enumerate() {
            let column = weights.column(series).expect("election column validated at partition construction");
            for flip in flips {
                let v = weights.get(column, flip.node);
                results.votes[[p, flip.from as usize]] -= v;
                results.votes[[p, flip.to as usize]] += v;
            }
        }
        results
    }
}

/// District-level results of an election for one partition.
#[derive(Clone, Debug, PartialEq)]
pub struct ElectionResults {
    election: Arc<Election>,
    votes: Array2<f64>, // (parties, districts)
}

impl ElectionResults {
    #[inline] pub fn election(&self) -> &Election { &self.election }

    #[inline] pub fn num_districts(&self) -> usize { self.votes.ncols() }

    fn party_index(&self, party: &str) -> usize {
        self.election.parties.iter().position(|p| p == party)
            .unwrap_or_else(|| panic!("election '{}' has no party '{party}'", self.election.name))
    }

    /// Votes for `party` in each district.
    pub fn totals(&self, party: &str) -> Vec<f64> {
        self.votes.row(self.party_index(party)).to_vec()
    }

    /// Total votes cast in a district across all parties.
    pub fn district_total(&self, district: usize) -> f64 { self.votes.column(district).sum() }

    /// Total votes cast statewide.
    pub fn total_votes(&self) -> f64 { self.votes.sum() }

    /// Vote share of `party` in a district (0 when no votes were cast).
    pub fn percent(&self, party: &str, district: usize) -> f64 {
        let total = self.district_total(district);
        if total == 0.0 { 0.0 } else { self.votes[[self.party_index(party), district]] / total }
    }

    /// Vote share of `party` in each district.
    pub fn percents(&self, party: &str) -> Vec<f64> {
        (0..self.num_districts()).map(|d| self.percent(party, d)).collect()
    }

    /// Party with strictly the most votes in a district, or None on a tie.
    pub fn winner(&self, district: usize) -> Option<&str> {
        let column = self.votes.column(district);
        let (best, &max) = column.iter().enumerate().max_by(|a, b| a.1.total_cmp(b.1))?;
        let tied = column.iter().enumerate().any(|(p, &v)| p != best && v == max);
        (!tied).then(|| self.election.parties[best].as_str())
    }

    /// Number of districts `party` wins outright.
    pub fn wins(&self, party: &str) -> usize {
        (0..self.num_districts()).filter(|&d| self.winner(d) == Some(party)).count()
    }

    /// Median minus mean of the first party's district vote shares.
    pub fn mean_median(&self) -> f64 {
        metrics::mean_median(&self.percents(&self.election.parties[0]))
    }

    /// Efficiency gap between the first two parties.
    pub fn efficiency_gap(&self) -> f64 {
        assert!(self.votes.nrows() >= 2, "efficiency gap needs two parties");
        metrics::efficiency_gap(&self.votes.row(0).to_vec(), &self.votes.row(1).to_vec())
    }
}
