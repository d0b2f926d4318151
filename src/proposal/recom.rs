use rand::{Rng, seq::IndexedRandom};
use tracing::trace;

use crate::{
    error::{Error, Result},
    partition::{Flip, Partition},
    proposal::{Proposal, spanning_tree::SpanningTree},
};

/// Recombination proposal: merge two adjacent districts and re-split the union along a
/// random spanning tree so that both halves are population balanced.
#[derive(Clone, Debug, PartialEq)]
pub struct Recom {
    pop_col: String,
    pop_target: f64,
    epsilon: f64,
    node_repeats: usize,
    max_pair_attempts: usize,
}

impl Recom {
    /// Create a proposal balancing `pop_col` to within `epsilon` of `pop_target`,
    /// drawing up to `node_repeats` spanning trees per district pair.
    pub fn new(pop_col: impl Into<String>, pop_target: f64, epsilon: f64, node_repeats: usize) -> Result<Self> {
        if !(pop_target.is_finite() && pop_target > 0.0) {
            return Err(Error::config("pop_target", pop_target, "must be a positive number"));
        }
        if !(epsilon.is_finite() && epsilon > 0.0) {
            return Err(Error::config("epsilon", epsilon, "must be greater than 0"));
        }
        if node_repeats == 0 {
            return Err(Error::config("node_repeats", node_repeats, "must be at least 1"));
        }

        Ok(Self {
            pop_col: pop_col.into(),
            pop_target,
            epsilon,
            node_repeats,
            max_pair_attempts: 1,
        })
    }

    /// After a pair's tree budget runs out, draw a fresh district pair, trying at most
    /// `max_pair_attempts` pairs in total.
    pub fn with_pair_reselection(mut self, max_pair_attempts: usize) -> Self {
        self.max_pair_attempts = max_pair_attempts.max(1);
        self
    }

    #[inline] pub fn pop_col(&self) -> &str { &self.pop_col }

    #[inline] pub fn pop_target(&self) -> f64 { self.pop_target }

    #[inline] pub fn epsilon(&self) -> f64 { self.epsilon }

    #[inline] pub fn node_repeats(&self) -> usize { self.node_repeats }

    /// Inclusive population bounds for a single district.
    #[inline]
    pub fn bounds(&self) -> (f64, f64) {
        ((1.0 - self.epsilon) * self.pop_target, (1.0 + self.epsilon) * self.pop_target)
    }
}

impl Proposal for Recom {
    fn validate(&self, partition: &Partition) -> Result<()> {
        if !partition.graph().node_weights().contains(&self.pop_col) {
            return Err(Error::config("pop_col", &self.pop_col, "node attribute not found on graph"));
        }
        Ok(())
    }

    fn propose<R: Rng>(&self, partition: &Partition, rng: &mut R) -> Result<Partition> {
        let graph = partition.graph();
        let weights = graph.node_weights();
        let column = weights.column(&self.pop_col)
            .ok_or_else(|| Error::config("pop_col", &self.pop_col, "node attribute not found on graph"))?;
        let (lower, upper) = self.bounds();

        let mut trees = 0;
        for _ in 0..self.max_pair_attempts {
            // A random cut edge picks an adjacent pair of districts.
            let Some(edge) = partition.cut_edges().choose(rng) else { break };
            let (u, v) = graph.endpoints(edge);
            let (a, b) = (partition.assignment(u), partition.assignment(v));

            let region = partition.part(a).iter()
                .chain(partition.part(b))
                .copied()
                .collect::<Vec<_>>();

            for _ in 0..self.node_repeats {
                trees += 1;
                let Some(tree) = SpanningTree::random(graph, &region, rng) else { continue };

                let cuts = tree.balanced_cuts(|node| weights.get(column, node), lower, upper);
                let Some(&cut) = cuts.choose(rng) else { continue };
                let Some(subtree) = tree.subtree_slice(cut) else { continue };

                let mut in_subtree = vec![false; graph.node_count()];
                subtree.iter().for_each(|&node| in_subtree[node] = true);

                let flips = region.iter()
                    .filter_map(|&node| {
                        let from = partition.assignment(node);
                        let to = if in_subtree[node] { a } else { b };
                        (from != to).then_some(Flip { node, from, to })
                    })
                    .collect::<Vec<_>>();

                trace!(a, b, trees, valid_cuts = cuts.len(), flipped = flips.len(), "recombined districts");
                return Ok(partition.flip(&flips));
            }
        }

        Err(Error::ProposalExhausted { attempts: trees })
    }
}
