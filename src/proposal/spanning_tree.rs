use rand::{Rng, seq::IndexedRandom};
use smallvec::SmallVec;

use crate::graph::DualGraph;

/// Disjoint-set forest with path halving and union by rank.
#[derive(Debug)]
pub(crate) struct UnionFind {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl UnionFind {
    pub(crate) fn new(size: usize) -> Self {
        Self { parent: (0..size).collect(), rank: vec![0; size] }
    }

    pub(crate) fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    /// Merge the sets containing `a` and `b`. Returns false if they were already joined.
    pub(crate) fn union(&mut self, a: usize, b: usize) -> bool {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra == rb { return false }

        match self.rank[ra].cmp(&self.rank[rb]) {
            std::cmp::Ordering::Less => self.parent[ra] = rb,
            std::cmp::Ordering::Greater => self.parent[rb] = ra,
            std::cmp::Ordering::Equal => {
                self.parent[rb] = ra;
                self.rank[ra] += 1;
            }
        }
        true
    }
}

/// Cut-friendly spanning tree representation.
///
/// Arrays are indexed by graph node; nodes outside the tree hold `None`.
/// Every subtree occupies a contiguous slice of the preorder, so the weight on
/// either side of a tree edge is a difference of two prefix sums.
#[derive(Debug)]
pub(crate) struct SpanningTree {
    root: usize,
    parent: Vec<Option<usize>>, // parent[root] = root
    order: Vec<usize>,          // preorder over tree nodes
    index: Vec<Option<usize>>,  // preorder position
    size: Vec<Option<usize>>,   // subtree sizes
}

impl SpanningTree {
    /// Random spanning tree of the subgraph induced by `nodes`: give every induced edge an
    /// independent uniform weight and take the minimum spanning tree (Kruskal).
    /// Returns None if the induced subgraph is disconnected.
    pub(crate) fn random(graph: &DualGraph, nodes: &[usize], rng: &mut impl Rng) -> Option<Self> {
        assert!(!nodes.is_empty(), "cannot build spanning tree over no nodes");

        let mut in_region = vec![false; graph.node_count()];
        nodes.iter().for_each(|&u| in_region[u] = true);

        // Induced edges in a fixed order, each paired with a random weight.
        let mut edges = nodes.iter()
            .flat_map(|&u| graph.neighbors(u).filter(move |&v| u < v).map(move |v| (u, v)))
            .filter(|&(_, v)| in_region[v])
            .map(|(u, v)| (rng.random::<f64>(), u, v))
            .collect::<Vec<_>>();
        edges.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut components = UnionFind::new(graph.node_count());
        let mut children = vec![SmallVec::<[usize; 4]>::new(); graph.node_count()];
        let mut adjacent = vec![SmallVec::<[usize; 4]>::new(); graph.node_count()];
        let mut tree_edges = 0;
        for &(_, u, v) in &edges {
            if components.union(u, v) {
                adjacent[u].push(v);
                adjacent[v].push(u);
                tree_edges += 1;
            }
        }
        if tree_edges + 1 != nodes.len() { return None }

        // Orient the tree away from a random root.
        let &root = nodes.choose(rng)?;
        let mut parent = vec![None; graph.node_count()];
        parent[root] = Some(root);
        let mut stack = vec![root];
        while let Some(u) = stack.pop() {
            for &v in &adjacent[u] {
                if parent[v].is_none() {
                    parent[v] = Some(u);
                    children[u].push(v);
                    stack.push(v);
                }
            }
        }

        let mut order = Vec::with_capacity(nodes.len());
        let mut index = vec![None; graph.node_count()];
        let mut size = vec![None; graph.node_count()];

        // Iterative DFS preorder from the root, sizes filled on exit.
        let mut stack = vec![(root, false)];
        while let Some((i, entered)) = stack.pop() {
            if !entered {
                index[i] = Some(order.len());
                order.push(i);
                stack.push((i, true));
                for &u in children[i].iter().rev() {
                    stack.push((u, false));
                }
            } else {
                size[i] = Some(1 + children[i].iter().filter_map(|&u| size[u]).sum::<usize>());
            }
        }

        Some(Self { root, parent, order, index, size })
    }

    #[inline] pub(crate) fn root(&self) -> usize { self.root }

    #[inline] pub(crate) fn len(&self) -> usize { self.order.len() }

    #[inline] pub(crate) fn in_tree(&self, node: usize) -> bool { self.parent[node].is_some() }

    /// Subtree slice for `node` (contiguous in `order`), or None if `node` not in tree.
    #[inline]
    pub(crate) fn subtree_slice(&self, node: usize) -> Option<&[usize]> {
        let index = self.index[node]?;
        let size = self.size[node]?;
        Some(&self.order[index..index + size])
    }

    /// Every non-root node `u` such that cutting `(parent[u], u)` leaves both sides with a
    /// weight inside `[lower, upper]`.
    pub(crate) fn balanced_cuts(&self, weight: impl Fn(usize) -> f64, lower: f64, upper: f64) -> Vec<usize> {
        let mut prefix = Vec::with_capacity(self.order.len() + 1);
        prefix.push(0.0);
        for &u in &self.order {
            let last = prefix[prefix.len() - 1];
            prefix.push(last + weight(u));
        }
        let total = prefix[prefix.len() - 1];
        let balanced = |w: f64| lower <= w && w <= upper;

        self.order[1..].iter()
            .copied()
            .filter(|&u| {
                let (Some(index), Some(size)) = (self.index[u], self.size[u]) else { return false };
                let sub = prefix[index + size] - prefix[index];
                balanced(sub) && balanced(total - sub)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::graph::WeightMatrix;

    fn grid(width: usize, height: usize) -> DualGraph {
        let n = width * height;
        let mut edges = Vec::new();
        for r in 0..height {
            for c in 0..width {
                let i = r * width + c;
                if c + 1 < width { edges.push((i, i + 1)) }
                if r + 1 < height { edges.push((i, i + width)) }
            }
        }
        let weights = WeightMatrix::new(n, BTreeMap::from([("TOTPOP".to_string(), vec![1; n])]), BTreeMap::new());
        DualGraph::new((0..n).map(|i| i.to_string()).collect(), &edges, weights).unwrap()
    }

    #[test]
    fn union_find_joins_sets() {
        let mut uf = UnionFind::new(5);
        assert!(uf.union(0, 1));
        assert!(uf.union(3, 4));
        assert!(!uf.union(1, 0));
        assert!(uf.union(1, 4));
        assert_eq!(uf.find(0), uf.find(3));
        assert_ne!(uf.find(0), uf.find(2));
    }

    #[test]
    fn spans_the_region() {
        let graph = grid(4, 4);
        let nodes = vec![0, 1, 2, 4, 5, 6, 8, 9, 10];
        let mut rng = StdRng::seed_from_u64(7);
        let tree = SpanningTree::random(&graph, &nodes, &mut rng).unwrap();

        assert_eq!(tree.len(), nodes.len());
        assert!(nodes.iter().all(|&u| tree.in_tree(u)));
        assert!(!tree.in_tree(3));
        assert_eq!(tree.subtree_slice(tree.root()).unwrap().len(), nodes.len());

        // Every parent link is a graph edge.
        for &u in &nodes {
            let p = tree.parent[u].unwrap();
            assert!(p == u || graph.neighbors(u).any(|v| v == p));
        }
    }

    #[test]
    fn disconnected_region_has_no_tree() {
        let graph = grid(3, 1);
        let mut rng = StdRng::seed_from_u64(1);
        assert!(SpanningTree::random(&graph, &[0, 2], &mut rng).is_none());
    }

    #[test]
    fn finds_only_balanced_cuts() {
        let graph = grid(4, 1);
        let mut rng = StdRng::seed_from_u64(3);
        let tree = SpanningTree::random(&graph, &[0, 1, 2, 3], &mut rng).unwrap();

        let cuts = tree.balanced_cuts(|_| 10.0, 18.0, 22.0);
        assert_eq!(cuts.len(), 1);
        let mut half = tree.subtree_slice(cuts[0]).unwrap().to_vec();
        half.sort_unstable();
        assert!(half == vec![0, 1] || half == vec![2, 3]);

        assert_eq!(tree.balanced_cuts(|_| 10.0, 0.0, 40.0).len(), 3);
    }

    #[test]
    fn seeded_trees_are_reproducible() {
        let graph = grid(5, 5);
        let nodes = graph.nodes().collect::<Vec<_>>();
        let a = SpanningTree::random(&graph, &nodes, &mut StdRng::seed_from_u64(11)).unwrap();
        let b = SpanningTree::random(&graph, &nodes, &mut StdRng::seed_from_u64(11)).unwrap();
        assert_eq!(a.order, b.order);
        assert_eq!(a.parent, b.parent);
    }
}
