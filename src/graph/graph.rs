use std::collections::{HashMap, VecDeque};

use crate::{
    error::{Error, Result},
    graph::WeightMatrix,
};

/// An immutable dual graph in compressed sparse row format.
///
/// Nodes are geographic units addressed by dense indices; every undirected
/// adjacency also has a dense edge id so partitions can track cut edges in flat arrays.
#[derive(Debug, Default)]
pub struct DualGraph {
    ids: Vec<String>,
    index: HashMap<String, usize>,
    offsets: Vec<u32>,
    neighbors: Vec<u32>,
    edge_ids: Vec<u32>,         // edge id of each half-edge, parallel to `neighbors`
    endpoints: Vec<(u32, u32)>, // endpoints[e] = (u, v) with u < v
    node_weights: WeightMatrix,
}

impl DualGraph {
    /// Construct a graph from node ids, undirected edges between node indices, and node weights.
    /// Duplicate edges are merged. Fails on duplicate ids, self-loops, out-of-range endpoints,
    /// or a graph that is empty or not connected.
    pub fn new(ids: Vec<String>, edges: &[(usize, usize)], node_weights: WeightMatrix) -> Result<Self> {
        let num_nodes = ids.len();
        if num_nodes == 0 { return Err(Error::graph("graph has no nodes")) }
        if node_weights.num_rows() != num_nodes {
            return Err(Error::graph(format!("node weights have {} rows, expected {num_nodes}", node_weights.num_rows())));
        }

        let mut index = HashMap::with_capacity(num_nodes);
        for (i, id) in ids.iter().enumerate() {
            if index.insert(id.clone(), i).is_some() {
                return Err(Error::graph(format!("duplicate node id '{id}'")));
            }
        }

        // Normalize, validate, and deduplicate edges.
        let mut endpoints = Vec::with_capacity(edges.len());
        for &(u, v) in edges {
            if u >= num_nodes || v >= num_nodes {
                return Err(Error::graph(format!("edge ({u}, {v}) references a node outside 0..{num_nodes}")));
            }
            if u == v { return Err(Error::graph(format!("self-loop on node '{}'", ids[u]))) }
            endpoints.push((u.min(v) as u32, u.max(v) as u32));
        }
        endpoints.sort_unstable();
        endpoints.dedup();

        // Adjacency lists sorted by neighbor, carrying edge ids.
        let mut adjacency = vec![Vec::new(); num_nodes];
        for (edge, &(u, v)) in endpoints.iter().enumerate() {
            adjacency[u as usize].push((v, edge as u32));
            adjacency[v as usize].push((u, edge as u32));
        }
        adjacency.iter_mut().for_each(|list| list.sort_unstable());

        let graph = Self {
            offsets: std::iter::once(0u32).chain(
                adjacency.iter()
                    .map(|v| v.len() as u32)
                    .scan(0u32, |acc, len| {*acc += len; Some(*acc)})
            ).collect::<Vec<u32>>(),
            neighbors: adjacency.iter().flatten().map(|&(v, _)| v).collect(),
            edge_ids: adjacency.iter().flatten().map(|&(_, e)| e).collect(),
            ids,
            index,
            endpoints,
            node_weights,
        };

        if let Some(stranded) = graph.first_unreachable_node() {
            return Err(Error::graph(format!("graph is disconnected: node '{}' is unreachable", graph.ids[stranded])));
        }

        Ok(graph)
    }

    /// Get the number of nodes in the graph.
    #[inline] pub fn node_count(&self) -> usize { self.ids.len() }

    /// Get the number of undirected edges in the graph.
    #[inline] pub fn edge_count(&self) -> usize { self.endpoints.len() }

    /// Iterate over node indices.
    #[inline] pub fn nodes(&self) -> std::ops::Range<usize> { 0..self.node_count() }

    /// Stable external id of a node.
    #[inline] pub fn node_id(&self, node: usize) -> &str { &self.ids[node] }

    /// Index of the node with the given external id.
    #[inline] pub fn index_of(&self, id: &str) -> Option<usize> { self.index.get(id).copied() }

    /// Get a reference to the node weights matrix.
    #[inline] pub fn node_weights(&self) -> &WeightMatrix { &self.node_weights }

    /// Attribute value of a node, widened to f64.
    #[inline]
    pub fn attribute(&self, node: usize, key: &str) -> Option<f64> {
        self.node_weights.get_as_f64(key, node)
    }

    /// Get the range of half-edges for a given node.
    #[inline]
    fn range(&self, node: usize) -> std::ops::Range<usize> {
        self.offsets[node] as usize .. self.offsets[node + 1] as usize
    }

    /// Get the degree (number of neighbors) of a given node.
    #[inline] pub fn degree(&self, node: usize) -> usize { self.range(node).len() }

    /// Get an iterator over the neighbors of a given node.
    #[inline]
    pub fn neighbors(&self, node: usize) -> impl Iterator<Item = usize> + '_ {
        self.range(node).map(move |i| self.neighbors[i] as usize)
    }

    /// Get an iterator over (neighbor, edge id) pairs of a given node.
    #[inline]
    pub fn incident_edges(&self, node: usize) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.range(node).map(move |i| (self.neighbors[i] as usize, self.edge_ids[i] as usize))
    }

    /// Endpoints `(u, v)` of an edge, with `u < v`.
    #[inline]
    pub fn endpoints(&self, edge: usize) -> (usize, usize) {
        let (u, v) = self.endpoints[edge];
        (u as usize, v as usize)
    }

    /// Iterate over all undirected edges as `(edge id, u, v)`.
    #[inline]
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize, usize)> + '_ {
        self.endpoints.iter().enumerate().map(|(e, &(u, v))| (e, u as usize, v as usize))
    }

    /// Breadth-first search from node 0; returns a node it could not reach, if any.
    fn first_unreachable_node(&self) -> Option<usize> {
        let mut visited = vec![false; self.node_count()];
        visited[0] = true;
        let mut queue = VecDeque::from([0]);
        while let Some(u) = queue.pop_front() {
            for v in self.neighbors(u) {
                if !visited[v] { visited[v] = true; queue.push_back(v) }
            }
        }
        visited.iter().position(|&seen| !seen)
    }
}
