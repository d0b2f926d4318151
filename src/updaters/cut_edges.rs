use crate::{
    graph::DualGraph,
    partition::{EdgeSet, Flip},
};

/// Every edge whose endpoints lie in different districts.
pub(crate) fn compute(graph: &DualGraph, assignments: &[u32]) -> EdgeSet {
    EdgeSet::from_edges(
        graph.edge_count(),
        graph.edges()
            .filter(|&(_, u, v)| assignments[u] != assignments[v])
            .map(|(e, _, _)| e),
    )
}

/// Refresh only the edges incident to flipped nodes.
pub(crate) fn update(graph: &DualGraph, assignments: &[u32], previous: &EdgeSet, flips: &[Flip]) -> EdgeSet {
    let mut cut = previous.clone();
    for flip in flips {
        for (v, e) in graph.incident_edges(flip.node) {
            cut.set(e, assignments[flip.node] != assignments[v]);
        }
    }
    cut
}
