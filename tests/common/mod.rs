#![allow(dead_code)]

use std::{collections::BTreeMap, sync::Arc};

use recomchain::{DualGraph, GraphRecords, graph::NodeRecord};

/// Build a graph from per-node attribute rows and index-based edges.
pub fn graph_from_rows(rows: Vec<BTreeMap<String, i64>>, edges: &[(usize, usize)]) -> Arc<DualGraph> {
    let nodes = rows.into_iter()
        .enumerate()
        .map(|(i, attrs)| NodeRecord {
            id: format!("n{i}"),
            attributes: attrs.into_iter().map(|(k, v)| (k, v.into())).collect(),
        })
        .collect();
    let edges = edges.iter().map(|&(u, v)| (format!("n{u}"), format!("n{v}"))).collect();
    Arc::new(DualGraph::from_records(&GraphRecords { nodes, edges }).unwrap())
}

/// Rook-adjacent grid edges, row-major node order.
pub fn grid_edges(width: usize, height: usize) -> Vec<(usize, usize)> {
    let mut edges = Vec::new();
    for r in 0..height {
        for c in 0..width {
            let i = r * width + c;
            if c + 1 < width { edges.push((i, i + 1)) }
            if r + 1 < height { edges.push((i, i + width)) }
        }
    }
    edges
}

/// A `width` x `height` grid whose districts are its columns (`CONG_DIST` = column + 1).
/// Every node has 10 people and 10 voting-age people; `bvap(row, col)` sets the minority count.
pub fn column_grid(width: usize, height: usize, bvap: impl Fn(usize, usize) -> i64) -> Arc<DualGraph> {
    let rows = (0..width * height)
        .map(|i| {
            let (r, c) = (i / width, i % width);
            BTreeMap::from([
                ("TOTPOP".to_string(), 10),
                ("VAP".to_string(), 10),
                ("BVAP".to_string(), bvap(r, c)),
                ("PRES16D".to_string(), 4 + ((r + c) % 3) as i64),
                ("PRES16R".to_string(), 6 - ((r * c) % 3) as i64),
                ("CONG_DIST".to_string(), c as i64 + 1),
            ])
        })
        .collect();
    graph_from_rows(rows, &grid_edges(width, height))
}
