use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    graph::{DualGraph, WeightMatrix},
};

/// A node record as supplied by the loader: external id plus numeric attributes.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NodeRecord {
    pub id: String,
    #[serde(default)]
    pub attributes: BTreeMap<String, serde_json::Number>,
}

/// Serializable description of a dual graph: node records plus adjacency by id.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct GraphRecords {
    pub nodes: Vec<NodeRecord>,
    #[serde(default)]
    pub edges: Vec<(String, String)>,
}

impl DualGraph {
    /// Build a graph from loader records.
    /// Attributes whose values are integral on every node become i64 series, others f64.
    /// Every node must carry the same attribute keys.
    pub fn from_records(records: &GraphRecords) -> Result<Self> {
        let ids = records.nodes.iter().map(|n| n.id.clone()).collect::<Vec<_>>();
        let lookup = ids.iter().enumerate()
            .map(|(i, id)| (id.as_str(), i))
            .collect::<ahash::AHashMap<_, _>>();

        let edges = records.edges.iter()
            .map(|(a, b)| {
                let u = lookup.get(a.as_str()).ok_or_else(|| Error::graph(format!("edge references unknown node '{a}'")))?;
                let v = lookup.get(b.as_str()).ok_or_else(|| Error::graph(format!("edge references unknown node '{b}'")))?;
                Ok((*u, *v))
            })
            .collect::<Result<Vec<_>>>()?;

        let keys = records.nodes.iter()
            .flat_map(|n| n.attributes.keys().cloned())
            .collect::<BTreeSet<_>>();

        let mut weights_i64 = BTreeMap::new();
        let mut weights_f64 = BTreeMap::new();
        for key in keys {
            let column = records.nodes.iter()
                .map(|n| n.attributes.get(&key)
                    .ok_or_else(|| Error::graph(format!("node '{}' is missing attribute '{key}'", n.id))))
                .collect::<Result<Vec<_>>>()?;

            if column.iter().all(|v| v.is_i64()) {
                weights_i64.insert(key, column.iter().filter_map(|v| v.as_i64()).collect());
            } else {
                let values = column.iter()
                    .map(|v| v.as_f64().ok_or_else(|| Error::graph(format!("attribute '{key}' is not representable as f64"))))
                    .collect::<Result<Vec<_>>>()?;
                weights_f64.insert(key, values);
            }
        }

        let weights = WeightMatrix::new(ids.len(), weights_i64, weights_f64);
        DualGraph::new(ids, &edges, weights)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::WeightType;

    fn records(json: &str) -> GraphRecords { serde_json::from_str(json).unwrap() }

    #[test]
    fn builds_graph_from_json_records() {
        let graph = DualGraph::from_records(&records(r#"{
            "nodes": [
                {"id": "A", "attributes": {"TOTPOP": 10, "share": 0.5}},
                {"id": "B", "attributes": {"TOTPOP": 12, "share": 1}},
                {"id": "C", "attributes": {"TOTPOP": 8, "share": 0}}
            ],
            "edges": [["A", "B"], ["B", "C"]]
        }"#)).unwrap();

        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.node_weights().kind("TOTPOP"), Some(WeightType::I64));
        assert_eq!(graph.node_weights().kind("share"), Some(WeightType::F64));
        assert_eq!(graph.attribute(graph.index_of("B").unwrap(), "TOTPOP"), Some(12.0));
    }

    #[test]
    fn unknown_edge_endpoint_fails() {
        let err = DualGraph::from_records(&records(r#"{
            "nodes": [{"id": "A"}, {"id": "B"}],
            "edges": [["A", "Z"]]
        }"#)).unwrap_err();
        assert!(err.to_string().contains("unknown node 'Z'"));
    }

    #[test]
    fn missing_attribute_fails() {
        let err = DualGraph::from_records(&records(r#"{
            "nodes": [{"id": "A", "attributes": {"TOTPOP": 1}}, {"id": "B"}],
            "edges": [["A", "B"]]
        }"#)).unwrap_err();
        assert!(matches!(err, Error::GraphConstruction { .. }));
    }
}
