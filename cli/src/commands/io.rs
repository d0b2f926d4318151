use std::{fs::File, io::{BufReader, BufWriter}, path::Path, sync::Arc};

use anyhow::{Context, Result};
use serde::{Serialize, de::DeserializeOwned};

use recomchain::{DualGraph, GraphRecords};

/// Read a dual graph from a JSON records file.
pub(crate) fn read_graph(path: &Path) -> Result<Arc<DualGraph>> {
    let file = File::open(path).with_context(|| format!("opening graph file {}", path.display()))?;
    let records: GraphRecords = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("parsing graph file {}", path.display()))?;
    let graph = DualGraph::from_records(&records)
        .with_context(|| format!("building graph from {}", path.display()))?;
    Ok(Arc::new(graph))
}

/// Read a JSON config file, or fall back to defaults.
pub(crate) fn read_config<T: DeserializeOwned + Default>(path: Option<&Path>) -> Result<T> {
    let Some(path) = path else { return Ok(T::default()) };
    let file = File::open(path).with_context(|| format!("opening config file {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("parsing config file {}", path.display()))
}

/// Write a value as pretty JSON.
pub(crate) fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating output file {}", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), value)
        .with_context(|| format!("writing output file {}", path.display()))
}
