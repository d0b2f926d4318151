use std::collections::{BTreeMap, HashMap};

use ndarray::Array2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WeightType { I64, F64 }

/// Resolved location of a named series inside a `WeightMatrix`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Column {
    kind: WeightType,
    index: usize,
}

/// Node weights stored as type-separated matrices, one row per node.
#[derive(Clone, Debug, Default)]
pub struct WeightMatrix {
    series: HashMap<String, Column>,
    i64: Array2<i64>, // (n, k_i)
    f64: Array2<f64>, // (n, k_f)
}

impl WeightMatrix {
    /// Build from per-series columns; every column must have `num_nodes` entries.
    pub(crate) fn new(num_nodes: usize,
        weights_i64: BTreeMap<String, Vec<i64>>,
        weights_f64: BTreeMap<String, Vec<f64>>,
    ) -> Self {
        let mut series = HashMap::with_capacity(weights_i64.len() + weights_f64.len());

        let mut i64 = Array2::<i64>::zeros((num_nodes, weights_i64.len()));
        for (index, (name, values)) in weights_i64.into_iter().enumerate() {
            assert!(values.len() == num_nodes, "series '{name}' must have {num_nodes} values");
            i64.column_mut(index).iter_mut().zip(values).for_each(|(cell, v)| *cell = v);
            series.insert(name, Column { kind: WeightType::I64, index });
        }

        let mut f64 = Array2::<f64>::zeros((num_nodes, weights_f64.len()));
        for (index, (name, values)) in weights_f64.into_iter().enumerate() {
            assert!(values.len() == num_nodes, "series '{name}' must have {num_nodes} values");
            assert!(!series.contains_key(&name), "series '{name}' defined twice");
            f64.column_mut(index).iter_mut().zip(values).for_each(|(cell, v)| *cell = v);
            series.insert(name, Column { kind: WeightType::F64, index });
        }

        Self { series, i64, f64 }
    }

    /// Number of rows (nodes).
    #[inline] pub fn num_rows(&self) -> usize { self.i64.nrows().max(self.f64.nrows()) }

    /// Check whether a series exists.
    #[inline] pub fn contains(&self, series: &str) -> bool { self.series.contains_key(series) }

    /// Storage type of a series, if present.
    #[inline]
    pub fn kind(&self, series: &str) -> Option<WeightType> {
        self.series.get(series).map(|column| column.kind)
    }

    /// Resolve a series name once so hot loops can skip the hash lookup.
    #[inline] pub fn column(&self, series: &str) -> Option<Column> { self.series.get(series).copied() }

    /// Value of a resolved column for a node, widened to f64.
    #[inline]
    pub fn get(&self, column: Column, node: usize) -> f64 {
        match column.kind {
            WeightType::I64 => self.i64[[node, column.index]] as f64,
            WeightType::F64 => self.f64[[node, column.index]],
        }
    }

    /// Value of a named series for a node, widened to f64.
    #[inline]
    pub fn get_as_f64(&self, series: &str, node: usize) -> Option<f64> {
        self.column(series).map(|column| self.get(column, node))
    }
}
