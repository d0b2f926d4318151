//! Validity predicates over candidate partitions.

use std::fmt;

use crate::{
    error::{Error, Result},
    partition::Partition,
};

/// A single pass/fail test of a partition. Constraints never mutate state.
#[derive(Clone, Debug, PartialEq)]
pub enum Constraint {
    /// Every district's `tally` lies within `[(1 - epsilon) * ideal, (1 + epsilon) * ideal]`.
    WithinPercentOfIdeal { tally: String, ideal: f64, epsilon: f64 },
    /// Every district induces a connected subgraph.
    Contiguous,
    /// At most this many cut edges.
    MaxCutEdges(usize),
}

impl Constraint {
    /// Population bound whose ideal is taken from `partition` (total over district count).
    pub fn within_percent_of_ideal(partition: &Partition, tally: &str, epsilon: f64) -> Result<Self> {
        if !(epsilon.is_finite() && epsilon > 0.0) {
            return Err(Error::config("epsilon", epsilon, "must be greater than 0"));
        }
        let ideal = partition.ideal_population(tally)
            .ok_or_else(|| Error::config("tally", tally, "no tally updater of that name"))?;
        Ok(Self::WithinPercentOfIdeal { tally: tally.to_string(), ideal, epsilon })
    }

    /// Check the constraint against a candidate.
    pub fn check(&self, partition: &Partition) -> bool {
        match self {
            Self::WithinPercentOfIdeal { tally, ideal, epsilon } => {
                let (lower, upper) = ((1.0 - epsilon) * ideal, (1.0 + epsilon) * ideal);
                partition.tally(tally)
                    .is_some_and(|totals| totals.iter().all(|&p| lower <= p && p <= upper))
            }
            Self::Contiguous => partition.is_contiguous(),
            Self::MaxCutEdges(limit) => partition.cut_edges().len() <= *limit,
        }
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WithinPercentOfIdeal { tally, epsilon, .. } => write!(f, "within_percent_of_ideal({tally}, {epsilon})"),
            Self::Contiguous => write!(f, "contiguous"),
            Self::MaxCutEdges(limit) => write!(f, "max_cut_edges({limit})"),
        }
    }
}

/// Constraints composed by logical AND.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Constraints(Vec<Constraint>);

impl Constraints {
    pub fn new() -> Self { Self::default() }

    pub fn with(mut self, constraint: Constraint) -> Self {
        self.0.push(constraint);
        self
    }

    #[inline] pub fn push(&mut self, constraint: Constraint) { self.0.push(constraint) }

    #[inline] pub fn len(&self) -> usize { self.0.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.0.is_empty() }

    pub fn iter(&self) -> impl Iterator<Item = &Constraint> + '_ { self.0.iter() }

    /// Ok if every constraint passes; otherwise the first failing one.
    pub fn check(&self, partition: &Partition) -> Result<()> {
        match self.0.iter().find(|c| !c.check(partition)) {
            Some(failed) => Err(Error::ConstraintViolation { constraint: failed.to_string() }),
            None => Ok(()),
        }
    }

    #[inline] pub fn is_valid(&self, partition: &Partition) -> bool { self.check(partition).is_ok() }
}

impl FromIterator<Constraint> for Constraints {
    fn from_iter<I: IntoIterator<Item = Constraint>>(iter: I) -> Self { Self(iter.into_iter().collect()) }
}

#[cfg(test)]
mod tests {
    use std::{collections::BTreeMap, sync::Arc};

    use super::*;
    use crate::{
        graph::{DualGraph, WeightMatrix},
        updaters::{Updater, Updaters},
    };

    fn make_weighted(pops: Vec<i64>, assignment: &[u32]) -> Partition {
        // 0 - 1 - 2 - 3 - 4 - 5
        let weights = WeightMatrix::new(6, BTreeMap::from([("TOTPOP".to_string(), pops)]), BTreeMap::new());
        let edges = (1..6).map(|i| (i - 1, i)).collect::<Vec<_>>();
        let graph = DualGraph::new((0..6).map(|i| i.to_string()).collect(), &edges, weights).unwrap();
        let updaters = Updaters::new().with("population", Updater::tally("TOTPOP"));
        Partition::new(Arc::new(graph), assignment, updaters).unwrap()
    }

    fn make_partition(assignment: &[u32]) -> Partition {
        make_weighted(vec![10; 6], assignment)
    }

    #[test]
    fn population_bounds_are_inclusive() {
        let partition = make_partition(&[0, 0, 0, 1, 1, 1]);
        let bound = Constraint::within_percent_of_ideal(&partition, "population", 0.5).unwrap();
        assert_eq!(bound, Constraint::WithinPercentOfIdeal { tally: "population".into(), ideal: 30.0, epsilon: 0.5 });

        // Bounds are 15..45 at epsilon 0.5. 15 / 45 sits exactly on them.
        let pops = vec![5, 10, 15, 10, 10, 10];
        assert_eq!(make_weighted(pops.clone(), &[0, 0, 1, 1, 1, 1]).tally("population"), Some(&[15.0, 45.0][..]));
        assert!(bound.check(&make_weighted(pops.clone(), &[0, 0, 1, 1, 1, 1])));
        assert!(!bound.check(&make_weighted(pops, &[0, 1, 1, 1, 1, 1])));
        assert!(!bound.check(&make_weighted(vec![5, 9, 16, 10, 10, 10], &[0, 0, 1, 1, 1, 1])));
    }

    #[test]
    fn rejects_bad_bounds() {
        let partition = make_partition(&[0, 0, 0, 1, 1, 1]);
        assert!(Constraint::within_percent_of_ideal(&partition, "population", 0.0).is_err());
        assert!(Constraint::within_percent_of_ideal(&partition, "votes", 0.1).is_err());
    }

    #[test]
    fn composes_by_and_and_names_first_failure() {
        let constraints = Constraints::new()
            .with(Constraint::MaxCutEdges(1))
            .with(Constraint::Contiguous);

        assert!(constraints.is_valid(&make_partition(&[0, 0, 0, 1, 1, 1])));

        let scattered = make_partition(&[0, 1, 0, 1, 1, 1]);
        assert_eq!(
            constraints.check(&scattered),
            Err(Error::ConstraintViolation { constraint: "max_cut_edges(1)".into() }),
        );

        let reordered = Constraints::from_iter([Constraint::Contiguous, Constraint::MaxCutEdges(1)]);
        assert_eq!(
            reordered.check(&scattered),
            Err(Error::ConstraintViolation { constraint: "contiguous".into() }),
        );
    }
}
