use rand::Rng;

use crate::{
    error::{Error, Result},
    optimizer::ScoreFunction,
    partition::Partition,
};

/// Rule deciding whether a constraint-satisfying candidate replaces the current state.
#[derive(Clone, Debug, PartialEq)]
pub enum Acceptance {
    /// Accept every valid candidate.
    ///
    /// This does not respect detailed balance: the chain's stationary distribution is
    /// not uniform over valid plans. Ensembles drawn this way are a biased random walk.
    Always,
    /// Accept candidates scoring at least as well as the current state; accept worse
    /// ones with `probability`.
    Tilted { probability: f64, score: ScoreFunction, maximize: bool },
}

impl Acceptance {
    pub fn tilted(probability: f64, score: ScoreFunction, maximize: bool) -> Result<Self> {
        if !(0.0..=1.0).contains(&probability) {
            return Err(Error::config("probability", probability, "must lie in [0, 1]"));
        }
        Ok(Self::Tilted { probability, score, maximize })
    }

    /// Check that the rule can score `partition`.
    pub(crate) fn validate(&self, partition: &Partition) -> Result<()> {
        match self {
            Self::Always => Ok(()),
            Self::Tilted { score, .. } => score.validate(partition),
        }
    }

    pub(crate) fn accept<R: Rng>(&self, current: &Partition, candidate: &Partition, rng: &mut R) -> bool {
        match self {
            Self::Always => true,
            Self::Tilted { probability, score, maximize } => {
                let (old, new) = (score.score(current), score.score(candidate));
                let improves = if *maximize { new >= old } else { new <= old };
                improves || rng.random::<f64>() < *probability
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::BTreeMap, sync::Arc};

    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::{
        graph::{DualGraph, WeightMatrix},
        updaters::{Updater, Updaters},
    };

    fn make_partition(assignment: &[u32]) -> Partition {
        let weights = WeightMatrix::new(
            4,
            BTreeMap::from([
                ("VAP".to_string(), vec![10, 10, 10, 10]),
                ("BVAP".to_string(), vec![9, 1, 1, 9]),
            ]),
            BTreeMap::new(),
        );
        let graph = DualGraph::new((0..4).map(|i| i.to_string()).collect(), &[(0, 1), (1, 2), (2, 3)], weights).unwrap();
        let updaters = Updaters::new().with("bvap", Updater::share("BVAP", "VAP"));
        Partition::new(Arc::new(graph), assignment, updaters).unwrap()
    }

    #[test]
    fn tilted_keeps_equal_scores_and_rejects_worse_at_zero() {
        let score = ScoreFunction::num_opportunity_districts("bvap", 0.5).unwrap();
        let tilted = Acceptance::tilted(0.0, score, true).unwrap();
        let mut rng = StdRng::seed_from_u64(0);

        let current = make_partition(&[0, 0, 0, 1]); // shares 11/30, 9/10 -> 1
        let equal = make_partition(&[0, 1, 1, 1]);   // shares 9/10, 11/30 -> 1
        let lower = make_partition(&[0, 0, 1, 1]);   // shares 1/2, 1/2 -> 0
        assert!(tilted.accept(&current, &equal, &mut rng));
        assert!(tilted.accept(&lower, &current, &mut rng));
        assert!(!tilted.accept(&current, &lower, &mut rng));
        assert!(Acceptance::Always.accept(&current, &lower, &mut rng));
    }

    #[test]
    fn tilted_at_one_accepts_everything() {
        let score = ScoreFunction::num_opportunity_districts("bvap", 0.5).unwrap();
        let tilted = Acceptance::tilted(1.0, score, true).unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        assert!(tilted.accept(&make_partition(&[0, 0, 0, 1]), &make_partition(&[0, 0, 1, 1]), &mut rng));
    }

    #[test]
    fn rejects_bad_probability() {
        let score = ScoreFunction::num_opportunity_districts("bvap", 0.5).unwrap();
        assert!(Acceptance::tilted(1.5, score, true).is_err());
    }
}
