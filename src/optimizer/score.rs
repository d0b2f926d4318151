use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    partition::Partition,
};

/// How district shares are turned into a single score.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreKind {
    /// Count of districts whose share exceeds the threshold.
    NumOpportunityDistricts,
    /// Opportunity count plus the highest share still below the threshold.
    RewardPartialDistrict,
    /// Opportunity count plus a bonus when the next-highest district is within 0.1 of the threshold.
    RewardNextHighestClose,
    /// Opportunity count plus a term that shrinks as the largest share grows.
    PenalizeMaximumOver,
    /// Opportunity count plus a term that shrinks as the mean share above the threshold grows.
    PenalizeAverageOver,
}

impl fmt::Display for ScoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::NumOpportunityDistricts => "num_opportunity_districts",
            Self::RewardPartialDistrict => "reward_partial_district",
            Self::RewardNextHighestClose => "reward_next_highest_close",
            Self::PenalizeMaximumOver => "penalize_maximum_over",
            Self::PenalizeAverageOver => "penalize_average_over",
        })
    }
}

/// A score over the per-district values of one `Share` updater, e.g. BVAP / VAP.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoreFunction {
    kind: ScoreKind,
    share: String,
    threshold: f64,
}

impl ScoreFunction {
    pub fn new(kind: ScoreKind, share: impl Into<String>, threshold: f64) -> Result<Self> {
        if !(0.0..1.0).contains(&threshold) {
            return Err(Error::config("threshold", threshold, "must lie in [0, 1)"));
        }
        Ok(Self { kind, share: share.into(), threshold })
    }

    /// Count of districts where `share` exceeds `threshold`.
    pub fn num_opportunity_districts(share: impl Into<String>, threshold: f64) -> Result<Self> {
        Self::new(ScoreKind::NumOpportunityDistricts, share, threshold)
    }

    #[inline] pub fn kind(&self) -> ScoreKind { self.kind }

    #[inline] pub fn share(&self) -> &str { &self.share }

    #[inline] pub fn threshold(&self) -> f64 { self.threshold }

    /// Check that the share updater exists on `partition`.
    pub fn validate(&self, partition: &Partition) -> Result<()> {
        match partition.shares(&self.share) {
            Some(_) => Ok(()),
            None => Err(Error::config("score.share", &self.share, "no share updater of that name")),
        }
    }

    /// Score a partition.
    pub fn score(&self, partition: &Partition) -> f64 {
        let shares = partition.shares(&self.share)
            .unwrap_or_else(|| panic!("score share '{}' missing from partition", self.share))
            .shares();
        self.score_shares(&shares)
    }

    /// Score a list of district shares directly.
    pub fn score_shares(&self, shares: &[f64]) -> f64 {
        let threshold = self.threshold;
        let over = shares.iter().copied().filter(|&s| s > threshold).collect::<Vec<_>>();
        let num_opportunity = over.len() as f64;
        let next_highest = shares.iter().copied().filter(|&s| s <= threshold).max_by(f64::total_cmp);

        match self.kind {
            ScoreKind::NumOpportunityDistricts => num_opportunity,
            ScoreKind::RewardPartialDistrict => num_opportunity + next_highest.unwrap_or(0.0),
            ScoreKind::RewardNextHighestClose => match next_highest {
                Some(next) if next >= threshold - 0.1 => num_opportunity + (next - threshold + 0.1) * 10.0,
                _ => num_opportunity,
            },
            ScoreKind::PenalizeMaximumOver => {
                if over.is_empty() { return 0.0 }
                let max = over.iter().copied().fold(f64::NEG_INFINITY, f64::max);
                num_opportunity + (1.0 - max) / (1.0 - threshold)
            }
            ScoreKind::PenalizeAverageOver => {
                if over.is_empty() { return 0.0 }
                let mean = over.iter().sum::<f64>() / num_opportunity;
                num_opportunity + (1.0 - mean) / (1.0 - threshold)
            }
        }
    }
}

impl fmt::Display for ScoreFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({}, {})", self.kind, self.share, self.threshold)
    }
}
