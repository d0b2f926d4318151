use crate::partition::Partition;

impl Partition {
    /// Total of a tally divided evenly across districts.
    pub fn ideal_population(&self, tally: &str) -> Option<f64> {
        let totals = self.tally(tally)?;
        Some(totals.iter().sum::<f64>() / totals.len() as f64)
    }

    /// District totals of a tally in ascending order.
    pub fn sorted_tally(&self, tally: &str) -> Option<Vec<f64>> {
        let mut totals = self.tally(tally)?.to_vec();
        totals.sort_by(f64::total_cmp);
        Some(totals)
    }

    /// Largest fractional deviation of any district's tally from the ideal.
    pub fn max_deviation(&self, tally: &str) -> Option<f64> {
        let ideal = self.ideal_population(tally)?;
        if ideal == 0.0 { return Some(0.0) }
        self.tally(tally)?.iter()
            .map(|&p| (p - ideal).abs() / ideal)
            .max_by(f64::total_cmp)
    }
}
