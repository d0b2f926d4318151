//! Statewide partisan-bias measures over district-level vote counts.

/// Median minus mean of a party's district vote shares. Zero for an empty plan.
pub fn mean_median(shares: &[f64]) -> f64 {
    if shares.is_empty() { return 0.0 }

    let mut sorted = shares.to_vec();
    sorted.sort_by(f64::total_cmp);

    let mid = sorted.len() / 2;
    let median = if sorted.len() % 2 == 0 { (sorted[mid - 1] + sorted[mid]) / 2.0 } else { sorted[mid] };
    let mean = sorted.iter().sum::<f64>() / sorted.len() as f64;

    median - mean
}

/// Wasted votes `(a, b)` in one two-party district.
/// The winner wastes every vote beyond half the district total, the loser wastes all of theirs.
/// On an exact tie both parties waste only their surplus over half, which is zero.
fn wasted_votes(a: f64, b: f64) -> (f64, f64) {
    let half = (a + b) / 2.0;
    if a > b { (a - half, b) }
    else if b > a { (a, b - half) }
    else { (a - half, b - half) }
}

/// Efficiency gap: (wasted votes of A − wasted votes of B) / total votes, summed over districts.
/// Zero when no votes were cast.
pub fn efficiency_gap(a: &[f64], b: &[f64]) -> f64 {
    assert!(a.len() == b.len(), "vote vectors must cover the same districts");

    let total = a.iter().chain(b).sum::<f64>();
    if total == 0.0 { return 0.0 }

    let (wasted_a, wasted_b) = a.iter().zip(b)
        .map(|(&a, &b)| wasted_votes(a, b))
        .fold((0.0, 0.0), |(wa, wb), (a, b)| (wa + a, wb + b));

    (wasted_a - wasted_b) / total
}

/// Count districts where the first or second group is the larger.
/// Ties count for the first group.
pub fn majority_counts(first: &[f64], second: &[f64]) -> (usize, usize) {
    assert!(first.len() == second.len(), "tallies must cover the same districts");
    first.iter().zip(second).fold((0, 0), |(f, s), (&a, &b)| {
        if a.max(b) == a { (f + 1, s) } else { (f, s + 1) }
    })
}
