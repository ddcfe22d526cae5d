//! Picking the best of many scored candidates.
//!
//! Navigation ranks tiles by in-line overlap and then distance, and ranks
//! displays by distance alone. Both go through [`best_by`] so the comparison
//! and tie-breaking rules live in one place.

use std::cmp::Ordering;

/// Weight applied to overlap lengths so that one pixel of shared extent
/// outweighs any on-screen distance.
pub const OVERLAP_WEIGHT: f64 = 1e6;

/// Sort key for a candidate. Lower is better. The two parts are summed, so a
/// caller that wants `primary` to dominate scales it well above any
/// plausible `secondary` (see [`OVERLAP_WEIGHT`]).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Score {
    pub primary: f64,
    pub secondary: f64,
}

impl Score {
    pub fn new(primary: f64, secondary: f64) -> Self { Score { primary, secondary } }

    /// A score with only a distance component.
    pub fn distance(distance: f64) -> Self { Score::new(0.0, distance) }

    pub fn value(&self) -> f64 { self.primary + self.secondary }

    fn compare(&self, other: &Score) -> Ordering { self.value().total_cmp(&other.value()) }
}

/// Returns the candidate with the lowest score. Candidates for which `score`
/// returns `None` are skipped. On equal scores the first one seen wins.
pub fn best_by<T>(
    candidates: impl IntoIterator<Item = T>,
    mut score: impl FnMut(&T) -> Option<Score>,
) -> Option<T> {
    let mut best: Option<(T, Score)> = None;
    for candidate in candidates {
        let Some(s) = score(&candidate) else { continue };
        match &best {
            Some((_, best_score)) if s.compare(best_score) != Ordering::Less => {}
            _ => best = Some((candidate, s)),
        }
    }
    best.map(|(candidate, _)| candidate)
}
