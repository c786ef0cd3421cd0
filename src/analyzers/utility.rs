//! Counting helpers shared by the aggregators.

use std::hash::Hash;

use indexmap::IndexMap;

/// Counts occurrences of each value, keyed in order of first appearance.
pub fn tally<T, I>(values: I) -> IndexMap<T, usize>
where
    T: Hash + Eq,
    I: IntoIterator<Item = T>,
{
    let mut counts = IndexMap::new();
    for value in values {
        *counts.entry(value).or_insert(0) += 1;
    }
    counts
}

/// Most frequent value and its count. Among equally frequent values the one
/// that appeared first wins. Returns `None` for empty input.
pub fn mode<T, I>(values: I) -> Option<(T, usize)>
where
    T: Hash + Eq,
    I: IntoIterator<Item = T>,
{
    let mut best: Option<(T, usize)> = None;
    for (value, count) in tally(values) {
        if best.as_ref().is_none_or(|(_, top)| count > *top) {
            best = Some((value, count));
        }
    }
    best
}

/// Reorders counts by descending frequency. The sort is stable, so ties keep
/// their first-appearance order.
pub fn ranked<T: Hash + Eq>(mut counts: IndexMap<T, usize>) -> IndexMap<T, usize> {
    counts.sort_by(|_, a, _, b| b.cmp(a));
    counts
}

/// Neumaier-compensated sum, so totals over large trip tables do not drift.
pub fn sum(values: impl IntoIterator<Item = f64>) -> f64 {
    let mut total = 0.0_f64;
    let mut compensation = 0.0_f64;
    for v in values {
        let t = total + v;
        if total.abs() >= v.abs() {
            compensation += (total - t) + v;
        } else {
            compensation += (v - t) + total;
        }
        total = t;
    }
    total + compensation
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tally_keeps_first_appearance_order() {
        let counts = tally(["B", "A", "B", "C"]);
        let keys: Vec<_> = counts.keys().copied().collect();
        assert_eq!(keys, vec!["B", "A", "C"]);
        assert_eq!(counts["B"], 2);
    }

    #[test]
    fn test_mode_simple() {
        assert_eq!(mode(["A", "B", "A", "C"]), Some(("A", 2)));
    }

    #[test]
    fn test_mode_tie_goes_to_first_seen() {
        assert_eq!(mode(["X", "Y", "Y", "X"]), Some(("X", 2)));
        assert_eq!(mode(["Y", "X", "X", "Y"]), Some(("Y", 2)));
        // repeated runs agree
        for _ in 0..10 {
            assert_eq!(mode([3, 1, 2, 1, 3]), Some((3, 2)));
        }
    }

    #[test]
    fn test_mode_empty() {
        assert_eq!(mode(Vec::<u32>::new()), None);
    }

    #[test]
    fn test_ranked_is_stable() {
        let counts = ranked(tally(["a", "b", "c", "c", "b", "d"]));
        let order: Vec<_> = counts.into_iter().collect();
        assert_eq!(order, vec![("b", 2), ("c", 2), ("a", 1), ("d", 1)]);
    }

    #[test]
    fn test_sum_compensates() {
        assert_eq!(sum([1.0, 1e100, 1.0, -1e100]), 2.0);
        assert_eq!(sum([1e16, 1.0, -1e16]), 1.0);
        assert_eq!(sum(std::iter::empty()), 0.0);
    }
}
