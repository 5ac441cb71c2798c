//! Merging, deduplication and ranking of sub-problem layouts.

use crate::result::Layout;
use std::cmp::Ordering;
use std::collections::HashSet;

/// Deduplicates, sorts and truncates layouts from all sub-problems.
///
/// Layouts with identical candidate-id sets collapse to one (different
/// sub-problems regularly converge on the same selection). Ordering is
/// by score descending with a deterministic id-set tie-break, so results
/// are stable across runs and thread counts.
pub fn rank(mut layouts: Vec<Layout>, max_results: usize) -> Vec<Layout> {
    let mut seen: HashSet<Vec<u32>> = HashSet::new();
    layouts.retain(|layout| seen.insert(layout.candidate_ids.clone()));

    layouts.sort_by(|a, b| {
        b.metrics
            .score
            .partial_cmp(&a.metrics.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.candidate_ids.cmp(&b.candidate_ids))
    });

    layouts.truncate(max_results);
    layouts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::SubProblemStatus;
    use crate::scoring::LayoutMetrics;

    fn layout(ids: Vec<u32>, score: f64, label: &str) -> Layout {
        Layout {
            placements: Vec::new(),
            candidate_ids: ids,
            metrics: LayoutMetrics {
                score,
                ..Default::default()
            },
            subproblem: label.into(),
            status: SubProblemStatus::Greedy,
        }
    }

    #[test]
    fn test_sorts_descending_by_score() {
        let ranked = rank(
            vec![
                layout(vec![0], 5.0, "a"),
                layout(vec![1], 15.0, "b"),
                layout(vec![2], 10.0, "c"),
            ],
            10,
        );
        let scores: Vec<f64> = ranked.iter().map(|l| l.metrics.score).collect();
        assert_eq!(scores, vec![15.0, 10.0, 5.0]);
    }

    #[test]
    fn test_deduplicates_identical_selections() {
        let ranked = rank(
            vec![
                layout(vec![0, 1], 10.0, "any/all"),
                layout(vec![0, 1], 10.0, "axis-a/all"),
                layout(vec![2], 5.0, "axis-b/all"),
            ],
            10,
        );
        assert_eq!(ranked.len(), 2);
        // The first occurrence survives.
        assert_eq!(ranked[0].subproblem, "any/all");
    }

    #[test]
    fn test_truncates_to_max_results() {
        let layouts = (0..20).map(|i| layout(vec![i], i as f64, "x")).collect();
        let ranked = rank(layouts, 5);
        assert_eq!(ranked.len(), 5);
        assert_eq!(ranked[0].metrics.score, 19.0);
    }

    #[test]
    fn test_empty_input() {
        assert!(rank(Vec::new(), 10).is_empty());
    }

    #[test]
    fn test_tie_break_is_deterministic() {
        let ranked = rank(
            vec![layout(vec![3], 10.0, "a"), layout(vec![1], 10.0, "b")],
            10,
        );
        assert_eq!(ranked[0].candidate_ids, vec![1]);
    }
}
