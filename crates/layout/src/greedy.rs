//! Greedy placement selection.
//!
//! The polynomial fallback for the maximum-weight independent set:
//! candidates are visited in descending weight order and accepted
//! whenever they conflict with nothing accepted so far. Always feasible,
//! generally suboptimal; the exact solver can only do better.

use crate::candidate::PlacementCandidate;
use crate::constraint::ConflictGraph;
use std::cmp::Ordering;

/// Selects a conflict-free subset of `allowed` by descending weight.
///
/// Ties break on candidate id, so the result is deterministic. The
/// returned ids are sorted ascending.
pub fn select_greedy(
    candidates: &[PlacementCandidate],
    allowed: &[u32],
    graph: &ConflictGraph,
) -> Vec<u32> {
    let mut order = allowed.to_vec();
    order.sort_by(|&a, &b| {
        let wa = candidates[a as usize].weight;
        let wb = candidates[b as usize].weight;
        wb.partial_cmp(&wa).unwrap_or(Ordering::Equal).then(a.cmp(&b))
    });

    let mut accepted = vec![false; candidates.len()];
    let mut selected = Vec::new();
    for id in order {
        let blocked = graph.adjacency()[id as usize]
            .iter()
            .any(|&neighbor| accepted[neighbor as usize]);
        if !blocked {
            accepted[id as usize] = true;
            selected.push(id);
        }
    }

    selected.sort_unstable();
    selected
}
