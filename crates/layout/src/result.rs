//! Layout results and request diagnostics.

use crate::scoring::LayoutMetrics;
use siteplan_core::GeoPoint;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How a sub-problem's selection was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SubProblemStatus {
    /// Exact 0/1 solve.
    Exact,
    /// Greedy selection (chosen strategy or exact-solver fallback).
    Greedy,
    /// No candidate subset improved on the empty selection.
    Empty,
}

impl std::fmt::Display for SubProblemStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Exact => write!(f, "Exact"),
            Self::Greedy => write!(f, "Greedy"),
            Self::Empty => write!(f, "Empty"),
        }
    }
}

/// One module placed in a layout.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PlacedModule {
    /// Module catalog name.
    pub module: String,

    /// Lower-left footprint corner in the planar frame.
    pub anchor: (f64, f64),

    /// Orientation angle in degrees (0 or 90).
    pub orientation_deg: f64,

    /// Footprint polygon in the planar frame.
    pub footprint: Vec<(f64, f64)>,

    /// Footprint polygon in geographic coordinates, for parcels built
    /// from latitude/longitude.
    pub footprint_geographic: Option<Vec<GeoPoint>>,
}

/// A conflict-free, scored set of module placements.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Layout {
    /// Placed modules, in candidate-id order.
    pub placements: Vec<PlacedModule>,

    /// Selected candidate ids (sorted; used for deduplication).
    pub candidate_ids: Vec<u32>,

    /// Aggregate metrics.
    pub metrics: LayoutMetrics,

    /// Label of the sub-problem this layout came from.
    pub subproblem: String,

    /// How the selection was obtained.
    pub status: SubProblemStatus,
}

impl Layout {
    /// Number of placed modules.
    pub fn placed_count(&self) -> usize {
        self.placements.len()
    }

    /// True if nothing was placed.
    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }
}

/// Per-sub-problem diagnostic record.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SubProblemReport {
    /// Sub-problem label, e.g. `"any/all"` or `"axis-a/Section B"`.
    pub label: String,
    /// How the selection was obtained.
    pub status: SubProblemStatus,
    /// Candidates available to this sub-problem.
    pub candidates: usize,
    /// Modules placed.
    pub placed: usize,
    /// Composite score of the resulting layout.
    pub score: f64,
}

/// Diagnostics for one layout request.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PlanDiagnostics {
    /// Candidates emitted by the generator.
    pub candidates_generated: usize,

    /// Candidates surviving the feasibility filter.
    pub candidates_feasible: usize,

    /// Edges in the conflict graph.
    pub conflict_edges: usize,

    /// One record per solved sub-problem.
    pub subproblems: Vec<SubProblemReport>,

    /// Total computation time in milliseconds.
    pub computation_time_ms: u64,

    /// Whether the request was cancelled before completion.
    pub cancelled: bool,

    /// Human-readable note for benign empty outcomes.
    pub note: Option<String>,
}

/// Ranked layouts plus diagnostics, returned to the caller.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PlanOutcome {
    /// Layouts in descending score order, truncated to `max_results`.
    pub layouts: Vec<Layout>,

    /// Request diagnostics.
    pub diagnostics: PlanDiagnostics,
}

impl PlanOutcome {
    /// The highest-scoring layout, if any.
    pub fn best(&self) -> Option<&Layout> {
        self.layouts.first()
    }

    /// True if no layout was produced.
    pub fn is_empty(&self) -> bool {
        self.layouts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(ids: Vec<u32>, score: f64) -> Layout {
        Layout {
            placements: Vec::new(),
            candidate_ids: ids,
            metrics: LayoutMetrics {
                score,
                ..Default::default()
            },
            subproblem: "any/all".into(),
            status: SubProblemStatus::Greedy,
        }
    }

    #[test]
    fn test_outcome_best() {
        let outcome = PlanOutcome {
            layouts: vec![layout(vec![0, 1], 10.0), layout(vec![2], 5.0)],
            diagnostics: PlanDiagnostics::default(),
        };
        assert_eq!(outcome.best().unwrap().metrics.score, 10.0);
        assert!(!outcome.is_empty());
    }

    #[test]
    fn test_status_display() {
        assert_eq!(SubProblemStatus::Exact.to_string(), "Exact");
        assert_eq!(SubProblemStatus::Greedy.to_string(), "Greedy");
        assert_eq!(SubProblemStatus::Empty.to_string(), "Empty");
    }
}
