//! Layout metrics and the composite score.

use crate::candidate::PlacementCandidate;
use crate::module::ModuleType;
use siteplan_core::Config;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Aggregate metrics of a selected placement subset.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LayoutMetrics {
    /// Ground footprint of all placed modules, m².
    pub footprint_area: f64,

    /// Floor-multiplied living area, m². Modules with
    /// `counts_toward_floors = false` contribute their footprint once.
    pub living_area: f64,

    /// Residual parcel area outside footprints and their green-buffer
    /// rings, m².
    pub green_area: f64,

    /// Living area divided by parcel area.
    pub efficiency: f64,

    /// Footprint area divided by parcel area.
    pub density: f64,

    /// Composite score:
    /// `w_living·living + w_green·green + w_efficiency·efficiency`.
    pub score: f64,
}

/// Computes the metrics of `selected` over the candidate universe.
///
/// This weighted sum is the single authoritative scoring formula; no
/// term is special-cased anywhere else in the pipeline.
pub fn evaluate_selection(
    candidates: &[PlacementCandidate],
    selected: &[u32],
    catalog: &[ModuleType],
    parcel_area: f64,
    config: &Config,
) -> LayoutMetrics {
    let g = config.green_buffer;
    let mut footprint_area = 0.0;
    let mut living_area = 0.0;
    let mut reserved_area = 0.0;

    for &id in selected {
        let candidate = &candidates[id as usize];
        let module = &catalog[candidate.module_index];
        let area = candidate.footprint_area();

        footprint_area += area;
        living_area += if module.counts_toward_floors {
            area * config.floors as f64
        } else {
            area
        };
        // Footprint plus its surrounding green strip, rectangular
        // approximation (no rounded corners).
        reserved_area += (candidate.width + 2.0 * g) * (candidate.height + 2.0 * g);
    }

    let green_area = (parcel_area - reserved_area).max(0.0);
    let efficiency = if parcel_area > 0.0 {
        living_area / parcel_area
    } else {
        0.0
    };
    let density = if parcel_area > 0.0 {
        footprint_area / parcel_area
    } else {
        0.0
    };
    let w = &config.weights;
    let score = w.living * living_area + w.green * green_area + w.efficiency * efficiency;

    LayoutMetrics {
        footprint_area,
        living_area,
        green_area,
        efficiency,
        density,
        score,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use siteplan_core::{Orientation, ScoreWeights};

    fn candidate(id: u32, module_index: usize, w: f64, h: f64) -> PlacementCandidate {
        PlacementCandidate {
            id,
            module_index,
            module_name: "M".into(),
            anchor: (0.0, 0.0),
            orientation: Orientation::AxisA,
            width: w,
            height: h,
            weight: w * h,
        }
    }

    #[test]
    fn test_empty_selection_scores_green_only() {
        let catalog = vec![ModuleType::new("A", 26.0, 16.0)];
        let config = Config::new().with_weights(ScoreWeights::new(1.0, 0.5, 0.0));
        let metrics = evaluate_selection(&[], &[], &catalog, 10000.0, &config);

        assert_eq!(metrics.footprint_area, 0.0);
        assert_eq!(metrics.living_area, 0.0);
        assert_relative_eq!(metrics.green_area, 10000.0);
        assert_relative_eq!(metrics.score, 5000.0);
    }

    #[test]
    fn test_floor_multiplier() {
        let catalog = vec![
            ModuleType::new("A", 26.0, 16.0),
            ModuleType::new("P", 10.0, 10.0).with_floor_counting(false),
        ];
        let candidates = vec![candidate(0, 0, 26.0, 16.0), candidate(1, 1, 10.0, 10.0)];
        let config = Config::new().with_floors(5);
        let metrics = evaluate_selection(&candidates, &[0, 1], &catalog, 10000.0, &config);

        assert_relative_eq!(metrics.footprint_area, 516.0);
        // 416 * 5 floors + 100 single-story.
        assert_relative_eq!(metrics.living_area, 2180.0);
        assert_relative_eq!(metrics.efficiency, 0.218);
        assert_relative_eq!(metrics.density, 0.0516);
    }

    #[test]
    fn test_green_buffer_ring() {
        let catalog = vec![ModuleType::new("A", 20.0, 10.0)];
        let candidates = vec![candidate(0, 0, 20.0, 10.0)];
        let config = Config::new().with_green_buffer(2.0);
        let metrics = evaluate_selection(&candidates, &[0], &catalog, 10000.0, &config);

        // Reserved: (20+4) * (10+4) = 336.
        assert_relative_eq!(metrics.green_area, 10000.0 - 336.0);
        // Footprint excludes the ring.
        assert_relative_eq!(metrics.footprint_area, 200.0);
    }

    #[test]
    fn test_green_area_clamped() {
        let catalog = vec![ModuleType::new("A", 90.0, 90.0)];
        let candidates = vec![candidate(0, 0, 90.0, 90.0)];
        let config = Config::new().with_green_buffer(10.0);
        let metrics = evaluate_selection(&candidates, &[0], &catalog, 8100.0, &config);
        assert_eq!(metrics.green_area, 0.0);
    }

    #[test]
    fn test_weighted_sum_is_linear() {
        let catalog = vec![ModuleType::new("A", 10.0, 10.0)];
        let candidates = vec![candidate(0, 0, 10.0, 10.0)];
        let config = Config::new()
            .with_floors(2)
            .with_weights(ScoreWeights::new(2.0, 1.0, 100.0));
        let metrics = evaluate_selection(&candidates, &[0], &catalog, 1000.0, &config);

        let expected =
            2.0 * metrics.living_area + 1.0 * metrics.green_area + 100.0 * metrics.efficiency;
        assert_relative_eq!(metrics.score, expected);
    }
}
