//! Placement feasibility and pairwise compatibility.
//!
//! [`ConstraintValidator`] is the single source of truth for the two
//! predicates the pipeline is built on: `is_feasible` (one placement
//! against the parcel, margin and exclusion lines) and `are_compatible`
//! (two placements against the spacing requirement). The conflict graph
//! is derived exclusively from these predicates; no other component
//! re-implements containment or overlap logic.

use crate::candidate::PlacementCandidate;
use crate::parcel::Parcel;
use crate::spatial_index::CandidateIndex;
use geo::{Contains, Distance, Euclidean, Intersects, LineString, Polygon as GeoPolygon};
use rayon::prelude::*;
use siteplan_core::Config;
use std::sync::atomic::{AtomicBool, Ordering};

/// Feasibility and compatibility predicates for one request.
///
/// Holds the parcel bridge geometries so the hot per-candidate path does
/// not rebuild them.
pub struct ConstraintValidator {
    parcel_polygon: GeoPolygon<f64>,
    boundary_line: LineString<f64>,
    exclusion_lines: Vec<LineString<f64>>,
    margin: f64,
    spacing: f64,
    green_buffer: f64,
}

impl ConstraintValidator {
    /// Creates a validator for the given parcel and parameters.
    pub fn new(parcel: &Parcel, config: &Config) -> Self {
        Self {
            parcel_polygon: parcel.to_geo_polygon(),
            boundary_line: parcel.boundary_line(),
            exclusion_lines: parcel.exclusion_lines(),
            margin: config.margin,
            spacing: config.spacing,
            green_buffer: config.green_buffer,
        }
    }

    /// True iff the candidate's footprint lies within the parcel eroded
    /// by the margin and keeps clear of every exclusion line.
    pub fn is_feasible(&self, candidate: &PlacementCandidate) -> bool {
        let footprint = candidate.to_geo_polygon();

        if !self.parcel_polygon.contains(&footprint) {
            return false;
        }
        if self.margin > 0.0
            && Euclidean.distance(&footprint, &self.boundary_line) + 1e-9 < self.margin
        {
            return false;
        }
        for line in &self.exclusion_lines {
            if self.green_buffer > 0.0 {
                if Euclidean.distance(&footprint, line) + 1e-9 < self.green_buffer {
                    return false;
                }
            } else if footprint.intersects(line) {
                return false;
            }
        }
        true
    }

    /// True iff the two footprints keep the configured spacing.
    ///
    /// Both orientations are axis-aligned, so the footprint boxes are the
    /// footprints themselves and the separation test is closed-form:
    /// interiors must be disjoint and the box gap must reach `spacing`.
    /// Touching footprints are compatible at zero spacing.
    pub fn are_compatible(&self, a: &PlacementCandidate, b: &PlacementCandidate) -> bool {
        let (abox, bbox) = (a.aabb_2d(), b.aabb_2d());

        let overlap_x = abox.min_x < bbox.max_x - 1e-9 && bbox.min_x < abox.max_x - 1e-9;
        let overlap_y = abox.min_y < bbox.max_y - 1e-9 && bbox.min_y < abox.max_y - 1e-9;
        if overlap_x && overlap_y {
            return false;
        }

        abox.distance(&bbox) + 1e-9 >= self.spacing
    }

    /// The spacing this validator enforces.
    pub fn spacing(&self) -> f64 {
        self.spacing
    }
}

/// Conflict graph over a feasible candidate universe.
///
/// Nodes are candidate ids (0..n); an edge joins every incompatible pair.
#[derive(Debug, Clone, Default)]
pub struct ConflictGraph {
    edges: Vec<(u32, u32)>,
    adjacency: Vec<Vec<u32>>,
}

impl ConflictGraph {
    /// Edge list with `i < j`, sorted lexicographically.
    pub fn edges(&self) -> &[(u32, u32)] {
        &self.edges
    }

    /// Neighbor lists, one per candidate id.
    pub fn adjacency(&self) -> &[Vec<u32>] {
        &self.adjacency
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Number of conflict edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// True iff no edge joins two of the selected ids.
    pub fn is_independent(&self, selected: &[u32]) -> bool {
        let mut in_set = vec![false; self.adjacency.len()];
        for &id in selected {
            in_set[id as usize] = true;
        }
        self.edges
            .iter()
            .all(|&(i, j)| !(in_set[i as usize] && in_set[j as usize]))
    }
}

/// Builds the conflict graph over `candidates`.
///
/// Broad phase via the R*-tree (footprint boxes expanded by the spacing),
/// exact phase via [`ConstraintValidator::are_compatible`]. The pairwise
/// work is chunked per candidate across worker threads; output ordering
/// does not depend on the thread count.
pub fn build_conflict_graph(
    candidates: &[PlacementCandidate],
    validator: &ConstraintValidator,
    cancelled: &AtomicBool,
) -> ConflictGraph {
    let index = CandidateIndex::build(candidates);
    let reach = validator.spacing() + 1e-6;

    let neighbor_lists: Vec<Vec<u32>> = candidates
        .par_iter()
        .map(|candidate| {
            if cancelled.load(Ordering::Relaxed) {
                return Vec::new();
            }
            let region = candidate.aabb_2d().expanded(reach);
            let mut conflicts: Vec<u32> = index
                .query(&region)
                .into_iter()
                .filter(|entry| entry.id > candidate.id)
                .filter(|entry| {
                    !validator.are_compatible(candidate, &candidates[entry.id as usize])
                })
                .map(|entry| entry.id)
                .collect();
            conflicts.sort_unstable();
            conflicts
        })
        .collect();

    let mut edges = Vec::new();
    let mut adjacency: Vec<Vec<u32>> = vec![Vec::new(); candidates.len()];
    for (i, conflicts) in neighbor_lists.into_iter().enumerate() {
        let i = i as u32;
        for j in conflicts {
            edges.push((i, j));
            adjacency[i as usize].push(j);
            adjacency[j as usize].push(i);
        }
    }
    for neighbors in &mut adjacency {
        neighbors.sort_unstable();
    }

    ConflictGraph { edges, adjacency }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::module::ModuleType;
    use siteplan_core::Orientation;

    fn candidate(id: u32, x: f64, y: f64, w: f64, h: f64) -> PlacementCandidate {
        PlacementCandidate {
            id,
            module_index: 0,
            module_name: "M".into(),
            anchor: (x, y),
            orientation: Orientation::AxisA,
            width: w,
            height: h,
            weight: w * h,
        }
    }

    fn square_parcel(side: f64) -> Parcel {
        Parcel::new(vec![(0.0, 0.0), (side, 0.0), (side, side), (0.0, side)])
    }

    #[test]
    fn test_feasible_respects_margin() {
        let parcel = square_parcel(100.0);
        let validator = ConstraintValidator::new(&parcel, &Config::new().with_margin(5.0));

        // Exactly on the eroded boundary: feasible.
        assert!(validator.is_feasible(&candidate(0, 5.0, 5.0, 26.0, 16.0)));
        // One meter too close.
        assert!(!validator.is_feasible(&candidate(1, 4.0, 5.0, 26.0, 16.0)));
        // Outside the parcel entirely.
        assert!(!validator.is_feasible(&candidate(2, 90.0, 90.0, 26.0, 16.0)));
    }

    #[test]
    fn test_feasible_concave_parcel() {
        // L-shaped parcel; the notch occupies the top-right quadrant.
        let parcel = Parcel::new(vec![
            (0.0, 0.0),
            (100.0, 0.0),
            (100.0, 50.0),
            (50.0, 50.0),
            (50.0, 100.0),
            (0.0, 100.0),
        ]);
        let validator = ConstraintValidator::new(&parcel, &Config::new());

        assert!(validator.is_feasible(&candidate(0, 10.0, 10.0, 20.0, 20.0)));
        // Straddles the notch: bounding box inside the parcel bbox but the
        // footprint leaves the polygon.
        assert!(!validator.is_feasible(&candidate(1, 60.0, 40.0, 20.0, 20.0)));
    }

    #[test]
    fn test_feasible_exclusion_line() {
        let parcel =
            square_parcel(100.0).with_exclusion(vec![(50.0, -10.0), (50.0, 110.0)]);
        let validator = ConstraintValidator::new(&parcel, &Config::new());

        // Crosses the line.
        assert!(!validator.is_feasible(&candidate(0, 40.0, 40.0, 20.0, 10.0)));
        // Clear of the line.
        assert!(validator.is_feasible(&candidate(1, 10.0, 40.0, 20.0, 10.0)));
    }

    #[test]
    fn test_feasible_exclusion_with_buffer() {
        let parcel =
            square_parcel(100.0).with_exclusion(vec![(50.0, -10.0), (50.0, 110.0)]);
        let validator =
            ConstraintValidator::new(&parcel, &Config::new().with_green_buffer(5.0));

        // 2 m clear of the line: rejected by the 5 m buffer.
        assert!(!validator.is_feasible(&candidate(0, 28.0, 40.0, 20.0, 10.0)));
        // 10 m clear.
        assert!(validator.is_feasible(&candidate(1, 20.0, 40.0, 20.0, 10.0)));
    }

    #[test]
    fn test_compatibility_spacing() {
        let parcel = square_parcel(100.0);
        let validator = ConstraintValidator::new(&parcel, &Config::new().with_spacing(2.0));

        let a = candidate(0, 0.0, 0.0, 10.0, 10.0);
        // 3 m gap: compatible.
        assert!(validator.are_compatible(&a, &candidate(1, 13.0, 0.0, 10.0, 10.0)));
        // Exactly 2 m: compatible.
        assert!(validator.are_compatible(&a, &candidate(2, 12.0, 0.0, 10.0, 10.0)));
        // 1 m: too close.
        assert!(!validator.are_compatible(&a, &candidate(3, 11.0, 0.0, 10.0, 10.0)));
        // Overlapping.
        assert!(!validator.are_compatible(&a, &candidate(4, 5.0, 5.0, 10.0, 10.0)));
    }

    #[test]
    fn test_compatibility_touching_at_zero_spacing() {
        let parcel = square_parcel(100.0);
        let validator = ConstraintValidator::new(&parcel, &Config::new());

        let a = candidate(0, 0.0, 0.0, 10.0, 10.0);
        let touching = candidate(1, 10.0, 0.0, 10.0, 10.0);
        let overlapping = candidate(2, 9.0, 0.0, 10.0, 10.0);
        assert!(validator.are_compatible(&a, &touching));
        assert!(!validator.are_compatible(&a, &overlapping));
    }

    #[test]
    fn test_diagonal_gap_uses_euclidean_distance() {
        let parcel = square_parcel(100.0);
        let validator = ConstraintValidator::new(&parcel, &Config::new().with_spacing(5.0));

        let a = candidate(0, 0.0, 0.0, 10.0, 10.0);
        // Diagonal gap of 3-4-5: exactly 5 m.
        assert!(validator.are_compatible(&a, &candidate(1, 13.0, 14.0, 10.0, 10.0)));
        // Diagonal gap sqrt(18) ≈ 4.24 m: too close.
        assert!(!validator.are_compatible(&a, &candidate(2, 13.0, 13.0, 10.0, 10.0)));
    }

    #[test]
    fn test_conflict_graph_small() {
        let parcel = square_parcel(100.0);
        let config = Config::new().with_spacing(2.0);
        let validator = ConstraintValidator::new(&parcel, &config);
        let cancelled = AtomicBool::new(false);

        // Three candidates in a row: 0-1 conflict (1 m gap), 1-2 conflict,
        // 0-2 compatible (12 m gap).
        let candidates = vec![
            candidate(0, 0.0, 0.0, 10.0, 10.0),
            candidate(1, 11.0, 0.0, 10.0, 10.0),
            candidate(2, 22.0, 0.0, 10.0, 10.0),
        ];
        let graph = build_conflict_graph(&candidates, &validator, &cancelled);

        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edges(), &[(0, 1), (1, 2)]);
        assert!(graph.is_independent(&[0, 2]));
        assert!(!graph.is_independent(&[0, 1]));
    }

    #[test]
    fn test_conflict_graph_uses_module_catalog_dims() {
        // Sanity: a module catalog entry round-trips into candidates with
        // the dimensions the validator sees.
        let module = ModuleType::new("A", 26.0, 16.0);
        let c = candidate(0, 0.0, 0.0, module.width, module.height);
        assert_eq!(c.aabb_2d().width(), 26.0);
    }
}
