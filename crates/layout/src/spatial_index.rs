//! Spatial index over candidate footprints using an R*-tree.
//!
//! Broad-phase pruning for conflict-graph construction: instead of
//! testing every candidate pair, each candidate queries the tree for
//! footprints whose boxes come within spacing range.

use crate::candidate::PlacementCandidate;
use rstar::{RTree, RTreeObject, AABB};
use siteplan_core::Aabb2D;

/// An entry in the candidate spatial index.
#[derive(Debug, Clone)]
pub struct CandidateEntry {
    /// Candidate id.
    pub id: u32,
    /// Footprint box (min_x, min_y, max_x, max_y).
    aabb: [f64; 4],
}

impl CandidateEntry {
    /// Creates an entry from a candidate id and footprint box.
    pub fn new(id: u32, bbox: Aabb2D) -> Self {
        Self {
            id,
            aabb: [bbox.min_x, bbox.min_y, bbox.max_x, bbox.max_y],
        }
    }

    /// The entry's footprint box.
    pub fn aabb_2d(&self) -> Aabb2D {
        Aabb2D::new(self.aabb[0], self.aabb[1], self.aabb[2], self.aabb[3])
    }
}

impl RTreeObject for CandidateEntry {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners([self.aabb[0], self.aabb[1]], [self.aabb[2], self.aabb[3]])
    }
}

/// R*-tree over candidate footprints.
#[derive(Debug)]
pub struct CandidateIndex {
    tree: RTree<CandidateEntry>,
}

impl CandidateIndex {
    /// Creates an empty index.
    pub fn new() -> Self {
        Self { tree: RTree::new() }
    }

    /// Bulk-loads an index over all candidates.
    pub fn build(candidates: &[PlacementCandidate]) -> Self {
        let entries = candidates
            .iter()
            .map(|c| CandidateEntry::new(c.id, c.aabb_2d()))
            .collect();
        Self {
            tree: RTree::bulk_load(entries),
        }
    }

    /// Number of entries in the index.
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    /// True if the index holds no entries.
    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// All entries whose boxes intersect `region`.
    pub fn query(&self, region: &Aabb2D) -> Vec<&CandidateEntry> {
        let envelope = AABB::from_corners(
            [region.min_x, region.min_y],
            [region.max_x, region.max_y],
        );
        self.tree
            .locate_in_envelope_intersecting(&envelope)
            .collect()
    }
}

impl Default for CandidateIndex {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use siteplan_core::Orientation;

    fn candidate(id: u32, x: f64, y: f64) -> PlacementCandidate {
        PlacementCandidate {
            id,
            module_index: 0,
            module_name: "M".into(),
            anchor: (x, y),
            orientation: Orientation::AxisA,
            width: 10.0,
            height: 10.0,
            weight: 100.0,
        }
    }

    #[test]
    fn test_build_and_query() {
        let candidates = vec![
            candidate(0, 0.0, 0.0),
            candidate(1, 50.0, 0.0),
            candidate(2, 0.0, 50.0),
        ];
        let index = CandidateIndex::build(&candidates);
        assert_eq!(index.len(), 3);

        // Region around the first footprint, expanded past the second.
        let hits = index.query(&Aabb2D::new(-5.0, -5.0, 15.0, 15.0));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, 0);

        let hits = index.query(&Aabb2D::new(0.0, 0.0, 60.0, 10.0));
        let mut ids: Vec<u32> = hits.iter().map(|e| e.id).collect();
        ids.sort_unstable();
        assert_eq!(ids, vec![0, 1]);
    }

    #[test]
    fn test_empty_index() {
        let index = CandidateIndex::new();
        assert!(index.is_empty());
        assert!(index.query(&Aabb2D::new(0.0, 0.0, 10.0, 10.0)).is_empty());
    }
}
