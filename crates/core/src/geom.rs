//! Lightweight polygon primitives over plain vertex slices.
//!
//! These helpers cover the cheap geometric paths (area sums, bounding
//! boxes, point tests) that the pipeline needs everywhere. The expensive
//! predicates used for placement feasibility (containment with margin,
//! exclusion clearance, pairwise separation) live in the layout crate's
//! constraint validator, which is the single source of truth for them.

/// Functions over a polygon given as an ordered vertex slice.
///
/// The ring is treated as implicitly closed; a duplicated closing vertex
/// is tolerated.
pub mod polygon {
    use crate::transform::Aabb2D;

    /// Signed area via the shoelace formula.
    ///
    /// Positive for counter-clockwise winding, negative for clockwise.
    pub fn signed_area(vertices: &[(f64, f64)]) -> f64 {
        if vertices.len() < 3 {
            return 0.0;
        }
        let mut sum = 0.0;
        let n = vertices.len();
        for i in 0..n {
            let (x1, y1) = vertices[i];
            let (x2, y2) = vertices[(i + 1) % n];
            sum += x1 * y2 - x2 * y1;
        }
        sum / 2.0
    }

    /// Absolute polygon area.
    pub fn area(vertices: &[(f64, f64)]) -> f64 {
        signed_area(vertices).abs()
    }

    /// Perimeter of the closed ring.
    pub fn perimeter(vertices: &[(f64, f64)]) -> f64 {
        if vertices.len() < 2 {
            return 0.0;
        }
        let n = vertices.len();
        (0..n)
            .map(|i| {
                let (x1, y1) = vertices[i];
                let (x2, y2) = vertices[(i + 1) % n];
                ((x2 - x1).powi(2) + (y2 - y1).powi(2)).sqrt()
            })
            .sum()
    }

    /// Point-in-polygon test via ray casting.
    ///
    /// Points exactly on an edge may report either side; the pipeline
    /// never depends on on-edge behavior of this helper.
    pub fn contains_point(vertices: &[(f64, f64)], point: (f64, f64)) -> bool {
        if vertices.len() < 3 {
            return false;
        }
        let (px, py) = point;
        let mut inside = false;
        let n = vertices.len();
        let mut j = n - 1;
        for i in 0..n {
            let (xi, yi) = vertices[i];
            let (xj, yj) = vertices[j];
            if ((yi > py) != (yj > py)) && (px < (xj - xi) * (py - yi) / (yj - yi) + xi) {
                inside = !inside;
            }
            j = i;
        }
        inside
    }

    /// Axis-aligned bounding box, or `None` for an empty slice.
    pub fn bounding_box(vertices: &[(f64, f64)]) -> Option<Aabb2D> {
        let (&(first_x, first_y), rest) = vertices.split_first()?;
        let mut bbox = Aabb2D::new(first_x, first_y, first_x, first_y);
        for &(x, y) in rest {
            bbox.min_x = bbox.min_x.min(x);
            bbox.min_y = bbox.min_y.min(y);
            bbox.max_x = bbox.max_x.max(x);
            bbox.max_y = bbox.max_y.max(y);
        }
        Some(bbox)
    }

    /// Vertex centroid (arithmetic mean of the ring vertices).
    ///
    /// Used as the reference point for the planar frame; the exact
    /// area-weighted centroid is not required there.
    pub fn vertex_centroid(vertices: &[(f64, f64)]) -> (f64, f64) {
        if vertices.is_empty() {
            return (0.0, 0.0);
        }
        let sum = vertices
            .iter()
            .fold((0.0, 0.0), |acc, &(x, y)| (acc.0 + x, acc.1 + y));
        let n = vertices.len() as f64;
        (sum.0 / n, sum.1 / n)
    }
}
