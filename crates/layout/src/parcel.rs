//! Land parcel boundary and exclusion lines.

use geo::{Coord, LineString, Polygon as GeoPolygon, Validation};
use siteplan_core::geom::polygon as geom_polygon;
use siteplan_core::transform::{to_geographic, to_planar, Aabb2D, GeoPoint};
use siteplan_core::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The land parcel within which modules are placed.
///
/// Stores the boundary ring and any exclusion polylines in a local planar
/// frame (meters). Parcels built from geographic coordinates keep their
/// reference point so results can be mapped back to latitude/longitude.
///
/// A parcel is validated once at the start of a request and never mutated
/// by the pipeline.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Parcel {
    /// Boundary ring vertices, implicitly closed.
    exterior: Vec<(f64, f64)>,

    /// Polylines that placements must keep clear of.
    exclusions: Vec<Vec<(f64, f64)>>,

    /// Reference point of the planar frame, for geographic parcels.
    geo_reference: Option<GeoPoint>,
}

impl Parcel {
    /// Creates a parcel from planar vertices (meters).
    ///
    /// A duplicated closing vertex is dropped.
    pub fn new(mut vertices: Vec<(f64, f64)>) -> Self {
        if vertices.len() > 1 && vertices.first() == vertices.last() {
            vertices.pop();
        }
        Self {
            exterior: vertices,
            exclusions: Vec::new(),
            geo_reference: None,
        }
    }

    /// Creates a parcel from geographic coordinates.
    ///
    /// The planar frame is centered on the vertex centroid; its latitude
    /// sets the east-west scale.
    pub fn from_geographic(points: &[GeoPoint]) -> Self {
        let n = points.len().max(1) as f64;
        let reference = GeoPoint::new(
            points.iter().map(|p| p.lat).sum::<f64>() / n,
            points.iter().map(|p| p.lon).sum::<f64>() / n,
        );
        let mut parcel = Self::new(points.iter().map(|&p| to_planar(p, reference)).collect());
        parcel.geo_reference = Some(reference);
        parcel
    }

    /// Adds an exclusion polyline in planar coordinates.
    pub fn with_exclusion(mut self, line: Vec<(f64, f64)>) -> Self {
        self.exclusions.push(line);
        self
    }

    /// Adds an exclusion polyline in geographic coordinates.
    ///
    /// Only meaningful on parcels built with [`Parcel::from_geographic`];
    /// on a planar parcel the line is ignored with a warning.
    pub fn with_exclusion_geographic(mut self, line: &[GeoPoint]) -> Self {
        match self.geo_reference {
            Some(reference) => {
                self.exclusions
                    .push(line.iter().map(|&p| to_planar(p, reference)).collect());
            }
            None => {
                log::warn!("geographic exclusion line ignored: parcel has no geographic reference");
            }
        }
        self
    }

    /// Returns the boundary vertices.
    pub fn exterior(&self) -> &[(f64, f64)] {
        &self.exterior
    }

    /// Returns the exclusion polylines.
    pub fn exclusions(&self) -> &[Vec<(f64, f64)>] {
        &self.exclusions
    }

    /// Returns the geographic reference point, if any.
    pub fn geo_reference(&self) -> Option<GeoPoint> {
        self.geo_reference
    }

    /// Parcel area in square meters.
    pub fn area(&self) -> f64 {
        geom_polygon::area(&self.exterior)
    }

    /// Boundary perimeter in meters.
    pub fn perimeter(&self) -> f64 {
        geom_polygon::perimeter(&self.exterior)
    }

    /// Axis-aligned bounding box of the boundary.
    pub fn aabb_2d(&self) -> Aabb2D {
        geom_polygon::bounding_box(&self.exterior).unwrap_or_default()
    }

    /// True if `point` lies inside the boundary ring.
    ///
    /// Convenience for callers presenting results; placement feasibility
    /// is decided by the constraint validator, not by this test.
    pub fn contains_point(&self, point: (f64, f64)) -> bool {
        geom_polygon::contains_point(&self.exterior, point)
    }

    /// Maps a planar point back to geographic coordinates, if this parcel
    /// carries a geographic reference.
    pub fn to_geographic_point(&self, point: (f64, f64)) -> Option<GeoPoint> {
        self.geo_reference
            .map(|reference| to_geographic(point, reference))
    }

    /// Bridges the boundary to a `geo` polygon.
    pub fn to_geo_polygon(&self) -> GeoPolygon<f64> {
        let exterior = LineString::from(
            self.exterior
                .iter()
                .map(|&(x, y)| Coord { x, y })
                .collect::<Vec<_>>(),
        );
        GeoPolygon::new(exterior, Vec::new())
    }

    /// The boundary ring as a closed `geo` line string.
    pub fn boundary_line(&self) -> LineString<f64> {
        let mut coords: Vec<Coord<f64>> = self
            .exterior
            .iter()
            .map(|&(x, y)| Coord { x, y })
            .collect();
        if let Some(&first) = coords.first() {
            coords.push(first);
        }
        LineString::from(coords)
    }

    /// The exclusion polylines as `geo` line strings.
    pub fn exclusion_lines(&self) -> Vec<LineString<f64>> {
        self.exclusions
            .iter()
            .map(|line| {
                LineString::from(line.iter().map(|&(x, y)| Coord { x, y }).collect::<Vec<_>>())
            })
            .collect()
    }

    /// Validates the parcel geometry.
    pub fn validate(&self) -> Result<()> {
        if self.exterior.len() < 3 {
            return Err(Error::InvalidGeometry(format!(
                "parcel boundary needs at least 3 vertices, got {}",
                self.exterior.len()
            )));
        }
        if self.area() <= 1e-9 {
            return Err(Error::InvalidGeometry(
                "parcel boundary has non-positive area".into(),
            ));
        }
        if !self.to_geo_polygon().is_valid() {
            return Err(Error::InvalidGeometry(
                "parcel boundary ring is not simple".into(),
            ));
        }
        for (i, line) in self.exclusions.iter().enumerate() {
            if line.len() < 2 {
                return Err(Error::InvalidGeometry(format!(
                    "exclusion line {i} needs at least 2 vertices, got {}",
                    line.len()
                )));
            }
        }
        Ok(())
    }
}
