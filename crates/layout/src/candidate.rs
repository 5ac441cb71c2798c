//! Placement candidate generation.
//!
//! The generator walks a fixed-step grid over the margin-eroded parcel
//! bounding box for every module type and admitted orientation, emitting
//! one candidate per anchor. Only the cheap bounding-box bound is applied
//! here; full containment and exclusion checks are the constraint
//! validator's job.
//!
//! Generation is sequential and row-major so candidate ids are stable:
//! two calls with the same inputs produce the same ordering.

use crate::module::ModuleType;
use crate::parcel::Parcel;
use geo::{Coord, LineString, Polygon as GeoPolygon};
use siteplan_core::{Aabb2D, Config, Orientation};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Smallest permitted grid step, guarding against degenerate loops.
pub const MIN_GRID_STEP: f64 = 0.1;

/// One hypothetical module placement.
///
/// Candidates are generated once per request and never mutated; the `id`
/// indexes the feasible-candidate arrays used by the conflict graph and
/// the optimizers.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PlacementCandidate {
    /// Stable index within the candidate universe.
    pub id: u32,

    /// Index into the request's module catalog.
    pub module_index: usize,

    /// Module catalog name.
    pub module_name: String,

    /// Lower-left corner of the footprint.
    pub anchor: (f64, f64),

    /// Placement orientation.
    pub orientation: Orientation,

    /// Footprint width at this orientation.
    pub width: f64,

    /// Footprint height at this orientation.
    pub height: f64,

    /// Selection weight: `value_weight × floor multiplier × area`.
    pub weight: f64,
}

impl PlacementCandidate {
    /// Footprint bounding box (identical to the footprint itself, since
    /// both orientations are axis-aligned).
    pub fn aabb_2d(&self) -> Aabb2D {
        Aabb2D::new(
            self.anchor.0,
            self.anchor.1,
            self.anchor.0 + self.width,
            self.anchor.1 + self.height,
        )
    }

    /// Footprint area in square meters.
    pub fn footprint_area(&self) -> f64 {
        self.width * self.height
    }

    /// Footprint corners, counter-clockwise from the anchor.
    pub fn footprint(&self) -> Vec<(f64, f64)> {
        let (x, y) = self.anchor;
        vec![
            (x, y),
            (x + self.width, y),
            (x + self.width, y + self.height),
            (x, y + self.height),
        ]
    }

    /// Bridges the footprint to a `geo` polygon.
    pub fn to_geo_polygon(&self) -> GeoPolygon<f64> {
        let exterior = LineString::from(
            self.footprint()
                .into_iter()
                .map(|(x, y)| Coord { x, y })
                .collect::<Vec<_>>(),
        );
        GeoPolygon::new(exterior, Vec::new())
    }
}

/// Selection weight of one placed instance of `module`.
pub fn selection_weight(module: &ModuleType, floors: u32) -> f64 {
    let floor_multiplier = if module.counts_toward_floors {
        floors as f64
    } else {
        1.0
    };
    module.value_weight * floor_multiplier * module.footprint_area()
}

/// Generates the full candidate universe for a request.
///
/// Square modules emit a single orientation; the grid step defaults to
/// half the module's shorter side unless `config.grid_step` pins it.
pub fn generate(parcel: &Parcel, catalog: &[ModuleType], config: &Config) -> Vec<PlacementCandidate> {
    let bbox = parcel.aabb_2d();
    let margin = config.margin;
    let mut candidates = Vec::new();

    for (module_index, module) in catalog.iter().enumerate() {
        let weight = selection_weight(module, config.floors);

        // Both orientations of a square footprint coincide; emit one.
        let orientations = if module.is_square() {
            &config.orientation.orientations()[..1]
        } else {
            config.orientation.orientations()
        };

        for &orientation in orientations {
            let (width, height) = orientation.oriented_dims(module.width, module.height);
            let step = config
                .grid_step
                .unwrap_or(width.min(height) / 2.0)
                .max(MIN_GRID_STEP);

            let x0 = bbox.min_x + margin;
            let y0 = bbox.min_y + margin;
            let x_max = bbox.max_x - margin - width;
            let y_max = bbox.max_y - margin - height;
            if x_max < x0 - 1e-9 || y_max < y0 - 1e-9 {
                continue;
            }

            let nx = (((x_max - x0) / step) + 1e-9).floor().max(0.0) as usize;
            let ny = (((y_max - y0) / step) + 1e-9).floor().max(0.0) as usize;

            for iy in 0..=ny {
                let y = y0 + iy as f64 * step;
                for ix in 0..=nx {
                    let x = x0 + ix as f64 * step;
                    candidates.push(PlacementCandidate {
                        id: candidates.len() as u32,
                        module_index,
                        module_name: module.name.clone(),
                        anchor: (x, y),
                        orientation,
                        width,
                        height,
                        weight,
                    });
                }
            }
        }
    }

    candidates
}
