//! Building module catalog types.

use siteplan_core::{Error, OrientationMode, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A rectangular building module type.
///
/// Modules are placed with their footprint axis-aligned in the planar
/// frame, in one of two orientations (0° or 90°).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ModuleType {
    /// Catalog name, e.g. `"Section A"`.
    pub name: String,

    /// Footprint width in meters.
    pub width: f64,

    /// Footprint height in meters.
    pub height: f64,

    /// Value contribution per square meter of weighted footprint.
    pub value_weight: f64,

    /// Whether the module's area is multiplied by the floor count when
    /// computing living area and selection weight. Single-story amenity
    /// modules set this to `false`.
    pub counts_toward_floors: bool,
}

impl ModuleType {
    /// Creates a module type with unit value weight, counting floors.
    pub fn new(name: impl Into<String>, width: f64, height: f64) -> Self {
        Self {
            name: name.into(),
            width,
            height,
            value_weight: 1.0,
            counts_toward_floors: true,
        }
    }

    /// Sets the value weight.
    pub fn with_value_weight(mut self, weight: f64) -> Self {
        self.value_weight = weight;
        self
    }

    /// Sets whether the module multiplies by the floor count.
    pub fn with_floor_counting(mut self, counts: bool) -> Self {
        self.counts_toward_floors = counts;
        self
    }

    /// Footprint area in square meters.
    pub fn footprint_area(&self) -> f64 {
        self.width * self.height
    }

    /// True if the footprint is square (both orientations coincide).
    pub fn is_square(&self) -> bool {
        (self.width - self.height).abs() < 1e-12
    }

    /// True if some orientation admitted by `mode` fits a `width × height`
    /// region.
    pub fn fits_within(&self, width: f64, height: f64, mode: OrientationMode) -> bool {
        mode.orientations().iter().any(|o| {
            let (rw, rh) = o.oriented_dims(self.width, self.height);
            rw <= width + 1e-9 && rh <= height + 1e-9
        })
    }

    /// Validates the catalog record.
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(Error::InfeasibleParameters(
                "module type has an empty name".into(),
            ));
        }
        if !(self.width.is_finite() && self.width > 0.0)
            || !(self.height.is_finite() && self.height > 0.0)
        {
            return Err(Error::InfeasibleParameters(format!(
                "module '{}' has non-positive dimensions {} x {}",
                self.name, self.width, self.height
            )));
        }
        if !self.value_weight.is_finite() || self.value_weight < 0.0 {
            return Err(Error::InfeasibleParameters(format!(
                "module '{}' has an invalid value weight {}",
                self.name, self.value_weight
            )));
        }
        Ok(())
    }
}

/// The standard residential section catalog.
pub fn standard_sections() -> Vec<ModuleType> {
    vec![
        ModuleType::new("Section A", 26.0, 16.0),
        ModuleType::new("Section B", 28.0, 16.0),
        ModuleType::new("Section C", 26.0, 18.0),
        ModuleType::new("Section D", 18.0, 18.0),
    ]
}
