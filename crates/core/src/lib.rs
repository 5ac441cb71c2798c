//! # SitePlan Core
//!
//! Core types and abstractions for the SitePlan parcel layout engine.
//!
//! This crate provides the foundation shared by the layout pipeline:
//!
//! - **Errors**: [`Error`], [`Result`]
//! - **Polygon primitives**: [`geom::polygon`] — area, perimeter,
//!   point-in-polygon, bounding box over plain vertex slices
//! - **Coordinate transforms**: [`to_planar`], [`to_geographic`] — local
//!   equirectangular frame around a reference point, plus [`Aabb2D`]
//! - **Solver configuration**: [`Config`], [`Strategy`],
//!   [`OrientationMode`], [`ScoreWeights`]
//! - **Exact solver types**: [`ExactConfig`], [`ExactResult`],
//!   [`SolutionStatus`]
//! - **Progress reporting**: [`ProgressInfo`], [`ProgressCallback`]
//!
//! ## Configuration
//!
//! ```rust
//! use siteplan_core::{Config, Strategy};
//!
//! let config = Config::new()
//!     .with_strategy(Strategy::Auto)
//!     .with_margin(5.0)
//!     .with_spacing(2.0)
//!     .with_floors(5);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: serialization/deserialization support for all public types

pub mod error;
pub mod exact;
pub mod geom;
pub mod solver;
pub mod transform;

// Re-exports
pub use error::{Error, Result};
pub use exact::{ExactConfig, ExactResult, SolutionStatus};
pub use solver::{
    Config, Orientation, OrientationMode, ProgressCallback, ProgressInfo, ScoreWeights, Strategy,
};
pub use transform::{to_geographic, to_planar, Aabb2D, GeoPoint, EARTH_RADIUS_M};
