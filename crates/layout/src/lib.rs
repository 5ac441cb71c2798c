//! # SitePlan Layout
//!
//! Parcel layout optimization for the SitePlan engine.
//!
//! Given an irregular land-parcel boundary and a catalog of rectangular
//! building modules, this crate enumerates discretized placements,
//! validates them against containment, setback and exclusion-line
//! constraints, selects maximum-value conflict-free subsets (exact 0/1
//! solve with a greedy fallback), scores them, and returns a ranked list
//! of layouts.
//!
//! ## Pipeline
//!
//! | Stage | Component |
//! |-------|-----------|
//! | Validate | [`Parcel`], [`ModuleType`], [`Config`] |
//! | Generate | [`candidate::generate`] |
//! | Filter & conflicts | [`ConstraintValidator`], [`build_conflict_graph`] |
//! | Optimize | [`milp_solver`], [`greedy`] |
//! | Score | [`scoring::evaluate_selection`] |
//! | Rank | [`ranker::rank`] |
//! | Orchestration | [`LayoutPlanner`] |
//!
//! ## Quick Start
//!
//! ```rust
//! use siteplan_layout::{Config, LayoutPlanner, ModuleType, Parcel, Strategy};
//!
//! // A 100 x 100 m parcel.
//! let parcel = Parcel::new(vec![(0.0, 0.0), (100.0, 0.0), (100.0, 100.0), (0.0, 100.0)]);
//!
//! // One residential section type.
//! let catalog = vec![ModuleType::new("Section A", 26.0, 16.0)];
//!
//! let config = Config::new()
//!     .with_strategy(Strategy::Greedy)
//!     .with_margin(5.0)
//!     .with_spacing(2.0)
//!     .with_floors(5);
//!
//! let planner = LayoutPlanner::new(config);
//! let outcome = planner.solve(&parcel, &catalog).unwrap();
//!
//! let best = outcome.best().expect("at least one layout");
//! println!(
//!     "placed {} modules, living area {:.0} m2, efficiency {:.1}%",
//!     best.placed_count(),
//!     best.metrics.living_area,
//!     best.metrics.efficiency * 100.0
//! );
//! ```
//!
//! ## Feature Flags
//!
//! - `milp`: exact selection via `good_lp`/HiGHS; without it every exact
//!   request uses the greedy fallback
//! - `serde`: serialization support for all public types

pub mod candidate;
pub mod constraint;
pub mod greedy;
pub mod milp_solver;
pub mod module;
pub mod parcel;
pub mod planner;
pub mod ranker;
pub mod result;
pub mod scoring;
pub mod spatial_index;

// Re-exports
pub use candidate::{PlacementCandidate, MIN_GRID_STEP};
pub use constraint::{build_conflict_graph, ConflictGraph, ConstraintValidator};
pub use milp_solver::is_exact_available;
pub use module::{standard_sections, ModuleType};
pub use parcel::Parcel;
pub use planner::LayoutPlanner;
pub use result::{
    Layout, PlacedModule, PlanDiagnostics, PlanOutcome, SubProblemReport, SubProblemStatus,
};
pub use scoring::LayoutMetrics;
pub use spatial_index::{CandidateEntry, CandidateIndex};

pub use siteplan_core::{
    Aabb2D, Config, Error, ExactConfig, ExactResult, GeoPoint, Orientation, OrientationMode,
    ProgressCallback, ProgressInfo, Result, ScoreWeights, SolutionStatus, Strategy,
};
