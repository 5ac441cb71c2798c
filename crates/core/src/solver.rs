//! Solver configuration and progress reporting.

use crate::error::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Optimization strategy for the placement selection step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Strategy {
    /// Exact 0/1 solve when the instance fits the exact-solver budget,
    /// greedy fallback otherwise.
    #[default]
    Auto,
    /// Always attempt the exact solve first (still falls back to greedy
    /// on timeout or solver failure, per the recovery contract).
    Exact,
    /// Greedy selection only.
    Greedy,
}

/// One of the two axis-aligned module orientations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Orientation {
    /// 0°: module width along the x axis.
    AxisA,
    /// 90°: module width along the y axis.
    AxisB,
}

impl Orientation {
    /// Rotation angle in degrees.
    pub fn angle_degrees(&self) -> f64 {
        match self {
            Self::AxisA => 0.0,
            Self::AxisB => 90.0,
        }
    }

    /// Width/height of a `w × h` module in this orientation.
    pub fn oriented_dims(&self, width: f64, height: f64) -> (f64, f64) {
        match self {
            Self::AxisA => (width, height),
            Self::AxisB => (height, width),
        }
    }
}

/// Allowed module orientations for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum OrientationMode {
    /// Both axis-aligned orientations.
    #[default]
    Any,
    /// 0° only.
    AxisA,
    /// 90° only.
    AxisB,
}

impl OrientationMode {
    /// The orientations this mode admits.
    pub fn orientations(&self) -> &'static [Orientation] {
        match self {
            Self::Any => &[Orientation::AxisA, Orientation::AxisB],
            Self::AxisA => &[Orientation::AxisA],
            Self::AxisB => &[Orientation::AxisB],
        }
    }

    /// True if `orientation` is admitted by this mode.
    pub fn allows(&self, orientation: Orientation) -> bool {
        self.orientations().contains(&orientation)
    }

    /// Orientation restrictions explored as independent sub-problems.
    ///
    /// `Any` also explores the two single-axis restrictions so the ranked
    /// output contains uniformly-oriented alternatives.
    pub fn variants(&self) -> Vec<OrientationMode> {
        match self {
            Self::Any => vec![Self::Any, Self::AxisA, Self::AxisB],
            single => vec![*single],
        }
    }
}

/// Weights of the composite layout score.
///
/// `score = living * living_area + green * green_area + efficiency * efficiency_ratio`
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScoreWeights {
    /// Weight per square meter of living area.
    pub living: f64,
    /// Weight per square meter of green area.
    pub green: f64,
    /// Weight of the dimensionless efficiency ratio.
    pub efficiency: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            living: 1.0,
            green: 0.3,
            efficiency: 0.0,
        }
    }
}

impl ScoreWeights {
    /// Creates weights from the three coefficients.
    pub fn new(living: f64, green: f64, efficiency: f64) -> Self {
        Self {
            living,
            green,
            efficiency,
        }
    }
}

/// Configuration for a layout request.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Config {
    /// Optimization strategy.
    pub strategy: Strategy,

    /// Minimum distance from any module to the parcel boundary.
    pub margin: f64,

    /// Minimum clearance between any two modules.
    pub spacing: f64,

    /// Number of floors applied to floor-counting module types.
    pub floors: u32,

    /// Width of the green strip reserved around each footprint. Also the
    /// required clearance between a footprint and any exclusion line.
    pub green_buffer: f64,

    /// Allowed module orientations.
    pub orientation: OrientationMode,

    /// Composite score weights.
    pub weights: ScoreWeights,

    /// Grid step for candidate anchors. `None` derives the step per
    /// module as half its shorter side.
    pub grid_step: Option<f64>,

    /// Maximum computation time in milliseconds (0 = unlimited).
    pub time_limit_ms: u64,

    /// Number of worker threads (0 = use the global pool).
    pub threads: usize,

    /// Maximum number of ranked layouts to return.
    pub max_results: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            strategy: Strategy::default(),
            margin: 0.0,
            spacing: 0.0,
            floors: 1,
            green_buffer: 0.0,
            orientation: OrientationMode::default(),
            weights: ScoreWeights::default(),
            grid_step: None,
            time_limit_ms: 30000,
            threads: 0,
            max_results: 12,
        }
    }
}

impl Config {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the optimization strategy.
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Sets the boundary margin.
    pub fn with_margin(mut self, margin: f64) -> Self {
        self.margin = margin;
        self
    }

    /// Sets the inter-module spacing.
    pub fn with_spacing(mut self, spacing: f64) -> Self {
        self.spacing = spacing;
        self
    }

    /// Sets the floor count.
    pub fn with_floors(mut self, floors: u32) -> Self {
        self.floors = floors;
        self
    }

    /// Sets the green buffer width.
    pub fn with_green_buffer(mut self, width: f64) -> Self {
        self.green_buffer = width;
        self
    }

    /// Sets the orientation mode.
    pub fn with_orientation(mut self, mode: OrientationMode) -> Self {
        self.orientation = mode;
        self
    }

    /// Sets the score weights.
    pub fn with_weights(mut self, weights: ScoreWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Sets a fixed grid step for candidate anchors.
    pub fn with_grid_step(mut self, step: f64) -> Self {
        self.grid_step = Some(step);
        self
    }

    /// Sets the time limit in milliseconds.
    pub fn with_time_limit(mut self, ms: u64) -> Self {
        self.time_limit_ms = ms;
        self
    }

    /// Sets the worker thread count.
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    /// Sets the maximum number of ranked layouts.
    pub fn with_max_results(mut self, max: usize) -> Self {
        self.max_results = max.max(1);
        self
    }

    /// Validates parameter values.
    pub fn validate(&self) -> Result<()> {
        if !self.margin.is_finite() || self.margin < 0.0 {
            return Err(Error::InfeasibleParameters(format!(
                "margin must be finite and non-negative, got {}",
                self.margin
            )));
        }
        if !self.spacing.is_finite() || self.spacing < 0.0 {
            return Err(Error::InfeasibleParameters(format!(
                "spacing must be finite and non-negative, got {}",
                self.spacing
            )));
        }
        if self.floors == 0 {
            return Err(Error::InfeasibleParameters(
                "floors must be at least 1".into(),
            ));
        }
        if !self.green_buffer.is_finite() || self.green_buffer < 0.0 {
            return Err(Error::InfeasibleParameters(format!(
                "green buffer must be finite and non-negative, got {}",
                self.green_buffer
            )));
        }
        if let Some(step) = self.grid_step {
            if !step.is_finite() || step <= 0.0 {
                return Err(Error::InfeasibleParameters(format!(
                    "grid step must be finite and positive, got {step}"
                )));
            }
        }
        if self.max_results == 0 {
            return Err(Error::InfeasibleParameters(
                "max_results must be at least 1".into(),
            ));
        }
        let w = &self.weights;
        if !(w.living.is_finite() && w.green.is_finite() && w.efficiency.is_finite()) {
            return Err(Error::InfeasibleParameters(
                "score weights must be finite".into(),
            ));
        }
        Ok(())
    }
}

/// Progress callback for long-running requests.
pub type ProgressCallback = Box<dyn Fn(ProgressInfo) + Send + Sync>;

/// Progress information reported during a solve.
#[derive(Debug, Clone, Default)]
pub struct ProgressInfo {
    /// Current phase description.
    pub phase: String,
    /// Sub-problems solved so far.
    pub subproblems_done: usize,
    /// Total sub-problems in this request.
    pub subproblems_total: usize,
    /// Layouts produced so far.
    pub layouts_found: usize,
    /// Best composite score seen so far.
    pub best_score: f64,
    /// Elapsed time in milliseconds.
    pub elapsed_ms: u64,
    /// Whether the solve is still running.
    pub running: bool,
}

impl ProgressInfo {
    /// Creates a running progress snapshot.
    pub fn new() -> Self {
        Self {
            running: true,
            ..Default::default()
        }
    }

    /// Sets the phase description.
    pub fn with_phase(mut self, phase: impl Into<String>) -> Self {
        self.phase = phase.into();
        self
    }

    /// Sets the sub-problem counters.
    pub fn with_subproblems(mut self, done: usize, total: usize) -> Self {
        self.subproblems_done = done;
        self.subproblems_total = total;
        self
    }

    /// Sets the layout counter.
    pub fn with_layouts(mut self, found: usize) -> Self {
        self.layouts_found = found;
        self
    }

    /// Sets the best score.
    pub fn with_best_score(mut self, score: f64) -> Self {
        self.best_score = score;
        self
    }

    /// Sets the elapsed time.
    pub fn with_elapsed(mut self, elapsed_ms: u64) -> Self {
        self.elapsed_ms = elapsed_ms;
        self
    }

    /// Marks the solve as finished.
    pub fn finished(mut self) -> Self {
        self.running = false;
        self
    }

    /// Fraction of sub-problems completed (0.0 to 1.0).
    pub fn progress_percent(&self) -> f64 {
        if self.subproblems_total > 0 {
            self.subproblems_done as f64 / self.subproblems_total as f64
        } else {
            0.0
        }
    }
}
