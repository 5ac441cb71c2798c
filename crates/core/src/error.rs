//! Error types for the layout engine.

use thiserror::Error;

/// Errors that abort a layout request.
///
/// Recoverable conditions (an exact solve exceeding its budget, a
/// sub-problem with no improving subset, a request that yields zero
/// feasible candidates) are not errors; they are handled inside the
/// pipeline and reported through the result diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    /// The parcel ring or an exclusion polyline is degenerate:
    /// fewer than 3 vertices, self-intersecting, or non-positive area.
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    /// The request is well-formed but can never place anything:
    /// nonsensical parameter values, an empty module catalog, or no
    /// module type fitting the margin-eroded parcel.
    #[error("infeasible parameters: {0}")]
    InfeasibleParameters(String),

    /// Internal failure (e.g. worker pool construction).
    #[error("internal error: {0}")]
    Internal(String),
}

/// Result alias used throughout the engine.
pub type Result<T> = std::result::Result<T, Error>;
