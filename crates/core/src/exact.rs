//! Exact solver configuration and result types.
//!
//! The placement selection step is a maximum-weight independent set over
//! the candidate conflict graph, solved as a 0/1 linear program. Exact
//! solving is only attempted on instances below a size cap and within a
//! time budget; anything larger, slower, or failing falls back to the
//! greedy heuristic without surfacing an error.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Outcome classification of an exact solve attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SolutionStatus {
    /// Solver returned a (proven) optimal selection.
    Optimal,
    /// No candidate subset improves on the empty selection.
    Infeasible,
    /// The time budget was exhausted before a solution was available.
    Timeout,
    /// The solver reported an error.
    Error,
    /// Not attempted or not applicable.
    #[default]
    Unknown,
}

impl std::fmt::Display for SolutionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Optimal => write!(f, "Optimal"),
            Self::Infeasible => write!(f, "Infeasible"),
            Self::Timeout => write!(f, "Timeout"),
            Self::Error => write!(f, "Error"),
            Self::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Configuration for the exact (0/1 LP) selection solver.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ExactConfig {
    /// Time budget per sub-problem in milliseconds.
    pub time_limit_ms: u64,

    /// Maximum candidate count for an exact attempt; larger sub-problems
    /// go straight to the greedy fallback.
    pub max_candidates: usize,
}

impl Default for ExactConfig {
    fn default() -> Self {
        Self {
            time_limit_ms: 10000,
            max_candidates: 250,
        }
    }
}

impl ExactConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the per-sub-problem time budget in milliseconds.
    pub fn with_time_limit_ms(mut self, ms: u64) -> Self {
        self.time_limit_ms = ms;
        self
    }

    /// Sets the maximum candidate count for exact solving.
    pub fn with_max_candidates(mut self, max: usize) -> Self {
        self.max_candidates = max.max(1);
        self
    }

    /// True if a sub-problem of `n` candidates may be solved exactly.
    pub fn is_within_limit(&self, n: usize) -> bool {
        n <= self.max_candidates
    }
}

/// Extended information from an exact solve attempt.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ExactResult {
    /// Outcome classification.
    pub status: SolutionStatus,

    /// Objective value of the returned selection.
    pub objective_value: f64,

    /// Number of binary variables in the model.
    pub variables: usize,

    /// Number of pairwise conflict constraints in the model.
    pub constraints: usize,

    /// Human-readable status message.
    pub message: String,
}

impl ExactResult {
    /// Creates a result with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Result for an optimal selection.
    pub fn optimal(objective: f64) -> Self {
        Self {
            status: SolutionStatus::Optimal,
            objective_value: objective,
            message: "optimal selection found".to_string(),
            ..Default::default()
        }
    }

    /// Result for an instance where the empty selection is optimal.
    pub fn infeasible() -> Self {
        Self {
            status: SolutionStatus::Infeasible,
            objective_value: 0.0,
            message: "no candidate subset improves on the empty selection".to_string(),
            ..Default::default()
        }
    }

    /// Result for a budget-exhausted attempt.
    pub fn timeout() -> Self {
        Self {
            status: SolutionStatus::Timeout,
            objective_value: 0.0,
            message: "time budget exhausted".to_string(),
            ..Default::default()
        }
    }

    /// Result for a solver error.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: SolutionStatus::Error,
            message: message.into(),
            ..Default::default()
        }
    }

    /// Attaches model size statistics.
    pub fn with_model_size(mut self, variables: usize, constraints: usize) -> Self {
        self.variables = variables;
        self.constraints = constraints;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_config_default() {
        let config = ExactConfig::default();
        assert_eq!(config.time_limit_ms, 10000);
        assert_eq!(config.max_candidates, 250);
    }

    #[test]
    fn test_exact_config_builder() {
        let config = ExactConfig::new()
            .with_time_limit_ms(5000)
            .with_max_candidates(100);
        assert_eq!(config.time_limit_ms, 5000);
        assert_eq!(config.max_candidates, 100);
    }

    #[test]
    fn test_is_within_limit() {
        let config = ExactConfig::default().with_max_candidates(10);
        assert!(config.is_within_limit(10));
        assert!(!config.is_within_limit(11));
    }

    #[test]
    fn test_solution_status_display() {
        assert_eq!(SolutionStatus::Optimal.to_string(), "Optimal");
        assert_eq!(SolutionStatus::Timeout.to_string(), "Timeout");
    }

    #[test]
    fn test_exact_result_constructors() {
        let result = ExactResult::optimal(416.0).with_model_size(90, 350);
        assert_eq!(result.status, SolutionStatus::Optimal);
        assert_eq!(result.objective_value, 416.0);
        assert_eq!(result.variables, 90);
        assert_eq!(result.constraints, 350);

        let result = ExactResult::infeasible();
        assert_eq!(result.status, SolutionStatus::Infeasible);
        assert_eq!(result.objective_value, 0.0);
    }
}
