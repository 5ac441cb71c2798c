//! Exact placement selection via 0/1 linear programming.
//!
//! The maximum-weight independent set over the conflict graph is
//! formulated directly: one binary variable per allowed candidate, one
//! constraint `x_i + x_j <= 1` per conflict edge, objective
//! `maximize Σ weight_i · x_i`, solved with HiGHS through the `good_lp`
//! crate.
//!
//! Every failure mode — instance above the size cap, budget exhausted
//! while building the model, cancellation, solver error, or a solution
//! violating independence — returns `None`, and the caller substitutes
//! the greedy result. Exact solving never aborts a request.

use crate::candidate::PlacementCandidate;
use crate::constraint::ConflictGraph;
use siteplan_core::exact::{ExactConfig, ExactResult};

#[cfg(feature = "milp")]
use good_lp::{
    constraint, default_solver, variable, Expression, ProblemVariables, Solution, SolverModel,
    Variable,
};

use std::sync::atomic::AtomicBool;
#[cfg(feature = "milp")]
use std::sync::atomic::Ordering;
use std::time::Instant;

/// Outcome of a successful exact solve.
#[derive(Debug, Clone)]
pub struct ExactSelection {
    /// Selected candidate ids, sorted ascending.
    pub selected: Vec<u32>,
    /// Solver report.
    pub report: ExactResult,
}

/// Solves the selection sub-problem exactly.
///
/// `allowed` restricts the candidate universe; only conflict edges with
/// both endpoints allowed enter the model. Returns `None` whenever the
/// greedy fallback should be used instead.
#[cfg(feature = "milp")]
pub fn solve_exact_selection(
    candidates: &[PlacementCandidate],
    allowed: &[u32],
    graph: &ConflictGraph,
    exact_config: &ExactConfig,
    deadline: Option<Instant>,
    cancelled: &AtomicBool,
) -> Option<ExactSelection> {
    let n = allowed.len();
    if n == 0 {
        return Some(ExactSelection {
            selected: Vec::new(),
            report: ExactResult::infeasible(),
        });
    }
    if !exact_config.is_within_limit(n) {
        log::debug!(
            "sub-problem has {n} candidates, above the exact limit {}; using greedy",
            exact_config.max_candidates
        );
        return None;
    }

    let mut in_scope = vec![false; candidates.len()];
    for &id in allowed {
        in_scope[id as usize] = true;
    }

    let mut vars = ProblemVariables::new();
    let mut var_of: Vec<Option<Variable>> = vec![None; candidates.len()];
    for &id in allowed {
        var_of[id as usize] = Some(vars.add(variable().binary().name(format!("x_{id}"))));
    }

    let objective: Expression = allowed
        .iter()
        .map(|&id| {
            let var = var_of[id as usize].expect("variable created for every allowed id");
            candidates[id as usize].weight * var
        })
        .sum();

    let mut model = vars.maximise(objective).using(default_solver);

    let mut constraint_count = 0usize;
    for &(i, j) in graph.edges() {
        if !(in_scope[i as usize] && in_scope[j as usize]) {
            continue;
        }
        if cancelled.load(Ordering::Relaxed) {
            return None;
        }
        if let Some(deadline) = deadline {
            if Instant::now() >= deadline {
                log::warn!("exact model building exceeded its budget after {constraint_count} constraints");
                return None;
            }
        }
        let xi = var_of[i as usize].expect("endpoint in scope");
        let xj = var_of[j as usize].expect("endpoint in scope");
        model = model.with(constraint!(xi + xj <= 1.0));
        constraint_count += 1;
    }

    log::debug!("solving exact selection: {n} variables, {constraint_count} constraints");
    match model.solve() {
        Ok(solution) => {
            let mut selected: Vec<u32> = allowed
                .iter()
                .copied()
                .filter(|&id| {
                    let var = var_of[id as usize].expect("variable created for every allowed id");
                    solution.value(var) > 0.5
                })
                .collect();
            selected.sort_unstable();

            if !graph.is_independent(&selected) {
                log::error!("exact solver returned a conflicting selection; discarding it");
                return None;
            }

            let objective_value: f64 = selected
                .iter()
                .map(|&id| candidates[id as usize].weight)
                .sum();
            let report = if selected.is_empty() {
                ExactResult::infeasible()
            } else {
                ExactResult::optimal(objective_value)
            }
            .with_model_size(n, constraint_count);

            Some(ExactSelection { selected, report })
        }
        Err(e) => {
            log::warn!("exact solver failed: {e:?}");
            None
        }
    }
}

/// Stub used when the `milp` feature is disabled: always defers to the
/// greedy fallback.
#[cfg(not(feature = "milp"))]
pub fn solve_exact_selection(
    _candidates: &[PlacementCandidate],
    _allowed: &[u32],
    _graph: &ConflictGraph,
    _exact_config: &ExactConfig,
    _deadline: Option<Instant>,
    _cancelled: &AtomicBool,
) -> Option<ExactSelection> {
    log::warn!("exact solver not available (compile with the 'milp' feature)");
    None
}

/// True if the crate was compiled with the exact solver.
pub fn is_exact_available() -> bool {
    cfg!(feature = "milp")
}
