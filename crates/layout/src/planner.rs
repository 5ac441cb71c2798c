//! Layout request orchestration.
//!
//! [`LayoutPlanner`] drives the pipeline:
//! validate → generate candidates → feasibility filter → conflict graph
//! → optimize per sub-problem → score → rank. The planner holds no state
//! between requests beyond its configuration and the cancellation flag.

use crate::candidate::{self, PlacementCandidate};
use crate::constraint::{build_conflict_graph, ConflictGraph, ConstraintValidator};
use crate::greedy::select_greedy;
use crate::milp_solver::solve_exact_selection;
use crate::module::ModuleType;
use crate::parcel::Parcel;
use crate::ranker;
use crate::result::{Layout, PlacedModule, PlanDiagnostics, PlanOutcome, SubProblemReport, SubProblemStatus};
use crate::scoring::evaluate_selection;
use rayon::prelude::*;
use siteplan_core::transform::to_geographic;
use siteplan_core::{
    Config, Error, ExactConfig, OrientationMode, ProgressCallback, ProgressInfo, Result, Strategy,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// One independent selection sub-problem: an orientation restriction and
/// a module-catalog subset over the shared candidate universe.
#[derive(Debug, Clone)]
struct SubProblem {
    label: String,
    orientation: OrientationMode,
    modules: Vec<usize>,
}

impl SubProblem {
    fn allows(&self, candidate: &PlacementCandidate) -> bool {
        self.orientation.allows(candidate.orientation)
            && self.modules.contains(&candidate.module_index)
    }
}

fn orientation_label(mode: OrientationMode) -> &'static str {
    match mode {
        OrientationMode::Any => "any",
        OrientationMode::AxisA => "axis-a",
        OrientationMode::AxisB => "axis-b",
    }
}

/// Enumerates the sub-problems for a request: every orientation variant
/// crossed with the full catalog plus (when the catalog has more than one
/// type) each single-type restriction.
fn subproblem_set(catalog: &[ModuleType], mode: OrientationMode) -> Vec<SubProblem> {
    let mut subproblems = Vec::new();
    for variant in mode.variants() {
        subproblems.push(SubProblem {
            label: format!("{}/all", orientation_label(variant)),
            orientation: variant,
            modules: (0..catalog.len()).collect(),
        });
        if catalog.len() > 1 {
            for (index, module) in catalog.iter().enumerate() {
                subproblems.push(SubProblem {
                    label: format!("{}/{}", orientation_label(variant), module.name),
                    orientation: variant,
                    modules: vec![index],
                });
            }
        }
    }
    subproblems
}

fn report(progress: Option<&ProgressCallback>, info: ProgressInfo) {
    if let Some(callback) = progress {
        callback(info);
    }
}

/// Parcel layout planner.
///
/// ```rust
/// use siteplan_layout::{LayoutPlanner, ModuleType, Parcel};
/// use siteplan_core::{Config, Strategy};
///
/// let parcel = Parcel::new(vec![(0.0, 0.0), (100.0, 0.0), (100.0, 100.0), (0.0, 100.0)]);
/// let catalog = vec![ModuleType::new("Section A", 26.0, 16.0)];
/// let config = Config::new()
///     .with_strategy(Strategy::Greedy)
///     .with_margin(5.0)
///     .with_spacing(2.0)
///     .with_floors(5);
///
/// let planner = LayoutPlanner::new(config);
/// let outcome = planner.solve(&parcel, &catalog).unwrap();
/// assert!(outcome.best().is_some());
/// ```
pub struct LayoutPlanner {
    config: Config,
    exact_config: ExactConfig,
    cancelled: Arc<AtomicBool>,
}

impl LayoutPlanner {
    /// Creates a planner with the given configuration.
    pub fn new(config: Config) -> Self {
        Self {
            config,
            exact_config: ExactConfig::default(),
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Creates a planner with default configuration.
    pub fn default_config() -> Self {
        Self::new(Config::default())
    }

    /// Overrides the exact-solver configuration.
    pub fn with_exact_config(mut self, exact_config: ExactConfig) -> Self {
        self.exact_config = exact_config;
        self
    }

    /// The planner's configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Solves a layout request.
    pub fn solve(&self, parcel: &Parcel, catalog: &[ModuleType]) -> Result<PlanOutcome> {
        self.solve_impl(parcel, catalog, None)
    }

    /// Solves a layout request, reporting progress at phase and
    /// sub-problem boundaries.
    pub fn solve_with_progress(
        &self,
        parcel: &Parcel,
        catalog: &[ModuleType],
        callback: ProgressCallback,
    ) -> Result<PlanOutcome> {
        self.solve_impl(parcel, catalog, Some(&callback))
    }

    /// Requests cooperative cancellation of an ongoing solve.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    fn solve_impl(
        &self,
        parcel: &Parcel,
        catalog: &[ModuleType],
        progress: Option<&ProgressCallback>,
    ) -> Result<PlanOutcome> {
        let start = Instant::now();
        self.cancelled.store(false, Ordering::Relaxed);

        report(progress, ProgressInfo::new().with_phase("validating"));
        parcel.validate()?;
        self.config.validate()?;
        if catalog.is_empty() {
            return Err(Error::InfeasibleParameters("module catalog is empty".into()));
        }
        for module in catalog {
            module.validate()?;
        }

        let bbox = parcel.aabb_2d();
        let usable_width = bbox.width() - 2.0 * self.config.margin;
        let usable_height = bbox.height() - 2.0 * self.config.margin;
        let any_fits = catalog
            .iter()
            .any(|m| m.fits_within(usable_width, usable_height, self.config.orientation));
        if !any_fits {
            return Err(Error::InfeasibleParameters(format!(
                "no module type fits the parcel bounding box eroded by margin {}",
                self.config.margin
            )));
        }

        match self.worker_pool()? {
            Some(pool) => Ok(pool.install(|| self.run_pipeline(parcel, catalog, start, progress))),
            None => Ok(self.run_pipeline(parcel, catalog, start, progress)),
        }
    }

    fn worker_pool(&self) -> Result<Option<rayon::ThreadPool>> {
        if self.config.threads == 0 {
            return Ok(None);
        }
        rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.threads)
            .build()
            .map(Some)
            .map_err(|e| Error::Internal(format!("failed to build worker pool: {e}")))
    }

    fn run_pipeline(
        &self,
        parcel: &Parcel,
        catalog: &[ModuleType],
        start: Instant,
        progress: Option<&ProgressCallback>,
    ) -> PlanOutcome {
        let elapsed_ms = |start: Instant| start.elapsed().as_millis() as u64;

        report(progress, ProgressInfo::new().with_phase("generating candidates"));
        let generated = candidate::generate(parcel, catalog, &self.config);
        let candidates_generated = generated.len();
        log::debug!("generated {candidates_generated} candidates");

        let validator = ConstraintValidator::new(parcel, &self.config);
        let keep: Vec<bool> = generated
            .par_iter()
            .map(|c| !self.cancelled.load(Ordering::Relaxed) && validator.is_feasible(c))
            .collect();
        let mut feasible: Vec<PlacementCandidate> = Vec::new();
        for (mut candidate, keep) in generated.into_iter().zip(keep) {
            if keep {
                candidate.id = feasible.len() as u32;
                feasible.push(candidate);
            }
        }
        let candidates_feasible = feasible.len();
        log::debug!("{candidates_feasible} candidates feasible");

        if feasible.is_empty() {
            log::warn!("request produced no feasible candidates");
            report(
                progress,
                ProgressInfo::new()
                    .with_phase("complete")
                    .with_elapsed(elapsed_ms(start))
                    .finished(),
            );
            return PlanOutcome {
                layouts: Vec::new(),
                diagnostics: PlanDiagnostics {
                    candidates_generated,
                    candidates_feasible,
                    computation_time_ms: elapsed_ms(start),
                    cancelled: self.cancelled.load(Ordering::Relaxed),
                    note: Some(
                        "no feasible candidates: parcel, margin and module dimensions admit no placement"
                            .into(),
                    ),
                    ..Default::default()
                },
            };
        }

        report(progress, ProgressInfo::new().with_phase("building conflict graph"));
        let graph = build_conflict_graph(&feasible, &validator, &self.cancelled);
        log::debug!("conflict graph has {} edges", graph.edge_count());

        let subproblems = subproblem_set(catalog, self.config.orientation);
        let total = subproblems.len();
        report(
            progress,
            ProgressInfo::new()
                .with_phase("optimizing")
                .with_subproblems(0, total)
                .with_elapsed(elapsed_ms(start)),
        );

        let solutions: Vec<Option<(Vec<u32>, SubProblemStatus, usize)>> = subproblems
            .par_iter()
            .map(|sp| {
                if self.cancelled.load(Ordering::Relaxed) {
                    return None;
                }
                let allowed: Vec<u32> = feasible
                    .iter()
                    .filter(|c| sp.allows(c))
                    .map(|c| c.id)
                    .collect();
                let allowed_count = allowed.len();
                let (selected, status) = self.solve_subproblem(&feasible, &allowed, &graph, start);
                Some((selected, status, allowed_count))
            })
            .collect();

        let parcel_area = parcel.area();
        let mut layouts = Vec::new();
        let mut reports = Vec::new();
        let mut best_score = f64::NEG_INFINITY;
        for (done, (sp, solution)) in subproblems.iter().zip(solutions).enumerate() {
            let Some((selected, status, allowed_count)) = solution else {
                continue;
            };
            let metrics =
                evaluate_selection(&feasible, &selected, catalog, parcel_area, &self.config);
            let layout = build_layout(parcel, &feasible, selected, metrics, &sp.label, status);
            best_score = best_score.max(layout.metrics.score);
            reports.push(SubProblemReport {
                label: sp.label.clone(),
                status,
                candidates: allowed_count,
                placed: layout.placed_count(),
                score: layout.metrics.score,
            });
            report(
                progress,
                ProgressInfo::new()
                    .with_phase("optimizing")
                    .with_subproblems(done + 1, total)
                    .with_layouts(layouts.len() + 1)
                    .with_best_score(best_score)
                    .with_elapsed(elapsed_ms(start)),
            );
            layouts.push(layout);
        }

        report(progress, ProgressInfo::new().with_phase("ranking"));
        let ranked = ranker::rank(layouts, self.config.max_results);

        let outcome = PlanOutcome {
            diagnostics: PlanDiagnostics {
                candidates_generated,
                candidates_feasible,
                conflict_edges: graph.edge_count(),
                subproblems: reports,
                computation_time_ms: elapsed_ms(start),
                cancelled: self.cancelled.load(Ordering::Relaxed),
                note: None,
            },
            layouts: ranked,
        };

        report(
            progress,
            ProgressInfo::new()
                .with_phase("complete")
                .with_subproblems(total, total)
                .with_layouts(outcome.layouts.len())
                .with_best_score(outcome.best().map_or(0.0, |l| l.metrics.score))
                .with_elapsed(outcome.diagnostics.computation_time_ms)
                .finished(),
        );
        outcome
    }

    /// Solves one sub-problem, falling back to greedy whenever the exact
    /// path is unavailable, over budget, or fails.
    fn solve_subproblem(
        &self,
        feasible: &[PlacementCandidate],
        allowed: &[u32],
        graph: &ConflictGraph,
        start: Instant,
    ) -> (Vec<u32>, SubProblemStatus) {
        let exact_attempt = match self.config.strategy {
            Strategy::Greedy => None,
            Strategy::Exact | Strategy::Auto => {
                let deadline = self.exact_deadline(start);
                solve_exact_selection(
                    feasible,
                    allowed,
                    graph,
                    &self.exact_config,
                    deadline,
                    &self.cancelled,
                )
            }
        };

        match exact_attempt {
            Some(selection) => {
                let status = if selection.selected.is_empty() {
                    SubProblemStatus::Empty
                } else {
                    SubProblemStatus::Exact
                };
                (selection.selected, status)
            }
            None => {
                if self.config.strategy != Strategy::Greedy {
                    log::warn!("exact selection unavailable for sub-problem, using greedy fallback");
                }
                let selected = select_greedy(feasible, allowed, graph);
                let status = if selected.is_empty() {
                    SubProblemStatus::Empty
                } else {
                    SubProblemStatus::Greedy
                };
                (selected, status)
            }
        }
    }

    /// Per-sub-problem exact deadline: the exact solver's own budget,
    /// capped by the request's remaining time.
    fn exact_deadline(&self, start: Instant) -> Option<Instant> {
        let global = match self.config.time_limit_ms {
            0 => None,
            ms => Some(start + Duration::from_millis(ms)),
        };
        match self.exact_config.time_limit_ms {
            0 => global,
            ms => {
                let own = Instant::now() + Duration::from_millis(ms);
                Some(global.map_or(own, |g| g.min(own)))
            }
        }
    }
}

/// Materializes a layout from a selected candidate subset.
fn build_layout(
    parcel: &Parcel,
    feasible: &[PlacementCandidate],
    selected: Vec<u32>,
    metrics: crate::scoring::LayoutMetrics,
    label: &str,
    status: SubProblemStatus,
) -> Layout {
    let reference = parcel.geo_reference();
    let placements = selected
        .iter()
        .map(|&id| {
            let candidate = &feasible[id as usize];
            let footprint = candidate.footprint();
            let footprint_geographic = reference.map(|reference| {
                footprint
                    .iter()
                    .map(|&point| to_geographic(point, reference))
                    .collect()
            });
            PlacedModule {
                module: candidate.module_name.clone(),
                anchor: candidate.anchor,
                orientation_deg: candidate.orientation.angle_degrees(),
                footprint,
                footprint_geographic,
            }
        })
        .collect();

    Layout {
        placements,
        candidate_ids: selected,
        metrics,
        subproblem: label.to_string(),
        status,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::module;

    fn square_parcel(side: f64) -> Parcel {
        Parcel::new(vec![(0.0, 0.0), (side, 0.0), (side, side), (0.0, side)])
    }

    #[test]
    fn test_subproblem_enumeration() {
        let catalog = module::standard_sections();
        // 3 orientation variants x (1 full + 4 singletons) = 15.
        assert_eq!(subproblem_set(&catalog, OrientationMode::Any).len(), 15);
        // Single orientation, single module: just the full set.
        let one = vec![ModuleType::new("A", 26.0, 16.0)];
        assert_eq!(subproblem_set(&one, OrientationMode::AxisA).len(), 1);
    }

    #[test]
    fn test_subproblem_allows() {
        let sp = SubProblem {
            label: "axis-a/0".into(),
            orientation: OrientationMode::AxisA,
            modules: vec![0],
        };
        let mut candidate = PlacementCandidate {
            id: 0,
            module_index: 0,
            module_name: "A".into(),
            anchor: (0.0, 0.0),
            orientation: siteplan_core::Orientation::AxisA,
            width: 26.0,
            height: 16.0,
            weight: 416.0,
        };
        assert!(sp.allows(&candidate));
        candidate.orientation = siteplan_core::Orientation::AxisB;
        assert!(!sp.allows(&candidate));
        candidate.orientation = siteplan_core::Orientation::AxisA;
        candidate.module_index = 1;
        assert!(!sp.allows(&candidate));
    }

    #[test]
    fn test_solve_is_deterministic() {
        let parcel = square_parcel(100.0);
        let catalog = vec![ModuleType::new("A", 26.0, 16.0)];
        let config = Config::new()
            .with_strategy(Strategy::Greedy)
            .with_margin(5.0)
            .with_spacing(2.0)
            .with_grid_step(8.0);

        let planner = LayoutPlanner::new(config);
        let first = planner.solve(&parcel, &catalog).unwrap();
        let second = planner.solve(&parcel, &catalog).unwrap();

        assert_eq!(first.layouts.len(), second.layouts.len());
        for (a, b) in first.layouts.iter().zip(&second.layouts) {
            assert_eq!(a.candidate_ids, b.candidate_ids);
            assert_eq!(a.metrics.score, b.metrics.score);
        }
    }

    #[test]
    fn test_thread_count_does_not_change_results() {
        let parcel = square_parcel(100.0);
        let catalog = vec![
            ModuleType::new("A", 26.0, 16.0),
            ModuleType::new("D", 18.0, 18.0),
        ];
        let base = Config::new()
            .with_strategy(Strategy::Greedy)
            .with_margin(5.0)
            .with_spacing(2.0)
            .with_grid_step(10.0);

        let serial = LayoutPlanner::new(base.clone().with_threads(1))
            .solve(&parcel, &catalog)
            .unwrap();
        let parallel = LayoutPlanner::new(base.with_threads(4))
            .solve(&parcel, &catalog)
            .unwrap();

        assert_eq!(serial.layouts.len(), parallel.layouts.len());
        for (a, b) in serial.layouts.iter().zip(&parallel.layouts) {
            assert_eq!(a.candidate_ids, b.candidate_ids);
        }
    }

    #[test]
    fn test_progress_reports_phases() {
        use std::sync::Mutex;

        let parcel = square_parcel(100.0);
        let catalog = vec![ModuleType::new("A", 26.0, 16.0)];
        let config = Config::new()
            .with_strategy(Strategy::Greedy)
            .with_margin(5.0)
            .with_grid_step(10.0);

        let phases: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = phases.clone();
        let planner = LayoutPlanner::new(config);
        planner
            .solve_with_progress(
                &parcel,
                &catalog,
                Box::new(move |info| sink.lock().unwrap().push(info.phase)),
            )
            .unwrap();

        let phases = phases.lock().unwrap();
        assert_eq!(phases.first().map(String::as_str), Some("validating"));
        assert_eq!(phases.last().map(String::as_str), Some("complete"));
        assert!(phases.iter().any(|p| p == "optimizing"));
    }
}
