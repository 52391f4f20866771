//! Solving: the two solver families (C4, C5+C6) and the top-level pipeline
//! that wires expansion, freezing, partitioning, solving, auditing and
//! hashing together into one call (spec §2, §4).

pub mod block_heuristic;
pub mod column_generation;
pub mod deadline;
pub mod lns;
pub mod lp_backend;
pub mod min_cost_flow;

use log::warn;

use crate::audit;
use crate::construction::{expand, partition};
use crate::error::SolverResult;
use crate::freeze;
use crate::hashing;
use crate::models::config::{Engine, ForecastInput, FreezeContext, SolverConfig};
use crate::models::plan::{AuditReport, PlanResult, SolveStatus};

/// Runs the full pipeline for one week: expand (C2) -> freeze split (C9) ->
/// partition (C3) -> solve (C4 or C5+C6) -> freeze merge (C9) -> audit (C7)
/// -> fingerprint (C8) (spec §2's data-flow diagram).
///
/// The audit always runs and is always returned alongside the `PlanResult`,
/// even when it reports a FAIL - "the plan and its audit report are still
/// emitted" (spec §4.7). Turning an audit failure into a hard `Err` is left
/// to the caller (e.g. a CLI mapping `AuditReport::all_pass()` to its exit
/// code, spec §6), since [`PlanResult`] itself carries no audit field.
pub fn solve(
    forecast: &ForecastInput,
    config: &SolverConfig,
    freeze_context: Option<&FreezeContext>,
    now_min: i64,
    override_mode: bool,
) -> SolverResult<(PlanResult, AuditReport)> {
    let instances = expand(&forecast.templates)?;
    let split = freeze::classify(&instances, now_min, config, freeze_context, override_mode);

    for warning in &split.warnings {
        warn!("{warning}");
    }

    let blocks = partition(&split.unfrozen, config)?;

    let (plan, status, first_uncoverable_block, duty_telemetry) = match config.engine {
        Engine::BlockHeuristic => {
            let outcome = block_heuristic::solve(&blocks, config);
            (outcome.plan, outcome.status, outcome.first_uncoverable_block, Vec::new())
        }
        Engine::ColumnGeneration => {
            let outcome = column_generation::solve(&blocks, config);
            let plan = if outcome.status == SolveStatus::Ok { lns::consolidate(outcome.plan, config) } else { outcome.plan };
            (plan, outcome.status, outcome.first_uncoverable_block, outcome.duty_telemetry)
        }
    };

    let (plan, merge_warnings) = freeze::merge_frozen(plan, &split.frozen, freeze_context);
    for warning in &merge_warnings {
        warn!("{warning}");
    }

    let input_hash = hashing::input_hash(&forecast.templates);
    let solver_config_hash = hashing::solver_config_hash(config);
    let output_hash = hashing::output_hash(&plan);

    let report = audit::audit(&plan, &instances, config, &output_hash);
    if !report.all_pass() {
        warn!("audit reported failing checks: {:?}", report.failed_checks());
    }

    let result = PlanResult { plan, status, input_hash, solver_config_hash, output_hash, duty_telemetry, first_uncoverable_block };
    Ok((result, report))
}
