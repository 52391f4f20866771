//! The LP/MIP back-end boundary for the column-generation master problem
//! (spec §4.5, §9 design notes).
//!
//! Spec §9 deliberately leaves the back-end's identity out of the core: "the
//! interface assumed here is a callable with `(variables, coefficients,
//! coverage constraints, time_limit) -> {status, column_values, duals}`. Any
//! back-end offering this contract suffices." [`solve_relaxation`] and
//! [`solve_mip`] are that callable, backed by `good_lp` (the teacher has no
//! LP/MIP need of its own; `good_lp` is the idiomatic pluggable-solver crate
//! for this).

use good_lp::solvers::highs::highs;
use good_lp::{constraint, variable, Expression, Solution, SolverModel};

use crate::prelude::{GenericError, GenericResult};

/// Status of one master LP/MIP call, mirroring the callable contract in
/// spec §9.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MasterStatus {
    /// An optimal (or time-limited best-known) solution was found.
    Optimal,
    /// The solver proved infeasibility.
    Infeasible,
    /// The solver returned neither an optimum nor a proof of infeasibility
    /// within budget (spec §4.5 step "RMP `UNKNOWN`").
    Unknown,
}

/// Outcome of solving the continuous relaxation of the set-partition master
/// for one column pool: which columns the LP selected (fractionally) and an
/// approximate per-instance dual price.
///
/// `good_lp`'s solver-agnostic `Solution` trait does not expose simplex
/// duals uniformly across back-ends, so duals here are an approximation -
/// for each covered instance, the cost of the cheapest column in the pool
/// that covers it with non-trivial LP weight, spread across how many
/// instances that column covers. This is the "greedy dual" heuristic used
/// by several hand-rolled column generators when an exact dual isn't
/// cheaply available; it is directionally correct (scarce instances get a
/// higher price) even if not a true LP shadow price, which is adequate for
/// *guiding* pricing rather than proving optimality.
pub struct RelaxationResult {
    /// Status of the relaxation solve.
    pub status: MasterStatus,
    /// Column index -> LP weight in `[0, 1]`.
    pub column_values: Vec<f64>,
    /// Instance id -> approximate dual price.
    pub duals: std::collections::BTreeMap<String, f64>,
}

/// Outcome of solving the integer set-partition master.
pub struct MipResult {
    /// Status of the MIP solve.
    pub status: MasterStatus,
    /// Indices of columns selected (binary variable == 1).
    pub selected: Vec<usize>,
}

/// One pool column's cost and coverage, as the master problem sees it -
/// decoupled from [`super::column_generation::Column`] so this module has
/// no dependency on the column-generation internals.
pub struct MasterColumn<'a> {
    /// Objective coefficient (driver cost + PT penalty, spec §4.5/SPEC_FULL §B.3).
    pub cost: f64,
    /// Instance ids this column covers.
    pub covers: &'a [String],
}

/// Solves the continuous relaxation (spec §4.5 step 2) to obtain duals.
/// `time_limit_s` caps the solver's own wall clock, already reduced by the
/// caller to `min(config.lp_time_limit_s, remaining round deadline)` (spec
/// §5).
pub fn solve_relaxation(columns: &[MasterColumn], instance_ids: &[String], time_limit_s: f64) -> GenericResult<RelaxationResult> {
    let mut vars = good_lp::variables!();
    let column_vars: Vec<_> = columns.iter().map(|_| vars.add(variable().min(0.0).max(1.0))).collect();

    let objective: Expression = columns.iter().zip(&column_vars).map(|(c, v)| *v * c.cost).sum();
    let mut model = vars.minimise(objective).using(highs);
    model.set_time_limit(time_limit_s);

    for instance_id in instance_ids {
        let coverage: Expression =
            columns.iter().zip(&column_vars).filter(|(c, _)| c.covers.iter().any(|i| i == instance_id)).map(|(_, v)| Expression::from(*v)).sum();
        model = model.with(constraint!(coverage == 1.0));
    }

    let solution = match model.solve() {
        Ok(solution) => solution,
        Err(_) => {
            return Ok(RelaxationResult { status: MasterStatus::Infeasible, column_values: vec![0.0; columns.len()], duals: Default::default() })
        }
    };

    let column_values: Vec<f64> = column_vars.iter().map(|v| solution.value(*v)).collect();

    let mut duals = std::collections::BTreeMap::new();
    for instance_id in instance_ids {
        let covering: Vec<usize> = columns.iter().enumerate().filter(|(_, c)| c.covers.iter().any(|i| i == instance_id)).map(|(i, _)| i).collect();
        let weighted_cost: f64 = covering
            .iter()
            .filter(|&&i| column_values[i] > 1e-6)
            .map(|&i| columns[i].cost * column_values[i] / columns[i].covers.len().max(1) as f64)
            .sum();
        let active_weight: f64 = covering.iter().filter(|&&i| column_values[i] > 1e-6).map(|&i| column_values[i]).sum();
        let dual = if active_weight > 1e-9 { weighted_cost / active_weight } else { 0.0 };
        duals.insert(instance_id.clone(), dual);
    }

    Ok(RelaxationResult { status: MasterStatus::Optimal, column_values, duals })
}

/// Solves the final integer set-partition (spec §4.5 step 5) over the pool.
/// `time_limit_s` caps the solver's own wall clock the same way as
/// [`solve_relaxation`] (spec §5).
pub fn solve_mip(columns: &[MasterColumn], instance_ids: &[String], time_limit_s: f64) -> GenericResult<MipResult> {
    if columns.is_empty() {
        return Ok(MipResult { status: MasterStatus::Infeasible, selected: Vec::new() });
    }

    let mut vars = good_lp::variables!();
    let column_vars: Vec<_> = columns.iter().map(|_| vars.add(variable().binary())).collect();

    let objective: Expression = columns.iter().zip(&column_vars).map(|(c, v)| *v * c.cost).sum();
    let mut model = vars.minimise(objective).using(highs);
    model.set_time_limit(time_limit_s);

    for instance_id in instance_ids {
        let coverage: Expression =
            columns.iter().zip(&column_vars).filter(|(c, _)| c.covers.iter().any(|i| i == instance_id)).map(|(_, v)| Expression::from(*v)).sum();
        model = model.with(constraint!(coverage == 1.0));
    }

    let solution = match model.solve() {
        Ok(solution) => solution,
        Err(err) => return Err(Box::from(format!("master MIP solve failed: {err}")) as GenericError),
    };

    let selected: Vec<usize> = column_vars.iter().enumerate().filter(|(_, v)| solution.value(**v) > 0.5).map(|(i, _)| i).collect();

    if selected.is_empty() {
        return Ok(MipResult { status: MasterStatus::Infeasible, selected });
    }

    Ok(MipResult { status: MasterStatus::Optimal, selected })
}

#[cfg(test)]
#[path = "../../tests/unit/solve/lp_backend_test.rs"]
mod lp_backend_test;
