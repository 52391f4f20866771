//! Plans, their solver outputs, and audit reports (spec §3, §4.7, §6).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::block::BlockId;
use super::roster::{Roster, SyntheticDriverId};
use super::tour::InstanceId;

/// A set of rosters plus the tour-instance -> roster assignment (spec §3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plan {
    /// The rosters making up this plan.
    pub rosters: Vec<Roster>,
    /// `instance_id -> (driver_id, block_id)`, satisfying P1: every instance
    /// appears exactly once.
    pub assignments: BTreeMap<InstanceId, (SyntheticDriverId, BlockId)>,
}

impl Plan {
    /// KPI: count of FTE-classified rosters.
    pub fn fte_count(&self) -> usize {
        self.rosters.iter().filter(|r| matches!(r.classification(), super::roster::DriverClass::Fte)).count()
    }

    /// KPI: count of PT-classified rosters.
    pub fn pt_count(&self) -> usize {
        self.rosters.len() - self.fte_count()
    }

    /// KPI: total weekly work minutes summed across all rosters.
    pub fn total_work_min(&self) -> i64 {
        self.rosters.iter().map(|r| r.total_work_min() as i64).sum()
    }

    /// KPI: (min, avg, max) weekly work hours across rosters; `None` for an empty plan.
    pub fn hour_stats(&self) -> Option<(f64, f64, f64)> {
        if self.rosters.is_empty() {
            return None;
        }
        let hours: Vec<f64> = self.rosters.iter().map(|r| r.total_work_min() as f64 / 60.0).collect();
        let min = hours.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = hours.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let avg = hours.iter().sum::<f64>() / hours.len() as f64;
        Some((min, avg, max))
    }
}

/// Terminal status of a solve attempt, matching the CLI exit-code contract
/// in spec §6 (`0` on Ok, `1` on TimeBudgetExhausted, `2` on Infeasible).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SolveStatus {
    /// Solve completed; every audit in §4.7 is expected to PASS.
    Ok,
    /// Deadline cut the solve short; `Plan` is the best incumbent found.
    TimeBudgetExhausted,
    /// No feasible plan exists under the hard invariants and configured caps.
    Infeasible,
}

/// The full output of a solve invocation (spec §6).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanResult {
    /// The produced plan (best incumbent if `status != Ok`).
    pub plan: Plan,
    /// Terminal status.
    pub status: SolveStatus,
    /// SHA-256 canonical fingerprint of the (sorted) input templates (C8).
    pub input_hash: String,
    /// SHA-256 canonical fingerprint of the solver configuration (C8).
    pub solver_config_hash: String,
    /// SHA-256 canonical fingerprint of the plan's assignments (P3, C8).
    pub output_hash: String,
    /// Per-day duty-builder telemetry, present only when `engine =
    /// ColumnGeneration` ran pricing (SPEC_FULL §B.2).
    pub duty_telemetry: Vec<DutyTelemetry>,
    /// The first block id that could not be covered, when `status = Infeasible`.
    pub first_uncoverable_block: Option<BlockId>,
}

/// Per-day pricing telemetry, mirroring `DutyBuilderTelemetry` in
/// `original_source/.../duty_builder.py` (SPEC_FULL §B.2).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DutyTelemetry {
    /// Weekday index this telemetry record covers.
    pub day: super::common::Day,
    /// Number of tours considered on this day.
    pub tours_count: usize,
    /// Number of singleton duties generated (never capped).
    pub singletons_count: usize,
    /// Number of 2-tour duties generated.
    pub pairs_count: usize,
    /// Number of 3-tour duties generated.
    pub triples_count: usize,
    /// Whether the per-day multi-duty cap was hit and pruning applied.
    pub cap_hit: bool,
    /// Tour ids with the highest dual value considered this round, for diagnosis.
    pub top_dual_tours: Vec<InstanceId>,
}

/// Status of a single audit check (spec §4.7).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuditStatus {
    /// The check found no violations.
    Pass,
    /// The check found at least one violation.
    Fail,
    /// The check ran but reports a soft concern, not a hard failure.
    Warn,
}

/// Result of one audit check (spec §4.7): absence of a name from
/// [`AuditReport::checks`] means the check was disabled in configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditCheckResult {
    /// PASS/FAIL/WARN.
    pub status: AuditStatus,
    /// Count of violations found (0 for PASS).
    pub violation_count: usize,
    /// Structured, check-specific detail (offending ids, computed deltas).
    pub details: serde_json::Value,
}

/// The full audit report for one plan: one entry per enabled check name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuditReport {
    /// Check name -> result, in the order the checks ran.
    pub checks: BTreeMap<String, AuditCheckResult>,
}

impl AuditReport {
    /// True if every check in the report passed.
    pub fn all_pass(&self) -> bool {
        self.checks.values().all(|r| r.status == AuditStatus::Pass)
    }

    /// Names of every check that reported FAIL, in report order.
    pub fn failed_checks(&self) -> Vec<String> {
        self.checks
            .iter()
            .filter(|(_, r)| r.status == AuditStatus::Fail)
            .map(|(name, _)| name.clone())
            .collect()
    }
}

/// An audit event recorded when the freeze overlay's override mode resolves
/// a frozen instance (spec §4.9; shape resolved in SPEC_FULL §B.7).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverrideEvent {
    /// Who requested the override.
    pub actor: String,
    /// Why the override was requested.
    pub reason: String,
    /// Instances whose freeze was overridden.
    pub affected_instance_ids: Vec<InstanceId>,
    /// A logical, input-derived ordinal rather than a wall-clock timestamp,
    /// so that re-auditing identical override data reproduces identical JSON.
    pub logical_sequence: u64,
}

#[cfg(test)]
#[path = "../../tests/unit/models/plan_test.rs"]
mod plan_test;
