//! C7: re-runs every invariant as an independent check over a produced plan,
//! classified by name and severity (spec §4.7).
//!
//! Every check here re-derives its verdict directly from the plan and the
//! instance set rather than trusting whatever the solver that produced the
//! plan believed - "a solver that produces an un-auditable plan is, by
//! definition, wrong" (spec §4.7). Checks never panic; every outcome is a
//! structured [`AuditCheckResult`], including on success.

use std::collections::{BTreeMap, HashMap};

use serde_json::json;

use crate::construction::validator::{can_chain_intraday, rest_minutes};
use crate::models::block::{Block, BlockType};
use crate::models::common::WeekCategory;
use crate::models::config::SolverConfig;
use crate::models::plan::{AuditCheckResult, AuditReport, AuditStatus, Plan};
use crate::models::tour::TourInstance;

/// Runs every check named in `config.enabled_audit_checks` over `plan`
/// (spec §4.7). `output_hash` is the fingerprint already stamped on the
/// `PlanResult` under audit, so REPRODUCIBILITY can compare it against a
/// fresh recomputation without this module depending on C8's internals.
pub fn audit(plan: &Plan, instances: &[TourInstance], config: &SolverConfig, output_hash: &str) -> AuditReport {
    let by_id: HashMap<&str, &TourInstance> = instances.iter().map(|i| (i.instance_id.as_str(), i)).collect();

    let mut report = AuditReport::default();
    for name in &config.enabled_audit_checks {
        let result = match name.as_str() {
            "COVERAGE" => check_coverage(plan, instances),
            "OVERLAP" => check_overlap(plan, &by_id),
            "REST" => check_rest(plan, config),
            "SPAN_REGULAR" => check_span_regular(plan, config),
            "SPAN_SPLIT" => check_span_split(plan, config),
            "FATIGUE" => check_fatigue(plan, config),
            "WEEKLY_HOURS" => check_weekly_hours(plan, config),
            "REPRODUCIBILITY" => check_reproducibility(plan, output_hash),
            "SENSITIVITY" => check_sensitivity(plan, config),
            other => AuditCheckResult { status: AuditStatus::Warn, violation_count: 0, details: json!({"unknown_check": other}) },
        };
        report.checks.insert(name.clone(), result);
    }

    report
}

fn pass(details: serde_json::Value) -> AuditCheckResult {
    AuditCheckResult { status: AuditStatus::Pass, violation_count: 0, details }
}

fn fail(count: usize, details: serde_json::Value) -> AuditCheckResult {
    AuditCheckResult { status: AuditStatus::Fail, violation_count: count, details }
}

/// P1: every instance appears in exactly one roster's assignment, no extras.
fn check_coverage(plan: &Plan, instances: &[TourInstance]) -> AuditCheckResult {
    let expected: std::collections::BTreeSet<&str> = instances.iter().map(|i| i.instance_id.as_str()).collect();
    let assigned: std::collections::BTreeSet<&str> = plan.assignments.keys().map(String::as_str).collect();

    let missing: Vec<&str> = expected.difference(&assigned).copied().collect();
    let extra: Vec<&str> = assigned.difference(&expected).copied().collect();

    if missing.is_empty() && extra.is_empty() {
        pass(json!({"instances": instances.len()}))
    } else {
        fail(missing.len() + extra.len(), json!({"missing": missing, "extra": extra}))
    }
}

/// Defense-in-depth re-check: no roster carries two blocks on the same day,
/// and no two tours within one block overlap.
fn check_overlap(plan: &Plan, by_id: &HashMap<&str, &TourInstance>) -> AuditCheckResult {
    let mut violations = Vec::new();

    for roster in &plan.rosters {
        let mut by_day: BTreeMap<_, Vec<&Block>> = BTreeMap::new();
        for block in &roster.blocks {
            by_day.entry(block.day).or_default().push(block);
        }
        for (day, blocks) in by_day {
            if blocks.len() > 1 {
                violations.push(json!({"driver_id": roster.driver_id, "day": day, "reason": "two blocks on same day"}));
            }
            for block in blocks {
                let tours: Vec<&TourInstance> = block.tour_ids.iter().filter_map(|id| by_id.get(id.as_str()).copied()).collect();
                for pair in tours.windows(2) {
                    if pair[0].overlaps(pair[1]) {
                        violations.push(json!({
                            "block_id": block.block_id,
                            "tours": [pair[0].instance_id, pair[1].instance_id],
                        }));
                    }
                }
            }
        }
    }

    if violations.is_empty() {
        pass(json!({}))
    } else {
        fail(violations.len(), json!({"violations": violations}))
    }
}

/// I1: consecutive-day block ends->starts >= `min_rest_min`, honoring
/// cross-midnight via absolute week-minute offsets.
fn check_rest(plan: &Plan, config: &SolverConfig) -> AuditCheckResult {
    let mut violations = Vec::new();

    for roster in &plan.rosters {
        let sorted: Vec<&Block> = roster.blocks_by_day().collect();
        for pair in sorted.windows(2) {
            let rest = rest_minutes(pair[0], pair[1]);
            if rest < config.min_rest_min as i64 {
                violations.push(json!({
                    "driver_id": roster.driver_id,
                    "day_prev": pair[0].day,
                    "day_next": pair[1].day,
                    "rest_min": rest,
                    "required_min": config.min_rest_min,
                }));
            }
        }
    }

    if violations.is_empty() {
        pass(json!({}))
    } else {
        fail(violations.len(), json!({"violations": violations}))
    }
}

/// For every 1er/2er-reg day-block, span <= `span_regular_max_min`; for
/// 3er, span <= `span_3er_max_min` (spec §4.7).
fn check_span_regular(plan: &Plan, config: &SolverConfig) -> AuditCheckResult {
    let mut violations = Vec::new();
    for roster in &plan.rosters {
        for block in &roster.blocks {
            let max_span = match block.block_type {
                BlockType::Single | BlockType::PairRegular => config.span_regular_max_min,
                BlockType::Triple => config.span_3er_max_min,
                BlockType::PairSplit => continue,
            };
            if block.span_min > max_span {
                violations.push(json!({"driver_id": roster.driver_id, "block_id": block.block_id, "span_min": block.span_min}));
            }
        }
    }
    if violations.is_empty() {
        pass(json!({}))
    } else {
        fail(violations.len(), json!({"violations": violations}))
    }
}

/// For every 2er-split, span <= `span_split_max_min` and gap within
/// `[split_gap_min, split_gap_max]`.
fn check_span_split(plan: &Plan, config: &SolverConfig) -> AuditCheckResult {
    let mut violations = Vec::new();
    for roster in &plan.rosters {
        for block in &roster.blocks {
            if block.block_type != BlockType::PairSplit {
                continue;
            }
            let span_ok = block.span_min <= config.span_split_max_min;
            let gap_ok = block.max_gap_min >= config.split_gap_min && block.max_gap_min <= config.split_gap_max;
            if !span_ok || !gap_ok {
                violations.push(json!({
                    "driver_id": roster.driver_id,
                    "block_id": block.block_id,
                    "span_min": block.span_min,
                    "gap_min": block.max_gap_min,
                }));
            }
        }
    }
    if violations.is_empty() {
        pass(json!({}))
    } else {
        fail(violations.len(), json!({"violations": violations}))
    }
}

/// I2: no roster has two 3er blocks on consecutive days.
fn check_fatigue(plan: &Plan, config: &SolverConfig) -> AuditCheckResult {
    use crate::models::config::FatigueRule;
    if matches!(config.fatigue_rule, FatigueRule::None) {
        return pass(json!({"fatigue_rule": "none"}));
    }

    let mut violations = Vec::new();
    for roster in &plan.rosters {
        let sorted: Vec<&Block> = roster.blocks_by_day().collect();
        for pair in sorted.windows(2) {
            if pair[1].day == pair[0].day + 1 && pair[0].block_type == BlockType::Triple && pair[1].block_type == BlockType::Triple {
                violations.push(json!({"driver_id": roster.driver_id, "day_prev": pair[0].day, "day_next": pair[1].day}));
            }
        }
    }
    if violations.is_empty() {
        pass(json!({}))
    } else {
        fail(violations.len(), json!({"violations": violations}))
    }
}

/// I3: every roster's total weekly work <= `max_weekly_hours`.
fn check_weekly_hours(plan: &Plan, config: &SolverConfig) -> AuditCheckResult {
    let mut violations = Vec::new();
    for roster in &plan.rosters {
        let hours = roster.total_work_min() as f64 / 60.0;
        if hours > config.max_weekly_hours {
            violations.push(json!({"driver_id": roster.driver_id, "hours": hours}));
        }
    }
    if violations.is_empty() {
        pass(json!({"rosters": plan.rosters.len()}))
    } else {
        fail(violations.len(), json!({"violations": violations}))
    }
}

/// P3: recomputing `output_hash` from the plan equals the stored value.
fn check_reproducibility(plan: &Plan, stored_output_hash: &str) -> AuditCheckResult {
    let recomputed = crate::hashing::output_hash(plan);
    if recomputed == stored_output_hash {
        pass(json!({"output_hash": recomputed}))
    } else {
        fail(1, json!({"stored": stored_output_hash, "recomputed": recomputed}))
    }
}

/// Optional: for a small perturbation set of hard thresholds, estimates
/// churn as the fraction of rosters whose `validate_roster` verdict would
/// flip from PASS to FAIL under each tightened threshold, averaged across
/// `config.sensitivity_perturbations`. WARN (not FAIL) at >= 10% churn,
/// since this check estimates fragility rather than re-verifying a hard rule.
fn check_sensitivity(plan: &Plan, config: &SolverConfig) -> AuditCheckResult {
    use crate::construction::validator::validate_roster;

    if plan.rosters.is_empty() {
        return pass(json!({"rosters": 0}));
    }

    let mut churn_by_delta = Vec::new();
    for &delta in &config.sensitivity_perturbations {
        let mut tightened = config.clone();
        tightened.min_rest_min += delta;
        tightened.span_regular_max_min -= delta;
        tightened.span_split_max_min -= delta;
        tightened.span_3er_max_min -= delta;

        let flips = plan.rosters.iter().filter(|r| validate_roster(r, &tightened).is_err()).count();
        let churn = flips as f64 / plan.rosters.len() as f64;
        churn_by_delta.push(json!({"delta_min": delta, "churn": churn}));
    }

    let worst_churn = config
        .sensitivity_perturbations
        .iter()
        .zip(churn_by_delta.iter())
        .map(|(_, v)| v["churn"].as_f64().unwrap_or(0.0))
        .fold(0.0_f64, f64::max);

    let week_category = WeekCategory::from_active_day_count(plan.rosters.iter().flat_map(|r| r.active_days()).collect::<std::collections::BTreeSet<_>>().len());

    let details = json!({"by_delta": churn_by_delta, "worst_churn": worst_churn, "week_category": format!("{week_category:?}")});
    if worst_churn < 0.10 {
        pass(details)
    } else {
        AuditCheckResult { status: AuditStatus::Warn, violation_count: 0, details }
    }
}

#[cfg(test)]
#[path = "../tests/unit/audit_test.rs"]
mod audit_test;
