//! External interfaces: solver inputs and configuration (spec §6).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::block::{Block, BlockId};
use super::common::Signature;
use super::tour::TourTemplate;

/// Which roster-generation engine to run (spec §4.4/§4.5).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Engine {
    /// Canonical min-cost flow block heuristic (C4).
    BlockHeuristic,
    /// Experimental set-partitioning column generation + LNS (C5/C6).
    ColumnGeneration,
}

/// How two consecutive-day 3er blocks should be treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FatigueRule {
    /// Forbid two 3er blocks on consecutive days for one driver (I2).
    NoConsecutiveTriple,
    /// Disable the fatigue rule entirely.
    None,
}

/// The forecast: a week anchor date and a list of tour templates (spec §6).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastInput {
    /// Calendar date of the Monday this week's `day` indices are anchored to,
    /// as an ISO-8601 date string (`YYYY-MM-DD`); the core treats it opaquely
    /// and only uses it for freeze-window absolute-time arithmetic (C9).
    pub week_anchor_date: String,
    /// The tour templates making up this week's forecast.
    pub templates: Vec<TourTemplate>,
}

/// All thresholds and knobs the solvers and validator consult (spec §6).
///
/// Defaults match the hard legal/operational thresholds named throughout
/// spec §3/§4; the column-generation tuning knobs (stall rounds, pruning
/// quotas) are re-derived from the testable properties in §8 rather than
/// copied from `original_source`'s historical values, per the Open
/// Questions note in spec §9.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Reserved for the experimental engine's internal tie-breaking; ignored
    /// by the canonical engine, which never uses randomness (spec §5).
    pub seed: u64,
    /// I3: max total weekly work hours.
    pub max_weekly_hours: f64,
    /// I1: minimum rest between consecutive days' blocks, in minutes.
    pub min_rest_min: i32,
    /// SPAN_REGULAR cap for 1er/2er-reg blocks, in minutes.
    pub span_regular_max_min: i32,
    /// SPAN_SPLIT cap for 2er-split blocks, in minutes.
    pub span_split_max_min: i32,
    /// Span cap for 3er blocks, in minutes.
    pub span_3er_max_min: i32,
    /// Minimum gap for a 2er-split pairing, in minutes.
    pub split_gap_min: i32,
    /// Maximum gap for a 2er-split pairing, in minutes.
    pub split_gap_max: i32,
    /// Minimum gap for intraday chaining (2er-reg / 3er), in minutes.
    pub chain_gap_min: i32,
    /// Maximum gap for intraday chaining (2er-reg / 3er), in minutes.
    pub chain_gap_max: i32,
    /// I4: max blocks (days) per week.
    pub max_blocks_per_week: usize,
    /// Whether consecutive 3er blocks are forbidden (I2).
    pub fatigue_rule: FatigueRule,
    /// Which solver family to run.
    pub engine: Engine,
    /// Per-call wall-clock limit for the RMP LP solve, in seconds.
    pub lp_time_limit_s: f64,
    /// Per-call wall-clock limit for the master MIP solve, in seconds.
    pub mip_time_limit_s: f64,
    /// Maximum column-generation rounds before the outer loop gives up.
    pub max_cg_rounds: usize,
    /// Global monotonic wall-clock budget across all column-generation
    /// rounds and the final master MIP combined (spec §5); each round caps
    /// its own LP/MIP call to `min(configured per-call cap, remaining)`.
    pub cg_deadline_s: f64,
    /// Number of consecutive stall rounds (no negative-reduced-cost column
    /// found, and no RMP incumbent) before ending the CG loop.
    pub max_stall_rounds: usize,
    /// Whether to run the LNS consolidator after the master MIP returns (C6).
    pub enable_lns: bool,
    /// Wall-clock budget for the LNS consolidator, in seconds.
    pub lns_budget_s: f64,
    /// Total-work-minute threshold below which a roster is a "low-hour
    /// pattern" the LNS consolidator targets for elimination.
    pub lns_low_hour_threshold_min: i32,
    /// Freeze window cutoff before a tour's start, in minutes (C9).
    pub freeze_minutes: i32,
    /// Whether an override mode may resolve frozen instances.
    pub freeze_override_allowed: bool,
    /// Penalty added to the master MIP objective per driver beyond the
    /// greedy-seed driver count (SPEC_FULL §B.3).
    pub driver_overage_penalty: f64,
    /// Base per-column penalty weight for PT-classified columns (SPEC_FULL §B.3).
    pub pt_weight_base: f64,
    /// Maximum per-column penalty weight for PT-classified columns.
    pub pt_weight_max: f64,
    /// Top-K starting tours considered per day during pricing (spec §4.5 step 3).
    pub top_k_start_tours: usize,
    /// Max successor candidates considered per starting tour during pricing.
    pub max_successors_per_tour: usize,
    /// Max third-tour candidates considered per leading pair while
    /// completing 3er blocks during partitioning (C3).
    pub max_triples_per_pair: usize,
    /// Hard cap on multi-day duties enumerated per day during pricing.
    pub max_multi_duties_per_day: usize,
    /// Names of the audit checks (spec §4.7) to run; a name absent from this
    /// list is disabled and simply does not appear in the `AuditReport`.
    pub enabled_audit_checks: Vec<String>,
    /// Perturbation deltas (in minutes/hours, matching each threshold's own
    /// unit) tried by the optional SENSITIVITY check when enabled.
    pub sensitivity_perturbations: Vec<i32>,
}

/// Default-enabled audit check names (every check in spec §4.7 except the
/// optional SENSITIVITY check, which is opt-in).
pub fn default_audit_checks() -> Vec<String> {
    [
        "COVERAGE",
        "OVERLAP",
        "REST",
        "SPAN_REGULAR",
        "SPAN_SPLIT",
        "FATIGUE",
        "WEEKLY_HOURS",
        "REPRODUCIBILITY",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            max_weekly_hours: 55.0,
            min_rest_min: 660,
            span_regular_max_min: 840,
            span_split_max_min: 960,
            span_3er_max_min: 930,
            split_gap_min: 240,
            split_gap_max: 360,
            chain_gap_min: 30,
            chain_gap_max: 60,
            max_blocks_per_week: 6,
            fatigue_rule: FatigueRule::NoConsecutiveTriple,
            engine: Engine::BlockHeuristic,
            lp_time_limit_s: 60.0,
            mip_time_limit_s: 300.0,
            max_cg_rounds: 200,
            cg_deadline_s: 600.0,
            max_stall_rounds: 10,
            enable_lns: false,
            lns_budget_s: 30.0,
            lns_low_hour_threshold_min: 30 * 60,
            freeze_minutes: 720,
            freeze_override_allowed: false,
            driver_overage_penalty: 500.0,
            pt_weight_base: 50.0,
            pt_weight_max: 200.0,
            top_k_start_tours: 30,
            max_successors_per_tour: 10,
            max_triples_per_pair: 3,
            max_multi_duties_per_day: 3_000,
            enabled_audit_checks: default_audit_checks(),
            sensitivity_perturbations: vec![5, 10, 15],
        }
    }
}

/// A prior locked plan's assignments, keyed by instance canonical signature
/// rather than by any database id (SPEC_FULL §B.6), consumed by C9.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FreezeContext {
    /// Instance signature -> (synthetic driver id, block id) from the last
    /// locked plan.
    pub prior_assignments: BTreeMap<Signature, (super::roster::SyntheticDriverId, BlockId)>,
    /// The prior locked plan's blocks, by block id, so the freeze overlay
    /// (C9) can reinsert a frozen instance's block unchanged rather than
    /// reconstructing it from the instance alone (SPEC_FULL §B.6).
    pub prior_blocks: BTreeMap<BlockId, Block>,
}

#[cfg(test)]
#[path = "../../tests/unit/models/config_test.rs"]
mod config_test;
