//! C1: stateless predicates over tours/blocks/rosters for every hard rule.
//!
//! Concentrating all numeric thresholds here is the single source of truth
//! that both solvers (C4, C5) and the audit layer (C7) consume (spec §4.1).
//! Every function here is a pure predicate: no state, no I/O, no mutation.

use std::collections::BTreeSet;

use crate::models::block::{Block, BlockType};
use crate::models::common::absolute_minute_crossing;
use crate::models::config::SolverConfig;
use crate::models::plan::Plan;
use crate::models::roster::Roster;
use crate::models::tour::TourInstance;

/// `(ok, reason?)` outcome, matching spec §4.1's predicate shape.
pub type ValidationOutcome = Result<(), String>;

/// Checks whether `t1` can be immediately followed by `t2` within the same day:
/// same day and `t1.end_min <= t2.start_min` (spec §4.1).
pub fn can_chain_intraday(t1: &TourInstance, t2: &TourInstance) -> bool {
    t1.day == t2.day && t1.end_min <= t2.start_min
}

/// Checks whether `b_next` may follow `b_prev` on a later day: the absolute
/// time delta between `b_prev`'s end and `b_next`'s start (honoring
/// cross-midnight via each block's own day/end_min pair) is at least
/// `config.min_rest_min` (spec §4.1, I1).
pub fn can_chain_days(b_prev: &Block, b_next: &Block, config: &SolverConfig) -> bool {
    if b_next.day <= b_prev.day {
        return false;
    }
    rest_minutes(b_prev, b_next) >= config.min_rest_min as i64
}

/// Absolute rest gap in minutes between the end of `b_prev` and the start of
/// `b_next`, honoring cross-midnight blocks via absolute week-minute offsets.
pub fn rest_minutes(b_prev: &Block, b_next: &Block) -> i64 {
    let abs_end = absolute_minute_crossing(b_prev.day, b_prev.end_min, b_prev.crosses_midnight);
    let abs_start = absolute_minute_crossing(b_next.day, b_next.start_min, false);
    abs_start - abs_end
}

/// Validates a fully-constructed block's own aggregate fields against the
/// rules implied by its declared [`BlockType`] (spec §3/§4.1). This is the
/// "defense in depth" re-check the audit layer (C7) runs without needing the
/// original tour list - it only trusts `span_min`/`max_gap_min`/`tour_ids`.
pub fn validate_block(block: &Block, config: &SolverConfig) -> ValidationOutcome {
    if block.tour_ids.len() != block.block_type.tour_count() {
        return Err(format!(
            "block {}: {:?} requires {} tours, has {}",
            block.block_id,
            block.block_type,
            block.block_type.tour_count(),
            block.tour_ids.len()
        ));
    }
    if block.end_min <= block.start_min {
        return Err(format!("block {}: end_min must exceed start_min", block.block_id));
    }
    match block.block_type {
        BlockType::Single => Ok(()),
        BlockType::PairRegular => check_span_and_gap(
            block,
            config.chain_gap_min,
            config.chain_gap_max,
            config.span_regular_max_min,
        ),
        BlockType::PairSplit => {
            check_span_and_gap(block, config.split_gap_min, config.split_gap_max, config.span_split_max_min)
        }
        BlockType::Triple => check_span_and_gap(
            block,
            config.chain_gap_min,
            config.chain_gap_max,
            config.span_3er_max_min,
        ),
    }
}

fn check_span_and_gap(block: &Block, gap_min: i32, gap_max: i32, span_max: i32) -> ValidationOutcome {
    if block.span_min > span_max {
        return Err(format!(
            "block {}: span {} exceeds max {} for {:?}",
            block.block_id, block.span_min, span_max, block.block_type
        ));
    }
    if block.max_gap_min < gap_min || block.max_gap_min > gap_max {
        return Err(format!(
            "block {}: gap {} outside [{},{}] for {:?}",
            block.block_id, block.max_gap_min, gap_min, gap_max, block.block_type
        ));
    }
    Ok(())
}

/// Validates a candidate set of tours (sorted by start time) against an
/// intended [`BlockType`] before a [`Block`] is minted (spec §4.3): checks
/// same-day membership, pairwise time disjointness, the block's pairwise gap
/// pattern and its span bound. Used by the partitioner (C3) to test
/// candidates in priority order.
pub fn validate_block_tours(tours: &[&TourInstance], intended_type: BlockType, config: &SolverConfig) -> ValidationOutcome {
    if tours.len() != intended_type.tour_count() {
        return Err(format!("{:?} requires {} tours, got {}", intended_type, intended_type.tour_count(), tours.len()));
    }
    let day = tours[0].day;
    if tours.iter().any(|t| t.day != day) {
        return Err("all tours in a block must share the same day".to_string());
    }
    for pair in tours.windows(2) {
        if !can_chain_intraday(pair[0], pair[1]) {
            return Err(format!("tours {} and {} overlap or are out of order", pair[0].instance_id, pair[1].instance_id));
        }
    }
    let start_min = tours.iter().map(|t| t.start_min).min().unwrap();
    let end_min = tours.iter().map(|t| t.end_min).max().unwrap();
    let span_min = end_min - start_min;

    match intended_type {
        BlockType::Single => Ok(()),
        BlockType::PairRegular => check_gaps_and_span(tours, config.chain_gap_min, config.chain_gap_max, span_min, config.span_regular_max_min),
        BlockType::PairSplit => check_gaps_and_span(tours, config.split_gap_min, config.split_gap_max, span_min, config.span_split_max_min),
        BlockType::Triple => check_gaps_and_span(tours, config.chain_gap_min, config.chain_gap_max, span_min, config.span_3er_max_min),
    }
}

fn check_gaps_and_span(
    tours: &[&TourInstance],
    gap_min: i32,
    gap_max: i32,
    span_min: i32,
    span_max: i32,
) -> ValidationOutcome {
    if span_min > span_max {
        return Err(format!("span {span_min} exceeds max {span_max}"));
    }
    for pair in tours.windows(2) {
        let gap = pair[1].start_min - pair[0].end_min;
        if gap < gap_min || gap > gap_max {
            return Err(format!("gap {gap} between {} and {} outside [{gap_min},{gap_max}]", pair[0].instance_id, pair[1].instance_id));
        }
    }
    Ok(())
}

/// Validates a roster against I1 (rest), I2 (fatigue), I3 (55h cap), I4 (6
/// days cap), per spec §3.
pub fn validate_roster(roster: &Roster, config: &SolverConfig) -> ValidationOutcome {
    if roster.blocks.len() > config.max_blocks_per_week {
        return Err(format!(
            "roster {}: {} blocks exceeds max {} (I4)",
            roster.driver_id,
            roster.blocks.len(),
            config.max_blocks_per_week
        ));
    }

    let total_hours = roster.total_work_min() as f64 / 60.0;
    if total_hours > config.max_weekly_hours {
        return Err(format!(
            "roster {}: {total_hours:.2}h exceeds max {}h (I3)",
            roster.driver_id, config.max_weekly_hours
        ));
    }

    let sorted: Vec<&Block> = roster.blocks_by_day().collect();
    for pair in sorted.windows(2) {
        if pair[0].day == pair[1].day {
            return Err(format!("roster {}: two blocks on day {} (at most one per day)", roster.driver_id, pair[0].day));
        }
        if !can_chain_days(pair[0], pair[1], config) {
            return Err(format!(
                "roster {}: rest {} min between day {} and day {} below min {} (I1)",
                roster.driver_id,
                rest_minutes(pair[0], pair[1]),
                pair[0].day,
                pair[1].day,
                config.min_rest_min
            ));
        }
        if matches!(config.fatigue_rule, crate::models::config::FatigueRule::NoConsecutiveTriple)
            && pair[1].day == pair[0].day + 1
            && pair[0].block_type == BlockType::Triple
            && pair[1].block_type == BlockType::Triple
        {
            return Err(format!(
                "roster {}: consecutive 3er blocks on days {} and {} (I2, fatigue rule)",
                roster.driver_id, pair[0].day, pair[1].day
            ));
        }
    }

    Ok(())
}

/// Validates a plan against P1 (every instance covered exactly once) and P2
/// (every roster satisfies I1..I4). P3 (the reproducibility fingerprint) is
/// computed and checked by C8/the REPRODUCIBILITY audit, not here.
pub fn validate_plan(plan: &Plan, instances: &[TourInstance], config: &SolverConfig) -> ValidationOutcome {
    let expected: BTreeSet<&str> = instances.iter().map(|i| i.instance_id.as_str()).collect();
    let assigned: BTreeSet<&str> = plan.assignments.keys().map(String::as_str).collect();

    if expected != assigned {
        let missing: Vec<&str> = expected.difference(&assigned).copied().collect();
        let extra: Vec<&str> = assigned.difference(&expected).copied().collect();
        return Err(format!("coverage mismatch: missing={missing:?} extra={extra:?} (P1)"));
    }

    for roster in &plan.rosters {
        validate_roster(roster, config)?;
    }

    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/construction/validator_test.rs"]
mod validator_test;
