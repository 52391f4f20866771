use super::*;
use crate::models::block::{Block, BlockType};
use crate::models::config::SolverConfig;
use crate::models::plan::SolveStatus;

fn single_block(day: u8, start_min: i32, end_min: i32, tour_id: &str) -> Block {
    Block {
        block_id: format!("S_{day}_{start_min}_{tour_id}"),
        day,
        tour_ids: vec![tour_id.to_string()],
        start_min,
        end_min,
        work_min: end_min - start_min,
        span_min: end_min - start_min,
        max_gap_min: 0,
        crosses_midnight: false,
        block_type: BlockType::Single,
    }
}

fn config() -> SolverConfig {
    SolverConfig { engine: crate::models::config::Engine::ColumnGeneration, cg_deadline_s: 5.0, max_cg_rounds: 20, ..Default::default() }
}

#[test]
fn covers_every_block_exactly_once() {
    let cfg = config();
    let blocks = vec![single_block(1, 8 * 60, 16 * 60, "a"), single_block(2, 8 * 60, 16 * 60, "b"), single_block(3, 8 * 60, 16 * 60, "c")];

    let outcome = solve(&blocks, &cfg);
    assert!(matches!(outcome.status, SolveStatus::Ok | SolveStatus::TimeBudgetExhausted));

    let covered: usize = outcome.plan.rosters.iter().map(|r| r.blocks.len()).sum();
    assert_eq!(covered, blocks.len());
    assert_eq!(outcome.plan.assignments.len(), blocks.len());
}

#[test]
fn a_week_of_8_hour_days_consolidates_onto_one_driver() {
    let cfg = config();
    let blocks: Vec<Block> = (1..=5).map(|d| single_block(d, 8 * 60, 16 * 60, &format!("t{d}"))).collect();

    let outcome = solve(&blocks, &cfg);
    assert!(matches!(outcome.status, SolveStatus::Ok | SolveStatus::TimeBudgetExhausted));
    assert_eq!(outcome.plan.rosters.len(), 1);
}

#[test]
fn every_produced_roster_passes_validate_roster() {
    let cfg = config();
    let blocks: Vec<Block> = (1..=6).map(|d| single_block(d, 8 * 60, 16 * 60, &format!("t{d}"))).collect();

    let outcome = solve(&blocks, &cfg);
    for roster in &outcome.plan.rosters {
        assert!(crate::construction::validator::validate_roster(roster, &cfg).is_ok());
    }
}

#[test]
fn seed_pool_always_covers_every_instance() {
    let cfg = config();
    let blocks = vec![single_block(1, 8 * 60, 16 * 60, "a"), single_block(2, 8 * 60, 16 * 60, "b")];
    let pool = seed_pool(&blocks, &cfg);
    let covered: std::collections::BTreeSet<&str> = pool.values().flat_map(|c| c.tour_ids.iter().map(String::as_str)).collect();
    assert!(covered.contains("a"));
    assert!(covered.contains("b"));
}

#[test]
fn penalty_singleton_columns_cost_more_than_ordinary_ones() {
    let cfg = config();
    let block = single_block(1, 8 * 60, 16 * 60, "a");
    let ordinary = Column::from_blocks(vec![block.clone()], false);
    let penalty = Column::from_blocks(vec![block], true);
    assert!(penalty.cost(&cfg) > ordinary.cost(&cfg));
}

#[test]
fn telemetry_reports_one_entry_per_active_day() {
    let cfg = config();
    let blocks = vec![single_block(1, 8 * 60, 16 * 60, "a"), single_block(2, 8 * 60, 16 * 60, "b")];
    let outcome = solve(&blocks, &cfg);
    let days: std::collections::BTreeSet<_> = outcome.duty_telemetry.iter().map(|t| t.day).collect();
    assert!(days.contains(&1));
    assert!(days.contains(&2));
}
