use super::*;
use crate::models::block::BlockType;

fn block(day: Day, work_min: i32) -> Block {
    Block {
        block_id: format!("S_day{day}"),
        day,
        tour_ids: vec![format!("i{day}")],
        start_min: 480,
        end_min: 480 + work_min,
        work_min,
        span_min: work_min,
        max_gap_min: 0,
        crosses_midnight: false,
        block_type: BlockType::Single,
    }
}

#[test]
fn total_work_min_sums_across_blocks() {
    let roster = Roster { driver_id: 0, blocks: vec![block(1, 480), block(2, 420)] };
    assert_eq!(roster.total_work_min(), 900);
}

#[test]
fn days_worked_counts_blocks() {
    let roster = Roster { driver_id: 0, blocks: vec![block(1, 480), block(2, 420)] };
    assert_eq!(roster.days_worked(), 2);
}

#[test]
fn classification_is_fte_at_exactly_40_hours() {
    let roster = Roster { driver_id: 0, blocks: vec![block(1, 40 * 60)] };
    assert_eq!(roster.classification(), DriverClass::Fte);
}

#[test]
fn classification_is_pt_below_40_hours() {
    let roster = Roster { driver_id: 0, blocks: vec![block(1, 40 * 60 - 1)] };
    assert_eq!(roster.classification(), DriverClass::Pt);
}

#[test]
fn blocks_by_day_sorts_regardless_of_insertion_order() {
    let roster = Roster { driver_id: 0, blocks: vec![block(3, 400), block(1, 400), block(2, 400)] };
    let days: Vec<Day> = roster.blocks_by_day().map(|b| b.day).collect();
    assert_eq!(days, vec![1, 2, 3]);
}

#[test]
fn active_days_are_sorted_and_deduplicated_source() {
    let roster = Roster { driver_id: 0, blocks: vec![block(5, 400), block(2, 400)] };
    assert_eq!(roster.active_days(), vec![2, 5]);
}
