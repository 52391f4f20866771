use super::*;
use crate::models::config::SolverConfig;
use crate::models::plan::Plan;
use crate::models::tour::TourInstance;

fn instance(id: &str, day: u8, start_min: i32, end_min: i32) -> TourInstance {
    TourInstance {
        instance_id: id.to_string(),
        template_id: id.to_string(),
        day,
        start_min,
        end_min,
        duration_min: end_min - start_min,
        crosses_midnight: false,
        depot: None,
        skills: Vec::new(),
        expansion_index: 1,
    }
}

fn block_of(day: u8, start_min: i32, end_min: i32, block_type: BlockType) -> Block {
    Block {
        block_id: format!("blk_{day}_{start_min}"),
        day,
        tour_ids: vec![format!("i{day}_{start_min}")],
        start_min,
        end_min,
        work_min: end_min - start_min,
        span_min: end_min - start_min,
        max_gap_min: 0,
        crosses_midnight: false,
        block_type,
    }
}

#[test]
fn can_chain_intraday_requires_same_day_and_non_overlap() {
    let t1 = instance("a", 1, 480, 960);
    let t2_same_day = instance("b", 1, 1000, 1100);
    let t2_other_day = instance("c", 2, 1000, 1100);
    let t2_overlapping = instance("d", 1, 900, 1100);

    assert!(can_chain_intraday(&t1, &t2_same_day));
    assert!(!can_chain_intraday(&t1, &t2_other_day));
    assert!(!can_chain_intraday(&t1, &t2_overlapping));
}

#[test]
fn can_chain_days_enforces_11_hour_rest() {
    let config = SolverConfig::default();
    // Mon ends 20:00, Tue starts 07:00: 11h exactly -> ok.
    let prev = block_of(1, 8 * 60, 20 * 60, BlockType::Single);
    let next_ok = block_of(2, 7 * 60, 15 * 60, BlockType::Single);
    let next_short = block_of(2, 6 * 60 + 59, 15 * 60, BlockType::Single);

    assert!(can_chain_days(&prev, &next_ok, &config));
    assert!(!can_chain_days(&prev, &next_short, &config));
}

#[test]
fn can_chain_days_handles_cross_midnight_via_absolute_offsets() {
    // S6: Mon 22:00-06:00 (cross-midnight, ends Tue 06:00), Tue 18:00-22:00.
    // Rest: Tue 06:00 -> Tue 18:00 = 12h >= 11h: PASS.
    let config = SolverConfig::default();
    let prev = block_of(1, 22 * 60, 30 * 60, BlockType::Single); // end_min = 30h encodes Tue 06:00
    let next = block_of(2, 18 * 60, 22 * 60, BlockType::Single);
    assert!(can_chain_days(&prev, &next, &config));

    // If Tue tour starts 16:00 instead, rest = 10h: FAIL.
    let next_tight = block_of(2, 16 * 60, 20 * 60, BlockType::Single);
    assert!(!can_chain_days(&prev, &next_tight, &config));
}

#[test]
fn validate_block_rejects_wrong_tour_count_for_type() {
    let config = SolverConfig::default();
    let mut b = block_of(1, 480, 960, BlockType::PairRegular);
    b.tour_ids = vec!["only_one".to_string()];
    assert!(validate_block(&b, &config).is_err());
}

#[test]
fn validate_block_enforces_span_cap_per_type() {
    let config = SolverConfig::default();
    let mut too_long = block_of(1, 0, 15 * 60 + 1, BlockType::PairRegular);
    too_long.tour_ids = vec!["a".to_string(), "b".to_string()];
    too_long.max_gap_min = 45;
    assert!(validate_block(&too_long, &config).is_err());
}

#[test]
fn validate_block_tours_rejects_overlapping_pair() {
    let config = SolverConfig::default();
    let a = instance("a", 1, 480, 960);
    let b = instance("b", 1, 900, 1000);
    assert!(validate_block_tours(&[&a, &b], BlockType::PairRegular, &config).is_err());
}

#[test]
fn validate_block_tours_accepts_valid_2er_split() {
    let config = SolverConfig::default();
    let a = instance("a", 1, 6 * 60, 10 * 60);
    let b = instance("b", 1, 15 * 60, 19 * 60);
    assert!(validate_block_tours(&[&a, &b], BlockType::PairSplit, &config).is_ok());
}

#[test]
fn validate_roster_rejects_more_than_6_blocks() {
    let config = SolverConfig::default();
    let blocks: Vec<Block> = (1..=7).map(|d| block_of(d, 8 * 60, 16 * 60, BlockType::Single)).collect();
    let roster = Roster { driver_id: 0, blocks };
    assert!(validate_roster(&roster, &config).is_err());
}

#[test]
fn validate_roster_rejects_over_55_hours() {
    let config = SolverConfig::default();
    let blocks = vec![
        block_of(1, 0, 16 * 60, BlockType::Single),
        block_of(2, 0, 16 * 60, BlockType::Single),
        block_of(3, 0, 16 * 60, BlockType::Single),
        block_of(4, 0, 8 * 60, BlockType::Single),
    ];
    let roster = Roster { driver_id: 0, blocks };
    assert!(roster.total_work_min() as f64 / 60.0 > 55.0);
    assert!(validate_roster(&roster, &config).is_err());
}

#[test]
fn validate_roster_rejects_consecutive_triple_blocks() {
    let config = SolverConfig::default();
    // Same-day span for a triple is irrelevant here; only the type and day adjacency matter.
    let day1 = Block {
        block_id: "T_day1".to_string(),
        day: 1,
        tour_ids: vec!["a".to_string(), "b".to_string(), "c".to_string()],
        start_min: 6 * 60,
        end_min: 17 * 60,
        work_min: 9 * 60,
        span_min: 11 * 60,
        max_gap_min: 45,
        crosses_midnight: false,
        block_type: BlockType::Triple,
    };
    let mut day2 = day1.clone();
    day2.block_id = "T_day2".to_string();
    day2.day = 2;
    day2.start_min = 6 * 60;
    day2.end_min = 17 * 60;

    let roster = Roster { driver_id: 0, blocks: vec![day1, day2] };
    assert!(validate_roster(&roster, &config).is_err());
}

#[test]
fn validate_roster_accepts_a_legal_week() {
    let config = SolverConfig::default();
    let blocks: Vec<Block> = (1..=5).map(|d| block_of(d, 8 * 60, 16 * 60, BlockType::Single)).collect();
    let roster = Roster { driver_id: 0, blocks };
    assert!(validate_roster(&roster, &config).is_ok());
}

#[test]
fn validate_plan_detects_missing_coverage() {
    let config = SolverConfig::default();
    let instances = vec![instance("a", 1, 480, 960), instance("b", 1, 1000, 1200)];
    let plan = Plan { rosters: Vec::new(), assignments: std::collections::BTreeMap::new() };
    assert!(validate_plan(&plan, &instances, &config).is_err());
}
