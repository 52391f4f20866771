use super::*;
use crate::models::config::SolverConfig;
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

#[test]
fn singleton_instances_become_1er_blocks() {
    let config = SolverConfig::default();
    let instances = vec![instance("a", 1, 8 * 60, 16 * 60)];
    let blocks = partition(&instances, &config).expect("partitions cleanly");

    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0].block_type, BlockType::Single);
    assert_eq!(blocks[0].work_min, 8 * 60);
}

#[test]
fn forms_2er_regular_for_a_45_minute_gap() {
    // S2: Mon 06:00-10:00 and Mon 10:45-14:45, gap=45 min, span=8:45.
    let config = SolverConfig::default();
    let instances = vec![instance("a", 1, 6 * 60, 10 * 60), instance("b", 1, 10 * 60 + 45, 14 * 60 + 45)];
    let blocks = partition(&instances, &config).expect("partitions cleanly");

    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0].block_type, BlockType::PairRegular);
    assert_eq!(blocks[0].max_gap_min, 45);
    assert_eq!(blocks[0].span_min, 8 * 60 + 45);
}

#[test]
fn forms_2er_split_for_a_5_hour_gap() {
    // S3: Mon 06:00-10:00 and Mon 15:00-19:00, gap=5:00, span=13:00.
    let config = SolverConfig::default();
    let instances = vec![instance("a", 1, 6 * 60, 10 * 60), instance("b", 1, 15 * 60, 19 * 60)];
    let blocks = partition(&instances, &config).expect("partitions cleanly");

    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0].block_type, BlockType::PairSplit);
    assert_eq!(blocks[0].max_gap_min, 5 * 60);
    assert_eq!(blocks[0].span_min, 13 * 60);
}

#[test]
fn forms_3er_when_both_gaps_are_45_minutes() {
    // S4: Mon 06:00-09:00, 09:45-12:45, 13:30-17:00, gaps 45/45, span=11:00.
    let config = SolverConfig::default();
    let instances = vec![
        instance("a", 1, 6 * 60, 9 * 60),
        instance("b", 1, 9 * 60 + 45, 12 * 60 + 45),
        instance("c", 1, 13 * 60 + 30, 17 * 60),
    ];
    let blocks = partition(&instances, &config).expect("partitions cleanly");

    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0].block_type, BlockType::Triple);
    assert_eq!(blocks[0].span_min, 11 * 60);
    assert_eq!(blocks[0].tour_ids.len(), 3);
}

#[test]
fn prefers_3er_over_leaving_tours_as_singles() {
    let config = SolverConfig::default();
    let instances = vec![
        instance("a", 1, 6 * 60, 9 * 60),
        instance("b", 1, 9 * 60 + 45, 12 * 60 + 45),
        instance("c", 1, 13 * 60 + 30, 17 * 60),
        instance("d", 1, 19 * 60, 21 * 60),
    ];
    let blocks = partition(&instances, &config).expect("partitions cleanly");

    let triples = blocks.iter().filter(|b| b.block_type == BlockType::Triple).count();
    let singles = blocks.iter().filter(|b| b.block_type == BlockType::Single).count();
    assert_eq!(triples, 1);
    assert_eq!(singles, 1);
}

#[test]
fn partition_covers_every_instance_exactly_once() {
    let config = SolverConfig::default();
    let instances = vec![
        instance("a", 1, 6 * 60, 9 * 60),
        instance("b", 1, 9 * 60 + 45, 12 * 60 + 45),
        instance("c", 2, 8 * 60, 16 * 60),
        instance("d", 2, 16 * 60 + 30, 18 * 60),
    ];
    let blocks = partition(&instances, &config).expect("partitions cleanly");

    let mut covered: Vec<&str> = blocks.iter().flat_map(|b| b.tour_ids.iter().map(String::as_str)).collect();
    covered.sort_unstable();
    let mut expected: Vec<&str> = instances.iter().map(|i| i.instance_id.as_str()).collect();
    expected.sort_unstable();
    assert_eq!(covered, expected);
}

#[test]
fn partition_is_a_pure_function_of_the_instance_set() {
    let config = SolverConfig::default();
    let instances = vec![instance("a", 1, 6 * 60, 10 * 60), instance("b", 1, 10 * 60 + 45, 14 * 60 + 45)];

    let first = partition(&instances, &config).expect("partitions cleanly");
    let second = partition(&instances, &config).expect("partitions cleanly");

    let first_ids: Vec<&str> = first.iter().map(|b| b.block_id.as_str()).collect();
    let second_ids: Vec<&str> = second.iter().map(|b| b.block_id.as_str()).collect();
    assert_eq!(first_ids, second_ids);
}

#[test]
fn every_emitted_block_passes_validate_block() {
    let config = SolverConfig::default();
    let instances = vec![
        instance("a", 1, 6 * 60, 9 * 60),
        instance("b", 1, 9 * 60 + 45, 12 * 60 + 45),
        instance("c", 1, 13 * 60 + 30, 17 * 60),
        instance("d", 1, 19 * 60, 21 * 60),
    ];
    let blocks = partition(&instances, &config).expect("partitions cleanly");
    for block in &blocks {
        assert!(crate::construction::validator::validate_block(block, &config).is_ok());
    }
}

#[test]
fn a_gap_outside_every_block_pattern_falls_back_to_singles() {
    // 15-minute gap is too tight for 2er-reg (30-60) and too short for split (240-360).
    let config = SolverConfig::default();
    let instances = vec![instance("a", 1, 6 * 60, 10 * 60), instance("b", 1, 10 * 60 + 15, 14 * 60)];
    let blocks = partition(&instances, &config).expect("partitions cleanly");

    assert_eq!(blocks.len(), 2);
    assert!(blocks.iter().all(|b| b.block_type == BlockType::Single));
}
