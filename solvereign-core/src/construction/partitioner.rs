//! C3: deterministic partitioning of a day's tour instances into blocks.
//!
//! No randomness, no shuffle-by-seed: the partition is a pure function of
//! the instance set, anchored on the stable key `(start_min, end_min,
//! instance_id)` at every decision point (spec §4.3, §9 design notes).

use log::debug;

use crate::construction::validator::validate_block_tours;
use crate::error::{SolverError, SolverResult};
use crate::models::block::{Block, BlockId, BlockType};
use crate::models::common::Day;
use crate::models::config::SolverConfig;
use crate::models::tour::TourInstance;

/// Partitions every instance in `instances` into a disjoint, covering set of
/// valid blocks, processing days in ascending order (spec §4.3).
pub fn partition(instances: &[TourInstance], config: &SolverConfig) -> SolverResult<Vec<Block>> {
    let mut by_day: std::collections::BTreeMap<Day, Vec<&TourInstance>> = std::collections::BTreeMap::new();
    for instance in instances {
        by_day.entry(instance.day).or_default().push(instance);
    }

    let mut blocks = Vec::new();
    for (day, mut day_instances) in by_day {
        sort_by_stable_key(&mut day_instances);
        let day_blocks = partition_day(day, &day_instances, config)?;
        blocks.extend(day_blocks);
    }

    debug!("partitioned {} instances into {} blocks", instances.len(), blocks.len());

    Ok(blocks)
}

fn sort_by_stable_key(instances: &mut [&TourInstance]) {
    instances.sort_by(|a, b| (a.start_min, a.end_min, &a.instance_id).cmp(&(b.start_min, b.end_min, &b.instance_id)));
}

/// Forms blocks for a single day's already stable-key-sorted instances, in
/// priority order 3er -> 2er-reg -> 2er-split -> 1er (spec §4.3).
fn partition_day(day: Day, day_instances: &[&TourInstance], config: &SolverConfig) -> SolverResult<Vec<Block>> {
    let n = day_instances.len();
    let mut active = vec![true; n];
    let mut blocks = Vec::new();

    run_triple_phase(day_instances, &mut active, config, &mut blocks);
    run_pair_phase(day_instances, &mut active, config, &mut blocks, BlockType::PairRegular);
    run_pair_phase(day_instances, &mut active, config, &mut blocks, BlockType::PairSplit);

    for (i, instance) in day_instances.iter().enumerate() {
        if active[i] {
            blocks.push(build_block(&[instance], BlockType::Single));
            active[i] = false;
        }
    }

    for instance in day_instances {
        if !blocks.iter().any(|b| b.tour_ids.contains(&instance.instance_id)) {
            return Err(SolverError::PartitionFailure {
                instance: instance.instance_id.clone(),
                reason: format!("no valid block could be formed for day {day}"),
            });
        }
    }

    Ok(blocks)
}

fn run_triple_phase(day_instances: &[&TourInstance], active: &mut [bool], config: &SolverConfig, blocks: &mut Vec<Block>) {
    let n = day_instances.len();
    for i in 0..n {
        if !active[i] {
            continue;
        }
        let t1 = day_instances[i];

        let mut successors: Vec<usize> = (0..n)
            .filter(|&j| active[j] && j != i && gap_in_range(t1, day_instances[j], config.chain_gap_min, config.chain_gap_max))
            .collect();
        successors.sort_by_key(|&j| (day_instances[j].start_min, day_instances[j].end_min, day_instances[j].instance_id.clone()));

        let mut formed = false;
        for &j in &successors {
            let t2 = day_instances[j];

            let mut thirds: Vec<usize> = (0..n)
                .filter(|&k| active[k] && k != i && k != j && gap_in_range(t2, day_instances[k], config.chain_gap_min, config.chain_gap_max))
                .collect();
            thirds.sort_by_key(|&k| (day_instances[k].start_min, day_instances[k].end_min, day_instances[k].instance_id.clone()));
            thirds.truncate(config.max_triples_per_pair);

            for &k in &thirds {
                let t3 = day_instances[k];
                let candidate = [t1, t2, t3];
                if validate_block_tours(&candidate, BlockType::Triple, config).is_ok() {
                    blocks.push(build_block(&candidate, BlockType::Triple));
                    active[i] = false;
                    active[j] = false;
                    active[k] = false;
                    formed = true;
                    break;
                }
            }
            if formed {
                break;
            }
        }
    }
}

fn run_pair_phase(
    day_instances: &[&TourInstance],
    active: &mut [bool],
    config: &SolverConfig,
    blocks: &mut Vec<Block>,
    block_type: BlockType,
) {
    let (gap_min, gap_max) = match block_type {
        BlockType::PairRegular => (config.chain_gap_min, config.chain_gap_max),
        BlockType::PairSplit => (config.split_gap_min, config.split_gap_max),
        _ => unreachable!("run_pair_phase only handles pair block types"),
    };

    let n = day_instances.len();
    for i in 0..n {
        if !active[i] {
            continue;
        }
        let t1 = day_instances[i];

        let mut successors: Vec<usize> = (0..n)
            .filter(|&j| active[j] && j != i && gap_in_range(t1, day_instances[j], gap_min, gap_max))
            .collect();
        successors.sort_by_key(|&j| (day_instances[j].start_min, day_instances[j].end_min, day_instances[j].instance_id.clone()));

        for &j in &successors {
            let t2 = day_instances[j];
            let candidate = [t1, t2];
            if validate_block_tours(&candidate, block_type, config).is_ok() {
                blocks.push(build_block(&candidate, block_type));
                active[i] = false;
                active[j] = false;
                break;
            }
        }
    }
}

fn gap_in_range(t1: &TourInstance, t2: &TourInstance, gap_min: i32, gap_max: i32) -> bool {
    if t1.day != t2.day || t1.end_min > t2.start_min {
        return false;
    }
    let gap = t2.start_min - t1.end_min;
    gap >= gap_min && gap <= gap_max
}

fn build_block(tours: &[&TourInstance], block_type: BlockType) -> Block {
    let mut sorted = tours.to_vec();
    sorted.sort_by_key(|t| (t.start_min, t.end_min, t.instance_id.clone()));

    let day = sorted[0].day;
    let start_min = sorted.iter().map(|t| t.start_min).min().unwrap();
    let last_tour = sorted.iter().max_by_key(|t| t.end_min).unwrap();
    let end_min = last_tour.end_min;
    let crosses_midnight = last_tour.crosses_midnight;
    let work_min = sorted.iter().map(|t| t.duration_min).sum();
    let span_min = if crosses_midnight {
        end_min + crate::models::common::MINUTES_PER_DAY as i32 - start_min
    } else {
        end_min - start_min
    };
    let max_gap_min = sorted.windows(2).map(|w| w[1].start_min - w[0].end_min).max().unwrap_or(0);
    let tour_ids: Vec<String> = sorted.iter().map(|t| t.instance_id.clone()).collect();

    let mut sig_sources = tour_ids.clone();
    sig_sources.sort();
    let signature = crate::models::common::canonical_signature(&sig_sources.iter().map(String::as_str).collect::<Vec<_>>());
    let block_id: BlockId = Block::mint_id(block_type, &signature);

    Block { block_id, day, tour_ids, start_min, end_min, work_min, span_min, max_gap_min, crosses_midnight, block_type }
}

#[cfg(test)]
#[path = "../../tests/unit/construction/partitioner_test.rs"]
mod partitioner_test;
