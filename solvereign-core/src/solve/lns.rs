//! C6: the experimental engine's endgame local search, invoked after the
//! master MIP returns a feasible plan (spec §4.6). Purely monotone: a
//! destroy-and-repair attempt is committed only if it strictly improves the
//! low-hour-pattern count without growing the driver count.

use log::{debug, info};

use crate::construction::validator::validate_roster;
use crate::models::block::Block;
use crate::models::config::SolverConfig;
use crate::models::plan::Plan;
use crate::models::roster::SyntheticDriverId;

use super::deadline::Deadline;

/// Runs LNS consolidation over `plan` until the wall-clock budget expires or
/// a full pass eliminates no further low-hour roster (spec §4.6). A no-op
/// when `config.enable_lns` is false.
pub fn consolidate(plan: Plan, config: &SolverConfig) -> Plan {
    if !config.enable_lns {
        return plan;
    }

    let deadline = Deadline::starting_now(config.lns_budget_s);
    let mut plan = plan;
    let mut total_eliminated = 0usize;

    'passes: loop {
        if deadline.expired() {
            break;
        }
        let candidates = low_hour_order(&plan, config);
        if candidates.is_empty() {
            break;
        }

        for donor_id in candidates {
            if deadline.expired() {
                break 'passes;
            }
            if try_eliminate_roster(&mut plan, donor_id, config) {
                total_eliminated += 1;
                debug!("lns: eliminated low-hour roster {donor_id}, {total_eliminated} total so far");
                continue 'passes; // roster set changed; recompute candidates from the fresh plan
            }
        }

        // No candidate in this pass could be eliminated; further attempts
        // would repeat the same failures, so stop.
        break;
    }

    if total_eliminated > 0 {
        info!("lns: eliminated {total_eliminated} low-hour rosters within {:.1}s", deadline.elapsed_s());
    }
    renumber_drivers(plan)
}

/// Low-hour rosters (below `config.lns_low_hour_threshold_min`), smallest
/// total hours first, the same destroy priority C4 Phase B uses for PT
/// donors (spec §4.4, §4.6).
fn low_hour_order(plan: &Plan, config: &SolverConfig) -> Vec<SyntheticDriverId> {
    let mut low_hour: Vec<(i32, SyntheticDriverId)> = plan
        .rosters
        .iter()
        .filter(|r| r.total_work_min() < config.lns_low_hour_threshold_min)
        .map(|r| (r.total_work_min(), r.driver_id))
        .collect();
    low_hour.sort();
    low_hour.into_iter().map(|(_, id)| id).collect()
}

fn low_hour_count(plan: &Plan, config: &SolverConfig) -> usize {
    plan.rosters.iter().filter(|r| r.total_work_min() < config.lns_low_hour_threshold_min).count()
}

/// Attempts to destroy `donor_id`'s roster entirely: every one of its blocks
/// must find a legal receiver among the other rosters ("on-the-fly column
/// generation centered on the displaced instances" degenerates to this,
/// since C3 already enumerated every legal block shape - there is no new
/// block shape to invent, only a new home for an existing one). Works on a
/// scratch copy so a partial failure never mutates `plan` (spec §4.6:
/// "purely monotone; any non-improving repair is discarded").
fn try_eliminate_roster(plan: &mut Plan, donor_id: SyntheticDriverId, config: &SolverConfig) -> bool {
    let donor_blocks: Vec<Block> = match plan.rosters.iter().find(|r| r.driver_id == donor_id) {
        Some(r) => {
            let mut blocks = r.blocks.clone();
            blocks.sort_by(|a, b| a.block_id.cmp(&b.block_id));
            blocks
        }
        None => return false,
    };
    if donor_blocks.is_empty() {
        return false;
    }

    let low_hour_before = low_hour_count(plan, config);
    let driver_count_before = plan.rosters.len();

    let mut working = plan.clone();
    for block in &donor_blocks {
        if !move_block_to_best_receiver(&mut working, donor_id, block, config) {
            return false;
        }
    }

    prune_empty_rosters(&mut working);

    let improves = working.rosters.len() <= driver_count_before && low_hour_count(&working, config) < low_hour_before;
    if improves {
        *plan = working;
        true
    } else {
        false
    }
}

/// Moves `block` off `donor_id` onto the best legal receiver: largest
/// remaining weekly-hour slack first, then smallest driver id (the same
/// deterministic receiver order as C4 Phase B, spec §4.4/§4.6).
fn move_block_to_best_receiver(plan: &mut Plan, donor_id: SyntheticDriverId, block: &Block, config: &SolverConfig) -> bool {
    let mut receivers: Vec<(f64, SyntheticDriverId)> = plan
        .rosters
        .iter()
        .filter(|r| r.driver_id != donor_id)
        .map(|r| (config.max_weekly_hours - (r.total_work_min() as f64 / 60.0), r.driver_id))
        .collect();
    receivers.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap().then(a.1.cmp(&b.1)));

    for (_, receiver_id) in receivers {
        let Some(receiver) = plan.rosters.iter().find(|r| r.driver_id == receiver_id) else { continue };
        if receiver.blocks.iter().any(|b| b.day == block.day) {
            continue;
        }
        let mut candidate = receiver.clone();
        candidate.blocks.push(block.clone());
        if validate_roster(&candidate, config).is_err() {
            continue;
        }

        if let Some(donor) = plan.rosters.iter_mut().find(|r| r.driver_id == donor_id) {
            donor.blocks.retain(|b| b.block_id != block.block_id);
        }
        if let Some(receiver) = plan.rosters.iter_mut().find(|r| r.driver_id == receiver_id) {
            receiver.blocks.push(block.clone());
        }
        for tour_id in &block.tour_ids {
            plan.assignments.insert(tour_id.clone(), (receiver_id, block.block_id.clone()));
        }
        return true;
    }

    false
}

fn prune_empty_rosters(plan: &mut Plan) {
    plan.rosters.retain(|r| !r.blocks.is_empty());
}

fn renumber_drivers(mut plan: Plan) -> Plan {
    plan.rosters.sort_by_key(|r| r.driver_id);
    let remap: std::collections::BTreeMap<SyntheticDriverId, SyntheticDriverId> =
        plan.rosters.iter().enumerate().map(|(new_id, r)| (r.driver_id, new_id as SyntheticDriverId)).collect();

    for roster in &mut plan.rosters {
        roster.driver_id = remap[&roster.driver_id];
    }
    for (driver_id, _) in plan.assignments.values_mut() {
        *driver_id = remap[driver_id];
    }

    plan
}

#[cfg(test)]
#[path = "../../tests/unit/solve/lns_test.rs"]
mod lns_test;
