//! C4: the canonical block-heuristic solver — min-cost flow assignment of
//! blocks to drivers, followed by PT-elimination (spec §4.4).

use std::collections::BTreeMap;

use log::{debug, info, warn};

use crate::construction::validator::validate_roster;
use crate::models::block::{Block, BlockId};
use crate::models::common::{Day, WeekCategory};
use crate::models::config::SolverConfig;
use crate::models::plan::{Plan, SolveStatus};
use crate::models::roster::{Roster, SyntheticDriverId};

use super::min_cost_flow::MinCostFlow;

/// Dominant per-driver activation cost: large enough that the flow solver
/// always prefers reusing an already-active driver slot over spinning up a
/// fresh one, whatever the block tie-break term adds (spec §4.4: "fixed
/// per-driver cost (prefer fewer drivers)").
const DRIVER_ACTIVATION_COST: i64 = 1_000_000;

/// Outcome of a block-heuristic solve: a plan (complete or best-effort) plus
/// the status/first-uncoverable-block pair `PlanResult` exposes (spec §6).
pub struct HeuristicOutcome {
    /// The produced plan; a partial assignment when `status != Ok`.
    pub plan: Plan,
    /// Terminal status of this solve attempt.
    pub status: SolveStatus,
    /// First block id Phase A could not place, when `status = Infeasible`.
    pub first_uncoverable_block: Option<BlockId>,
}

/// Runs Phase A (min-cost flow assignment) then Phase B (PT elimination)
/// over an already-partitioned block set (spec §4.4).
pub fn solve(blocks: &[Block], config: &SolverConfig) -> HeuristicOutcome {
    let active_days: usize = {
        let mut days: Vec<Day> = blocks.iter().map(|b| b.day).collect();
        days.sort_unstable();
        days.dedup();
        days.len()
    };
    let category = WeekCategory::from_active_day_count(active_days);

    let mut pool_size = initial_pool_size(blocks, category);
    let pool_step = pool_step_for(category);
    let pool_cap = blocks.len().max(1);

    loop {
        match try_assign(blocks, pool_size, config) {
            Ok(rosters) => {
                let plan = finalize_plan(rosters);
                let plan = eliminate_part_time(plan, config);
                info!("block heuristic: covered {} blocks with {} drivers (pool {})", blocks.len(), plan.rosters.len(), pool_size);
                return HeuristicOutcome { plan, status: SolveStatus::Ok, first_uncoverable_block: None };
            }
            Err(first_uncoverable) => {
                if pool_size >= pool_cap {
                    warn!("block heuristic: infeasible at pool cap {pool_cap}, first uncoverable block {first_uncoverable}");
                    return HeuristicOutcome {
                        plan: Plan { rosters: Vec::new(), assignments: BTreeMap::new() },
                        status: SolveStatus::Infeasible,
                        first_uncoverable_block: Some(first_uncoverable),
                    };
                }
                debug!("block heuristic: pool {pool_size} insufficient, expanding by {pool_step}");
                pool_size = (pool_size + pool_step).min(pool_cap);
            }
        }
    }
}

fn initial_pool_size(blocks: &[Block], category: WeekCategory) -> usize {
    let total_work_min: i64 = blocks.iter().map(|b| b.work_min as i64).sum();
    let hour_based = ((total_work_min as f64 / 60.0) / 55.0).ceil() as usize;
    let floor = match category {
        WeekCategory::ShortWeek => 1,
        WeekCategory::Compressed => 2,
        WeekCategory::Normal => 3,
    };
    hour_based.max(floor).max(1)
}

fn pool_step_for(category: WeekCategory) -> usize {
    match category {
        WeekCategory::ShortWeek => 2,
        WeekCategory::Compressed => 3,
        WeekCategory::Normal => 5,
    }
}

/// Attempts a full-week assignment with a fixed driver pool size, day by
/// day, via a per-day min-cost flow (spec §4.4 Phase A). Returns the first
/// uncoverable block id if some day's blocks outrun what the pool (under the
/// hard invariants) can legally absorb.
fn try_assign(blocks: &[Block], pool_size: usize, config: &SolverConfig) -> Result<Vec<Roster>, BlockId> {
    let mut by_day: BTreeMap<Day, Vec<&Block>> = BTreeMap::new();
    for block in blocks {
        by_day.entry(block.day).or_default().push(block);
    }

    let mut rosters: Vec<Roster> = (0..pool_size as SyntheticDriverId).map(|id| Roster { driver_id: id, blocks: Vec::new() }).collect();
    let mut used = vec![false; pool_size];

    for (_, mut day_blocks) in by_day {
        day_blocks.sort_by(|a, b| a.block_id.cmp(&b.block_id));
        assign_day(&day_blocks, &mut rosters, &mut used, config).map_err(|idx| day_blocks[idx].block_id.clone())?;
    }

    Ok(rosters)
}

/// Assigns one day's blocks to driver slots via min-cost flow. Returns the
/// index (into `day_blocks`) of the first block left unmatched, if any.
fn assign_day(day_blocks: &[&Block], rosters: &mut [Roster], used: &mut [bool], config: &SolverConfig) -> Result<(), usize> {
    let pool_size = rosters.len();
    let block_count = day_blocks.len();

    // node layout: 0 = source, 1..=pool_size = drivers, pool_size+1..=pool_size+block_count = blocks, last = sink
    let source = 0;
    let driver_node = |i: usize| 1 + i;
    let block_node = |j: usize| 1 + pool_size + j;
    let sink = 1 + pool_size + block_count;

    let mut flow = MinCostFlow::new(sink + 1);
    for i in 0..pool_size {
        flow.add_edge(source, driver_node(i), 1, 0);
    }
    for j in 0..block_count {
        flow.add_edge(block_node(j), sink, 1, 0);
    }

    let mut arc_ids: BTreeMap<(usize, usize), usize> = BTreeMap::new();
    for (i, roster) in rosters.iter().enumerate() {
        if roster.blocks.iter().any(|b| b.day == day_blocks[0].day) {
            continue; // at most one block per driver per day
        }
        for (j, block) in day_blocks.iter().enumerate() {
            if !can_append(roster, block, config) {
                continue;
            }
            let activation = if used[i] { 0 } else { DRIVER_ACTIVATION_COST };
            let tie_break = j as i64;
            let id = flow.add_edge(driver_node(i), block_node(j), 1, activation + tie_break);
            arc_ids.insert((i, j), id);
        }
    }

    flow.solve(source, sink);

    let mut matched = vec![false; block_count];
    for (&(i, j), &id) in &arc_ids {
        if flow.flow_on(id) > 0 {
            rosters[i].blocks.push((*day_blocks[j]).clone());
            used[i] = true;
            matched[j] = true;
        }
    }

    match matched.iter().position(|&m| !m) {
        Some(idx) => Err(idx),
        None => Ok(()),
    }
}

fn can_append(roster: &Roster, block: &Block, config: &SolverConfig) -> bool {
    let mut candidate = roster.clone();
    candidate.blocks.push(block.clone());
    validate_roster(&candidate, config).is_ok()
}

fn finalize_plan(rosters: Vec<Roster>) -> Plan {
    let mut active: Vec<Roster> = rosters.into_iter().filter(|r| !r.blocks.is_empty()).collect();
    active.sort_by_key(|r| r.driver_id);
    for (new_id, roster) in active.iter_mut().enumerate() {
        roster.driver_id = new_id as SyntheticDriverId;
    }

    let mut assignments = BTreeMap::new();
    for roster in &active {
        for block in &roster.blocks {
            for tour_id in &block.tour_ids {
                assignments.insert(tour_id.clone(), (roster.driver_id, block.block_id.clone()));
            }
        }
    }

    Plan { rosters: active, assignments }
}

/// Phase B: redistributes PT drivers' blocks into existing drivers with
/// slack, in deterministic order, until a pass makes no further changes
/// (spec §4.4).
fn eliminate_part_time(mut plan: Plan, config: &SolverConfig) -> Plan {
    loop {
        let donor_order = donor_order(&plan);
        let mut changed = false;

        'donors: for donor_id in donor_order {
            let donor_blocks: Vec<Block> = plan
                .rosters
                .iter()
                .find(|r| r.driver_id == donor_id)
                .map(|r| {
                    let mut blocks = r.blocks.clone();
                    blocks.sort_by(|a, b| a.block_id.cmp(&b.block_id));
                    blocks
                })
                .unwrap_or_default();

            for block in donor_blocks {
                if try_move_block(&mut plan, donor_id, &block, config) {
                    changed = true;
                    continue 'donors;
                }
            }
        }

        prune_empty_rosters(&mut plan);
        if !changed {
            break;
        }
    }

    renumber_drivers(plan)
}

/// PT donors in ascending total-hours order (smallest total first), the
/// donor priority spec §4.4 names.
fn donor_order(plan: &Plan) -> Vec<SyntheticDriverId> {
    let mut pt: Vec<(i32, SyntheticDriverId)> =
        plan.rosters.iter().filter(|r| r.total_work_min() < 40 * 60).map(|r| (r.total_work_min(), r.driver_id)).collect();
    pt.sort();
    pt.into_iter().map(|(_, id)| id).collect()
}

/// Tries to move `block` off `donor_id` onto the best legal receiver:
/// largest remaining weekly-hour capacity first, then smallest driver id
/// (spec §4.4). Removing a block can never break an invariant for the
/// donor (fewer blocks only relaxes I1-I4); only the receiver side and a
/// `block` receiver needs validating.
fn try_move_block(plan: &mut Plan, donor_id: SyntheticDriverId, block: &Block, config: &SolverConfig) -> bool {
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
        if !can_append(receiver, block, config) {
            continue;
        }

        // Receiver only gains hours here, so it cannot newly become PT; the
        // donor started out PT, so losing a block cannot create a new one.
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
    let remap: BTreeMap<SyntheticDriverId, SyntheticDriverId> =
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
#[path = "../../tests/unit/solve/block_heuristic_test.rs"]
mod block_heuristic_test;
