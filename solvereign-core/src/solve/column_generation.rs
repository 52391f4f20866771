//! C5: experimental set-partitioning solver. Variables are whole rosters
//! ("columns"); the master selects the minimum count that covers every
//! instance exactly once (spec §4.5).

use std::collections::{BTreeMap, BTreeSet};

use log::{debug, info, warn};

use crate::construction::validator::can_chain_days;
use crate::models::block::{Block, BlockId, BlockType};
use crate::models::common::{canonical_signature, Day, Signature};
use crate::models::config::{FatigueRule, SolverConfig};
use crate::models::plan::{DutyTelemetry, Plan, SolveStatus};
use crate::models::roster::{DriverClass, Roster, SyntheticDriverId};
use crate::models::tour::InstanceId;

use super::block_heuristic;
use super::deadline::Deadline;
use super::lp_backend::{self, MasterColumn};

/// One set-partitioning column: a candidate driver-week, deduplicated by
/// the canonical signature of its sorted block ids (spec §4.5, §9 design
/// notes: "pool indexed by roster canonical signature").
#[derive(Debug, Clone)]
pub struct Column {
    /// Dedup/identity key.
    pub signature: Signature,
    /// The blocks making up this candidate roster, sorted by day.
    pub blocks: Vec<Block>,
    /// Instance ids covered by this column (union over its blocks).
    pub tour_ids: Vec<InstanceId>,
    /// Sum of block `work_min` across the column.
    pub total_work_min: i32,
    /// An always-feasible, heavily penalized one-block column injected
    /// during seeding to guarantee RMP feasibility (spec §4.5 step 1).
    pub is_penalty_singleton: bool,
}

impl Column {
    fn from_blocks(blocks: Vec<Block>, is_penalty_singleton: bool) -> Self {
        let mut sorted = blocks;
        sorted.sort_by_key(|b| b.day);

        let mut sig_sources: Vec<String> = sorted.iter().map(|b| b.block_id.clone()).collect();
        sig_sources.sort();
        let sig_refs: Vec<&str> = sig_sources.iter().map(String::as_str).collect();
        let signature = canonical_signature(&sig_refs);

        let tour_ids: Vec<InstanceId> = sorted.iter().flat_map(|b| b.tour_ids.clone()).collect();
        let total_work_min = sorted.iter().map(|b| b.work_min).sum();
        Column { signature, blocks: sorted, tour_ids, total_work_min, is_penalty_singleton }
    }

    fn classification(&self) -> DriverClass {
        if self.total_work_min >= 40 * 60 {
            DriverClass::Fte
        } else {
            DriverClass::Pt
        }
    }

    /// Objective coefficient: one driver, plus a PT penalty proportional to
    /// the hours deficit from full-time, plus a large premium for the
    /// always-present penalty singletons (SPEC_FULL §B.3).
    fn cost(&self, config: &SolverConfig) -> f64 {
        if self.is_penalty_singleton {
            return 1.0 + config.driver_overage_penalty;
        }
        let mut cost = 1.0;
        if self.classification() == DriverClass::Pt {
            let hours = self.total_work_min as f64 / 60.0;
            let deficit = ((40.0 - hours) / 40.0).clamp(0.0, 1.0);
            cost += config.pt_weight_base + deficit * (config.pt_weight_max - config.pt_weight_base);
        }
        cost
    }
}

/// Outcome of the column-generation pipeline (spec §4.5, §6).
pub struct ColumnGenerationOutcome {
    /// The produced plan (best incumbent if `status != Ok`).
    pub plan: Plan,
    /// Terminal status of this solve attempt.
    pub status: SolveStatus,
    /// First block id that never appeared in any feasible incumbent.
    pub first_uncoverable_block: Option<BlockId>,
    /// Per-day pricing telemetry (SPEC_FULL §B.2).
    pub duty_telemetry: Vec<DutyTelemetry>,
}

/// Runs the column-generation pipeline over an already-partitioned block
/// set: seed, price-and-add rounds against LP duals, then a final master
/// MIP, tracking the best integer incumbent across rounds (spec §4.5,
/// SPEC_FULL §B.4).
pub fn solve(blocks: &[Block], config: &SolverConfig) -> ColumnGenerationOutcome {
    let instance_ids: Vec<InstanceId> = {
        let mut ids: BTreeSet<InstanceId> = BTreeSet::new();
        for block in blocks {
            ids.extend(block.tour_ids.iter().cloned());
        }
        ids.into_iter().collect()
    };

    let mut pool = seed_pool(blocks, config);
    ensure_full_coverage(&mut pool, blocks, &instance_ids);

    let deadline = Deadline::starting_now(config.cg_deadline_s);
    let mut telemetry: Vec<DutyTelemetry> = Vec::new();
    let mut stall_rounds = 0usize;
    let mut rounds = 0usize;
    let mut best_incumbent: Option<(Plan, usize)> = None;

    while rounds < config.max_cg_rounds && stall_rounds < config.max_stall_rounds && !deadline.expired() {
        rounds += 1;

        let master_columns = to_master_columns(&pool, config);
        let relaxation = match lp_backend::solve_relaxation(&master_columns, &instance_ids, deadline.capped(config.lp_time_limit_s)) {
            Ok(r) => r,
            Err(err) => {
                warn!("column generation: RMP relaxation failed at round {rounds}: {err}");
                break;
            }
        };

        let (new_columns, round_telemetry) = price_columns(blocks, &pool, &relaxation.duals, config);
        telemetry.extend(round_telemetry);

        let mut added = 0usize;
        for column in new_columns {
            let reduced_cost =
                column.cost(config) - column.tour_ids.iter().map(|t| relaxation.duals.get(t).copied().unwrap_or(0.0)).sum::<f64>();
            if reduced_cost < -1e-6 {
                let signature = column.signature.clone();
                if !pool.contains_key(&signature) {
                    pool.insert(signature, column);
                    added += 1;
                }
            }
        }

        if added == 0 {
            stall_rounds += 1;
            debug!("column generation: round {rounds} stalled ({stall_rounds}/{})", config.max_stall_rounds);
        } else {
            stall_rounds = 0;
            debug!("column generation: round {rounds} added {added} columns (pool size {})", pool.len());
        }

        if added == 0 || rounds % 5 == 0 {
            if let Some((plan, driver_count)) = try_master_mip(&pool, &instance_ids, config, deadline.capped(config.mip_time_limit_s)) {
                let better = best_incumbent.as_ref().map(|(_, count)| driver_count < *count).unwrap_or(true);
                if better {
                    info!("column generation: new incumbent with {driver_count} drivers at round {rounds}");
                    best_incumbent = Some((plan, driver_count));
                }
            }
        }
    }

    if best_incumbent.is_none() {
        if let Some((plan, driver_count)) = try_master_mip(&pool, &instance_ids, config, config.mip_time_limit_s) {
            best_incumbent = Some((plan, driver_count));
        }
    }

    let deadline_hit = deadline.expired();
    match best_incumbent {
        Some((plan, _)) if covers_all(&plan, &instance_ids) => {
            let status = if deadline_hit { SolveStatus::TimeBudgetExhausted } else { SolveStatus::Ok };
            ColumnGenerationOutcome { plan, status, first_uncoverable_block: None, duty_telemetry: telemetry }
        }
        _ => {
            // Either no integer incumbent was found, or (should not happen
            // given the always-feasible penalty singletons) one was found
            // but did not cover every instance; fall back to the canonical
            // greedy solver rather than return a partial column-generation plan.
            let fallback = block_heuristic::solve(blocks, config);
            ColumnGenerationOutcome {
                plan: fallback.plan,
                status: fallback.status,
                first_uncoverable_block: fallback.first_uncoverable_block,
                duty_telemetry: telemetry,
            }
        }
    }
}

fn covers_all(plan: &Plan, instance_ids: &[InstanceId]) -> bool {
    instance_ids.iter().all(|id| plan.assignments.contains_key(id))
}

/// Initial pool: FTE-ish greedy columns from the block-heuristic (C4) seed,
/// plus one always-feasible penalty singleton per block (spec §4.5 step 1).
fn seed_pool(blocks: &[Block], config: &SolverConfig) -> BTreeMap<Signature, Column> {
    let mut pool = BTreeMap::new();

    let seed = block_heuristic::solve(blocks, config);
    for roster in &seed.plan.rosters {
        let column = Column::from_blocks(roster.blocks.clone(), false);
        pool.insert(column.signature.clone(), column);
    }

    for block in blocks {
        let column = Column::from_blocks(vec![block.clone()], true);
        pool.entry(column.signature.clone()).or_insert(column);
    }

    pool
}

/// Seeding sanity check (spec §4.5 step 5 / SPEC_FULL §B.5): every instance
/// must be covered by at least one pool column after seeding. The penalty
/// singletons injected in [`seed_pool`] already guarantee this, but a
/// targeted repair runs anyway as a defensive re-check.
fn ensure_full_coverage(pool: &mut BTreeMap<Signature, Column>, blocks: &[Block], instance_ids: &[InstanceId]) {
    let covered: BTreeSet<&str> = pool.values().flat_map(|c| c.tour_ids.iter().map(String::as_str)).collect();
    let missing: Vec<&InstanceId> = instance_ids.iter().filter(|id| !covered.contains(id.as_str())).collect();
    if missing.is_empty() {
        return;
    }
    warn!("column generation: {} instances uncovered after seeding, repairing", missing.len());
    for instance_id in missing {
        if let Some(block) = blocks.iter().find(|b| b.tour_ids.contains(instance_id)) {
            let column = Column::from_blocks(vec![block.clone()], true);
            pool.entry(column.signature.clone()).or_insert(column);
        }
    }
}

fn to_master_columns<'a>(pool: &'a BTreeMap<Signature, Column>, config: &SolverConfig) -> Vec<MasterColumn<'a>> {
    pool.values().map(|c| MasterColumn { cost: c.cost(config), covers: &c.tour_ids }).collect()
}

fn try_master_mip(pool: &BTreeMap<Signature, Column>, instance_ids: &[InstanceId], config: &SolverConfig, time_limit_s: f64) -> Option<(Plan, usize)> {
    let columns: Vec<&Column> = pool.values().collect();
    let master_columns: Vec<MasterColumn> = columns.iter().map(|c| MasterColumn { cost: c.cost(config), covers: &c.tour_ids }).collect();

    let result = lp_backend::solve_mip(&master_columns, instance_ids, time_limit_s).ok()?;
    if result.selected.is_empty() {
        return None;
    }

    let selected: Vec<&Column> = result.selected.iter().map(|&i| columns[i]).collect();
    let plan = build_plan(&selected);
    let driver_count = plan.rosters.len();
    Some((plan, driver_count))
}

fn build_plan(selected: &[&Column]) -> Plan {
    let mut ordered = selected.to_vec();
    ordered.sort_by(|a, b| a.signature.cmp(&b.signature));

    let mut rosters = Vec::with_capacity(ordered.len());
    let mut assignments = BTreeMap::new();

    for (index, column) in ordered.iter().enumerate() {
        let driver_id = index as SyntheticDriverId;
        for block in &column.blocks {
            for tour_id in &block.tour_ids {
                assignments.insert(tour_id.clone(), (driver_id, block.block_id.clone()));
            }
        }
        rosters.push(Roster { driver_id, blocks: column.blocks.clone() });
    }

    Plan { rosters, assignments }
}

/// A partial candidate roster under construction during the label-setting
/// walk across days, kept alive only while it might still extend into a
/// cheaper column than anything already priced (spec §4.5 step 3, grounded
/// on `original_source/.../duty_builder.py`'s dual-guided Top-K selection).
#[derive(Clone)]
struct Label {
    blocks: Vec<Block>,
    last_day: Day,
    total_work_min: i32,
    last_was_triple: bool,
    dual_gain: f64,
}

/// Prices new columns for one round: per day, ranks that day's blocks by
/// dual gain (capped by `max_multi_duties_per_day`, recorded as
/// [`DutyTelemetry`]), then extends live multi-day labels and starts fresh
/// ones from the day's top-K starters (`top_k_start_tours`), bounding
/// successor fan-out per label by `max_successors_per_tour`.
fn price_columns(
    blocks: &[Block],
    pool: &BTreeMap<Signature, Column>,
    duals: &BTreeMap<InstanceId, f64>,
    config: &SolverConfig,
) -> (Vec<Column>, Vec<DutyTelemetry>) {
    let mut by_day: BTreeMap<Day, Vec<Block>> = BTreeMap::new();
    for block in blocks {
        by_day.entry(block.day).or_default().push(block.clone());
    }

    let block_gain = |block: &Block| -> f64 { block.tour_ids.iter().map(|t| duals.get(t).copied().unwrap_or(0.0)).sum() };

    let mut telemetry = Vec::new();
    let mut labels: Vec<Label> = Vec::new();
    let mut new_columns = Vec::new();

    for (&day, day_blocks) in &by_day {
        let mut candidates: Vec<Block> = day_blocks.clone();
        candidates.sort_by(|a, b| block_gain(b).partial_cmp(&block_gain(a)).unwrap().then(a.block_id.cmp(&b.block_id)));

        let singletons_count = candidates.iter().filter(|b| b.block_type == BlockType::Single).count();
        let pairs_count = candidates.iter().filter(|b| matches!(b.block_type, BlockType::PairRegular | BlockType::PairSplit)).count();
        let triples_count = candidates.iter().filter(|b| b.block_type == BlockType::Triple).count();
        let cap_hit = candidates.len() > config.max_multi_duties_per_day;
        if cap_hit {
            candidates.truncate(config.max_multi_duties_per_day);
        }
        let top_dual_tours: Vec<InstanceId> = candidates.iter().take(5).filter_map(|b| b.tour_ids.first().cloned()).collect();

        telemetry.push(DutyTelemetry {
            day,
            tours_count: day_blocks.iter().map(|b| b.tour_ids.len()).sum(),
            singletons_count,
            pairs_count,
            triples_count,
            cap_hit,
            top_dual_tours,
        });

        let starters: Vec<Block> = candidates.into_iter().take(config.top_k_start_tours).collect();
        let mut next_labels: Vec<Label> = labels.clone();

        for block in &starters {
            new_columns.push(Column::from_blocks(vec![block.clone()], false));

            let mut extended = 0usize;
            for label in &labels {
                if extended >= config.max_successors_per_tour {
                    break;
                }
                if label.last_day >= day {
                    continue;
                }
                let last_block = label.blocks.last().expect("a label always carries at least one block");
                if !can_chain_days(last_block, block, config) {
                    continue;
                }
                if matches!(config.fatigue_rule, FatigueRule::NoConsecutiveTriple)
                    && label.last_was_triple
                    && block.block_type == BlockType::Triple
                    && day == label.last_day + 1
                {
                    continue;
                }
                let total_work_min = label.total_work_min + block.work_min;
                if total_work_min as f64 / 60.0 > config.max_weekly_hours {
                    continue;
                }
                if label.blocks.len() + 1 > config.max_blocks_per_week {
                    continue;
                }

                let mut new_blocks = label.blocks.clone();
                new_blocks.push(block.clone());
                new_columns.push(Column::from_blocks(new_blocks.clone(), false));

                next_labels.push(Label {
                    blocks: new_blocks,
                    last_day: day,
                    total_work_min,
                    last_was_triple: block.block_type == BlockType::Triple,
                    dual_gain: label.dual_gain + block_gain(block),
                });
                extended += 1;
            }

            next_labels.push(Label {
                blocks: vec![block.clone()],
                last_day: day,
                total_work_min: block.work_min,
                last_was_triple: block.block_type == BlockType::Triple,
                dual_gain: block_gain(block),
            });
        }

        next_labels.sort_by(|a, b| b.dual_gain.partial_cmp(&a.dual_gain).unwrap());
        next_labels.truncate(config.max_multi_duties_per_day);
        labels = next_labels;
    }

    let new_columns: Vec<Column> = new_columns.into_iter().filter(|c| !pool.contains_key(&c.signature)).collect();

    (new_columns, telemetry)
}

#[cfg(test)]
#[path = "../../tests/unit/solve/column_generation_test.rs"]
mod column_generation_test;
