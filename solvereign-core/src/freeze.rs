//! C9: masks tour instances within a cutoff as immutable before a solve, and
//! merges their prior assignments back in afterwards (spec §4.9).
//!
//! Modeled as a filter applied before solving and a merge applied after, per
//! spec §9's design note: no "is-frozen" flag is threaded through C3/C4/C5's
//! internal data paths.

use log::{info, warn};

use crate::models::block::Block;
use crate::models::common::absolute_minute;
use crate::models::config::{FreezeContext, SolverConfig};
use crate::models::plan::{OverrideEvent, Plan};
use crate::models::roster::{Roster, SyntheticDriverId};
use crate::models::tour::TourInstance;

/// Result of classifying a week's instances against the freeze window.
pub struct FreezeSplit {
    /// Instances the solver is free to (re)assign.
    pub unfrozen: Vec<TourInstance>,
    /// Instances whose prior assignment must be preserved unless overridden.
    pub frozen: Vec<TourInstance>,
    /// Advisory messages for frozen instances with no prior assignment
    /// (first-ever solve within the window, spec §4.9).
    pub warnings: Vec<String>,
}

/// Absolute moment (minutes from the week anchor) beyond which an instance's
/// start is no longer within the freeze cutoff.
fn is_frozen(instance: &TourInstance, now_min: i64, freeze_minutes: i32) -> bool {
    instance.absolute_start() - now_min < freeze_minutes as i64
}

/// Splits `instances` into frozen/unfrozen sets given the current moment
/// `now_min` (minutes elapsed since the week anchor Monday 00:00 - the same
/// absolute-minute representation rest/gap arithmetic uses elsewhere, spec
/// §4.1). `override_mode` resolves every instance as unfrozen (spec §4.9),
/// but only when `config.freeze_override_allowed` permits it; a caller
/// requesting override against a config that forbids it is solved under the
/// normal freeze window instead, with an advisory warning.
///
/// A frozen instance with no prior assignment in `context` (first-ever solve
/// within the window) is routed back into the unfrozen set rather than
/// dropped - spec §4.9: "the solver includes it normally, and an advisory
/// warning is emitted" - since [`merge_frozen`] has nothing to reattach it
/// with afterwards.
pub fn classify(
    instances: &[TourInstance],
    now_min: i64,
    config: &SolverConfig,
    context: Option<&FreezeContext>,
    override_mode: bool,
) -> FreezeSplit {
    let mut warnings = Vec::new();

    let effective_override = if override_mode && !config.freeze_override_allowed {
        warnings.push("freeze override requested but config.freeze_override_allowed is false; solving under the normal freeze window".to_string());
        false
    } else {
        override_mode
    };

    if effective_override {
        return FreezeSplit { unfrozen: instances.to_vec(), frozen: Vec::new(), warnings };
    }

    let mut unfrozen = Vec::new();
    let mut frozen = Vec::new();

    for instance in instances {
        if !is_frozen(instance, now_min, config.freeze_minutes) {
            unfrozen.push(instance.clone());
            continue;
        }

        let has_prior_assignment =
            context.map(|c| c.prior_assignments.contains_key(&instance_signature(instance))).unwrap_or(false);
        if has_prior_assignment {
            frozen.push(instance.clone());
        } else {
            warn!("freeze overlay: instance {} is frozen with no prior assignment; solved as unfrozen", instance.instance_id);
            warnings.push(format!(
                "instance {} is frozen with no prior assignment; solved as unfrozen (spec §4.9)",
                instance.instance_id
            ));
            unfrozen.push(instance.clone());
        }
    }

    info!("freeze overlay: {} frozen, {} unfrozen of {} instances", frozen.len(), unfrozen.len(), instances.len());

    FreezeSplit { unfrozen, frozen, warnings }
}

/// Merges a frozen instance's prior `(driver, block)` assignment into a plan
/// produced by solving only the unfrozen subset (spec §4.9).
///
/// A frozen instance with no prior assignment (first-ever solve within the
/// window) is left for the solver to have assigned normally and produces an
/// advisory warning instead of a hard error - the caller is expected to have
/// included it in the unfrozen set it passed to the solver in that case.
pub fn merge_frozen(mut plan: Plan, frozen: &[TourInstance], context: Option<&FreezeContext>) -> (Plan, Vec<String>) {
    let mut warnings = Vec::new();
    let Some(context) = context else {
        for instance in frozen {
            warnings.push(format!(
                "instance {} is frozen but no FreezeContext was supplied; solved as unfrozen",
                instance.instance_id
            ));
        }
        return (plan, warnings);
    };

    for instance in frozen {
        let signature = instance_signature(instance);
        let Some((driver_id, block_id)) = context.prior_assignments.get(&signature) else {
            warn!("freeze overlay: no prior assignment for frozen instance {}", instance.instance_id);
            warnings.push(format!(
                "instance {} is frozen with no prior assignment in FreezeContext; advisory only",
                instance.instance_id
            ));
            continue;
        };
        let Some(block) = context.prior_blocks.get(block_id) else {
            warn!("freeze overlay: no prior block {} for frozen instance {}", block_id, instance.instance_id);
            warnings.push(format!("instance {} is frozen but prior block {} is missing", instance.instance_id, block_id));
            continue;
        };

        attach_block_to_roster(&mut plan, *driver_id, block.clone());
        plan.assignments.insert(instance.instance_id.clone(), (*driver_id, block_id.clone()));
    }

    (plan, warnings)
}

/// Signature used to key freeze continuity: the instance's template
/// signature plus its expansion index, stable across re-expansions
/// (SPEC_FULL §B.6), independent of any database-assigned id.
fn instance_signature(instance: &TourInstance) -> String {
    let template_sig = instance.instance_id.split('#').next().unwrap_or(&instance.instance_id);
    format!("{template_sig}#{}", instance.expansion_index)
}

fn attach_block_to_roster(plan: &mut Plan, driver_id: SyntheticDriverId, block: Block) {
    if let Some(roster) = plan.rosters.iter_mut().find(|r| r.driver_id == driver_id) {
        if !roster.blocks.iter().any(|b| b.block_id == block.block_id) {
            roster.blocks.push(block);
        }
        return;
    }
    plan.rosters.push(Roster { driver_id, blocks: vec![block] });
}

/// Builds an override audit event for a freeze-override solve (spec §4.9,
/// shape resolved in SPEC_FULL §B.7): a logical, input-derived ordinal keeps
/// the event reproducible rather than timestamping it with wall-clock time.
pub fn record_override(actor: &str, reason: &str, affected_instance_ids: Vec<String>, logical_sequence: u64) -> OverrideEvent {
    OverrideEvent { actor: actor.to_string(), reason: reason.to_string(), affected_instance_ids, logical_sequence }
}

/// Converts a `(day, minute-of-day)` pair to the absolute-minute
/// representation [`classify`] expects for `now_min`, mirroring
/// [`TourInstance::absolute_start`].
pub fn now_min_from_day_offset(day: crate::models::common::Day, minute_of_day: crate::models::common::Minutes) -> i64 {
    absolute_minute(day, minute_of_day)
}

#[cfg(test)]
#[path = "../tests/unit/freeze_test.rs"]
mod freeze_test;
