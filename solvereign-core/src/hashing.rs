//! C8: canonicalizes solver inputs/outputs and computes their SHA-256
//! fingerprints (spec §4.8).
//!
//! `input_hash`/`solver_config_hash`/`output_hash` are computed over the
//! canonical JSON serialization of sorted, remapped structures, never over
//! the entities' own field order or iteration order - the same "sort by
//! stable key before a decision point" discipline the partitioner (C3)
//! applies to candidate selection (spec §9 design notes).

use std::collections::BTreeMap;

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::models::block::BlockId;
use crate::models::config::SolverConfig;
use crate::models::plan::Plan;
use crate::models::roster::{Roster, SyntheticDriverId};
use crate::models::tour::{InstanceId, TourTemplate};

fn sha256_hex_of_json<T: Serialize>(value: &T) -> String {
    let json = serde_json::to_vec(value).expect("fingerprinted types are always JSON-serializable");
    let digest = Sha256::digest(&json);
    format!("{digest:x}")
}

/// SHA-256 over the canonicalized (sorted-by-signature) template list (spec §4.8).
pub fn input_hash(templates: &[TourTemplate]) -> String {
    let mut sorted: Vec<&TourTemplate> = templates.iter().collect();
    sorted.sort_by_key(|t| t.signature());
    sha256_hex_of_json(&sorted)
}

/// SHA-256 of the configuration structure (spec §4.8).
pub fn solver_config_hash(config: &SolverConfig) -> String {
    sha256_hex_of_json(config)
}

/// Canonical sort key for a roster: its sorted block ids, joined.
///
/// Rosters are content-addressed by what they contain rather than by the
/// (arbitrary) order a solver happened to emit `driver_id`s in; this key is
/// what the reproducibility fingerprint (P3) actually anchors on.
fn roster_canonical_key(roster: &Roster) -> String {
    let mut ids: Vec<&str> = roster.blocks.iter().map(|b| b.block_id.as_str()).collect();
    ids.sort_unstable();
    ids.join(",")
}

/// SHA-256 over the sorted `(instance_id -> synthetic_driver_index,
/// block_id)` tuples (P3, spec §4.8), where driver indices are reassigned
/// by first-appearance order over rosters sorted by [`roster_canonical_key`]
/// - independent of whatever internal driver numbering a solver used.
pub fn output_hash(plan: &Plan) -> String {
    let mut rosters: Vec<&Roster> = plan.rosters.iter().collect();
    rosters.sort_by_key(|r| roster_canonical_key(r));

    let mut driver_index: BTreeMap<SyntheticDriverId, u32> = BTreeMap::new();
    for roster in &rosters {
        let next = driver_index.len() as u32;
        driver_index.entry(roster.driver_id).or_insert(next);
    }

    let remapped: BTreeMap<InstanceId, (u32, BlockId)> = plan
        .assignments
        .iter()
        .map(|(instance_id, (driver_id, block_id))| {
            let index = *driver_index.get(driver_id).expect("every assigned driver has a roster");
            (instance_id.clone(), (index, block_id.clone()))
        })
        .collect();

    sha256_hex_of_json(&remapped)
}

#[cfg(test)]
#[path = "../tests/unit/hashing_test.rs"]
mod hashing_test;
