//! Blocks: same-day combinations of 1-3 tour instances worked by one driver (spec §3, C3).

use serde::{Deserialize, Serialize};

use super::common::{canonical_signature, Day, Minutes, Signature};
use super::tour::InstanceId;

/// Stable block identifier: a type prefix plus a 16-character signature
/// prefix of the block's sorted tour signatures (spec §4.3).
pub type BlockId = String;

/// The four block shapes named in spec §3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockType {
    /// One tour.
    Single,
    /// Two tours, gap 30..60 min, span <= 14h.
    PairRegular,
    /// Two tours, gap 240..360 min, span <= 16h.
    PairSplit,
    /// Three tours, pairwise gaps 30..60 min, span <= 15.5h.
    Triple,
}

impl BlockType {
    /// Short id prefix used when minting a [`BlockId`], mirroring the
    /// `S_`/`P_`/`T_` prefixes in `original_source/.../duty_builder.py`.
    pub fn id_prefix(self) -> &'static str {
        match self {
            BlockType::Single => "S",
            BlockType::PairRegular => "R",
            BlockType::PairSplit => "X",
            BlockType::Triple => "T",
        }
    }

    /// Number of tours this block type is made of.
    pub fn tour_count(self) -> usize {
        match self {
            BlockType::Single => 1,
            BlockType::PairRegular | BlockType::PairSplit => 2,
            BlockType::Triple => 3,
        }
    }
}

/// A same-day combination of 1-3 tour instances belonging to one driver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// Stable identifier embedding the block's canonical signature.
    pub block_id: BlockId,
    /// Weekday index shared by every tour in the block.
    pub day: Day,
    /// Instance ids, sorted by start time then instance id.
    pub tour_ids: Vec<InstanceId>,
    /// Start time of the earliest tour, minutes since start-of-day.
    pub start_min: Minutes,
    /// End time of the latest tour, minutes since start-of-day (may exceed 1440).
    pub end_min: Minutes,
    /// Sum of tour durations, excluding gaps.
    pub work_min: Minutes,
    /// `end_min - start_min`, including gaps.
    pub span_min: Minutes,
    /// Largest gap between consecutive tours in the block (0 for singles).
    pub max_gap_min: Minutes,
    /// True if the tour defining `end_min` (the block's latest tour) ends on
    /// the calendar day after `day` - carried so rest arithmetic between
    /// consecutive blocks can recover the tour's true absolute end (spec §3,
    /// §8 property 6) without re-deriving it from the original tour list.
    pub crosses_midnight: bool,
    /// The block shape.
    pub block_type: BlockType,
}

impl Block {
    /// Canonical signature over the block's sorted tour signatures, per spec §3/§4.3.
    pub fn signature(&self, tour_signatures: &[Signature]) -> Signature {
        let mut sigs: Vec<&str> = tour_signatures.iter().map(String::as_str).collect();
        sigs.sort_unstable();
        let refs: Vec<&str> = sigs;
        canonical_signature(&refs)
    }

    /// Mints a [`BlockId`] from a block type and its canonical signature.
    pub fn mint_id(block_type: BlockType, signature: &Signature) -> BlockId {
        format!("{}_{}", block_type.id_prefix(), &signature[..12.min(signature.len())])
    }

    /// Work hours, for FTE/PT classification (spec §3).
    pub fn work_hours(&self) -> f64 {
        self.work_min as f64 / 60.0
    }
}

#[cfg(test)]
#[path = "../../tests/unit/models/block_test.rs"]
mod block_test;
