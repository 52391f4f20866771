//! Driver-week rosters and their derived classification (spec §3).

use serde::{Deserialize, Serialize};

use super::block::Block;
use super::common::Day;

/// A synthetic driver identifier, assigned during solving; a later
/// composition step (out of core scope, spec §1) maps these to real people.
pub type SyntheticDriverId = u32;

/// FTE if `total_work_min >= 40*60`, else PT (spec §3). Derived, never an input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DriverClass {
    /// Full-time: >= 40 weekly hours.
    Fte,
    /// Part-time: < 40 weekly hours.
    Pt,
}

/// An ordered list of blocks for one driver's week, at most one per day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Roster {
    /// The synthetic driver this roster belongs to.
    pub driver_id: SyntheticDriverId,
    /// Blocks, ordered by day; at most one per day, at most 6 days (I4).
    pub blocks: Vec<Block>,
}

impl Roster {
    /// Total minutes worked across all blocks.
    pub fn total_work_min(&self) -> i32 {
        self.blocks.iter().map(|b| b.work_min).sum()
    }

    /// Number of distinct days worked.
    pub fn days_worked(&self) -> usize {
        self.blocks.len()
    }

    /// FTE if total weekly work is >= 40h, else PT (spec §3).
    pub fn classification(&self) -> DriverClass {
        if self.total_work_min() >= 40 * 60 {
            DriverClass::Fte
        } else {
            DriverClass::Pt
        }
    }

    /// Blocks ordered by day, for I1/FATIGUE pairwise scans.
    pub fn blocks_by_day(&self) -> impl Iterator<Item = &Block> {
        let mut sorted: Vec<&Block> = self.blocks.iter().collect();
        sorted.sort_by_key(|b| b.day);
        sorted.into_iter()
    }

    /// The days this roster has a block on, sorted ascending.
    pub fn active_days(&self) -> Vec<Day> {
        let mut days: Vec<Day> = self.blocks.iter().map(|b| b.day).collect();
        days.sort_unstable();
        days
    }
}

#[cfg(test)]
#[path = "../../tests/unit/models/roster_test.rs"]
mod roster_test;
