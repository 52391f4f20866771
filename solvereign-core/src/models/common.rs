//! Shared value types used across tours, blocks and rosters.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// A weekday index, 1..7 (Mon..Sun), as used throughout spec §3.
pub type Day = u8;

/// Monday, the first day of a SOLVEREIGN week.
pub const MONDAY: Day = 1;
/// Sunday, the last day of a SOLVEREIGN week.
pub const SUNDAY: Day = 7;
/// Minutes in a calendar day; used to compute absolute, cross-midnight-aware offsets.
pub const MINUTES_PER_DAY: i64 = 1_440;

/// Minutes-since-midnight clock value, not yet bound to a day.
pub type Minutes = i32;

/// Week classification by distinct active days, derived from a forecast or plan.
///
/// Carried over from `original_source/backend_py/solvereign_v2/types.py::WeekCategory`;
/// the distilled spec does not mention it, but it materially affects how wide a
/// worker pool the block-heuristic solver should start with (§4.4) and how many
/// seed columns the column generator should inject (§4.5).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeekCategory {
    /// 6-7 active days.
    Normal,
    /// 4-5 active days.
    Compressed,
    /// 1-3 active days.
    ShortWeek,
}

impl WeekCategory {
    /// Classifies a week from the count of distinct days carrying at least one tour.
    pub fn from_active_day_count(active_days: usize) -> Self {
        match active_days {
            0..=3 => WeekCategory::ShortWeek,
            4..=5 => WeekCategory::Compressed,
            _ => WeekCategory::Normal,
        }
    }
}

/// First 16 hex characters of a SHA-256 digest: the canonical signature format
/// used for tour templates, instances and blocks (spec §3, §4.3).
pub type Signature = String;

/// Computes a canonical signature from a sequence of pre-stringified fields,
/// joined with `|`, matching the format described in spec §3
/// (`SHA-256(day|start_min|end_min|depot|sorted skills)[:16]`).
pub fn canonical_signature(fields: &[&str]) -> Signature {
    let joined = fields.join("|");
    let digest = Sha256::digest(joined.as_bytes());
    let hex = format!("{digest:x}");
    hex[..16].to_string()
}

/// A half-open clock interval `[start, end)` in minutes-since-midnight,
/// `end` may exceed `MINUTES_PER_DAY` for tours that cross midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    /// Inclusive start, minutes since start-of-day.
    pub start_min: Minutes,
    /// Exclusive end, minutes since start-of-day; may exceed 1440.
    pub end_min: Minutes,
}

impl TimeWindow {
    /// Builds a window, asserting the basic ordering invariant.
    pub fn new(start_min: Minutes, end_min: Minutes) -> Self {
        debug_assert!(end_min > start_min, "end_min must be after start_min");
        Self { start_min, end_min }
    }

    /// Duration of the window in minutes.
    pub fn duration_min(&self) -> Minutes {
        self.end_min - self.start_min
    }

    /// True if `end_min` falls on the calendar day after `start_min`.
    pub fn crosses_midnight(&self) -> bool {
        self.end_min > MINUTES_PER_DAY as Minutes
    }
}

/// Converts a `(day, minute-of-day)` pair into an absolute minute offset from
/// the start of the week (Monday 00:00). Callers holding a tour or block that
/// crosses midnight must add a day via [`absolute_minute_crossing`] instead -
/// `minute_of_day` here is always the nominal same-day clock value (spec §3:
/// `end_min` stays minutes-since-start-of-day even when `crosses_midnight` is
/// set; the flag, not the number, carries the day rollover).
pub fn absolute_minute(day: Day, minute_of_day: Minutes) -> i64 {
    (day as i64 - 1) * MINUTES_PER_DAY + minute_of_day as i64
}

/// Converts a `(day, minute-of-day)` pair into an absolute minute offset,
/// adding a full calendar day when `crosses_midnight` is set - the
/// cross-midnight-aware counterpart of [`absolute_minute`] used for tour/block
/// end moments (spec §3, §8 property 6).
pub fn absolute_minute_crossing(day: Day, minute_of_day: Minutes, crosses_midnight: bool) -> i64 {
    absolute_minute(day, minute_of_day) + if crosses_midnight { MINUTES_PER_DAY } else { 0 }
}

#[cfg(test)]
#[path = "../../tests/unit/models/common_test.rs"]
mod common_test;
