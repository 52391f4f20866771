//! Tour templates and the atomic tour instances they expand into (spec §3, C2).

use serde::{Deserialize, Serialize};

use super::common::{canonical_signature, Day, Minutes};

/// Optional depot/station tag carried on templates and instances.
pub type Depot = String;
/// Optional skill/qualification tag.
pub type Skill = String;

/// A stable identifier for one tour instance: `(template canonical
/// signature, expansion index)` encoded as a string key, per spec §3.
///
/// Kept as an owned `String` rather than a numeric key so identity survives
/// independent of any database-assigned integer (spec §4.9 / SPEC_FULL §B.6).
pub type InstanceId = String;

/// A forecast line: a fixed time window on a named day with a multiplicity count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TourTemplate {
    /// Externally-assigned template identifier (opaque to the core).
    pub template_id: String,
    /// Weekday index, 1..7 (Mon..Sun).
    pub day: Day,
    /// Start time, minutes since start-of-day.
    pub start_min: Minutes,
    /// End time, minutes since start-of-day; may exceed 1440 when `crosses_midnight`.
    pub end_min: Minutes,
    /// True if the tour's end falls on the following calendar day.
    pub crosses_midnight: bool,
    /// Number of identical instances this template expands into. Must be >= 1.
    pub count: u32,
    /// Optional depot/station constraint.
    pub depot: Option<Depot>,
    /// Optional required skills, unordered on input (canonicalized when hashed).
    pub skills: Vec<Skill>,
}

impl TourTemplate {
    /// Validates the template invariant from spec §3: `count >= 1` and
    /// `end_min > start_min` or `crosses_midnight`.
    pub fn validate(&self) -> Result<(), String> {
        if self.count < 1 {
            return Err(format!("template {}: count must be >= 1, got {}", self.template_id, self.count));
        }
        if !(self.end_min > self.start_min || self.crosses_midnight) {
            return Err(format!(
                "template {}: end_min ({}) must exceed start_min ({}) unless crosses_midnight",
                self.template_id, self.end_min, self.start_min
            ));
        }
        Ok(())
    }

    /// Canonical signature: `SHA-256(day|start_min|end_min|depot|sorted skills)[:16]`.
    pub fn signature(&self) -> super::common::Signature {
        let mut skills = self.skills.clone();
        skills.sort();
        let joined_skills = skills.join(",");
        let depot = self.depot.as_deref().unwrap_or("");
        canonical_signature(&[
            &self.day.to_string(),
            &self.start_min.to_string(),
            &self.end_min.to_string(),
            depot,
            &joined_skills,
        ])
    }

    /// Duration in minutes, honoring a cross-midnight end: `end_min` stays a
    /// same-day clock value when `crosses_midnight` is set (spec §3), so the
    /// wrapped day must be added back before subtracting.
    pub fn duration_min(&self) -> Minutes {
        if self.crosses_midnight {
            self.end_min + super::common::MINUTES_PER_DAY as Minutes - self.start_min
        } else {
            self.end_min - self.start_min
        }
    }
}

/// An atomic coverage unit produced by expanding a template `count` times (C2).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TourInstance {
    /// Stable identifier: `{template signature}#{expansion index}`.
    pub instance_id: InstanceId,
    /// The template this instance was expanded from.
    pub template_id: String,
    /// Weekday index, 1..7.
    pub day: Day,
    /// Start time, minutes since start-of-day.
    pub start_min: Minutes,
    /// End time, minutes since start-of-day; may exceed 1440.
    pub end_min: Minutes,
    /// Duration in minutes, honoring `crosses_midnight` (see [`TourTemplate::duration_min`]).
    pub duration_min: Minutes,
    /// True if the tour's end falls on the following calendar day.
    pub crosses_midnight: bool,
    /// Optional depot/station constraint, copied from the template.
    pub depot: Option<Depot>,
    /// Optional required skills, copied from the template.
    pub skills: Vec<Skill>,
    /// 1-based position of this instance within its template's expansion.
    pub expansion_index: u32,
}

impl TourInstance {
    /// True if this instance overlaps another in time on the same day.
    pub fn overlaps(&self, other: &TourInstance) -> bool {
        if self.day != other.day {
            return false;
        }
        self.start_min < other.end_min && other.start_min < self.end_min
    }

    /// Absolute end-of-tour minute offset from the week anchor, honoring
    /// cross-midnight tours, used by rest-time arithmetic (spec §8 property 6).
    pub fn absolute_end(&self) -> i64 {
        super::common::absolute_minute_crossing(self.day, self.end_min, self.crosses_midnight)
    }

    /// Absolute start-of-tour minute offset from the week anchor.
    pub fn absolute_start(&self) -> i64 {
        super::common::absolute_minute(self.day, self.start_min)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/models/tour_test.rs"]
mod tour_test;
