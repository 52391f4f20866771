//! A monotonic wall-clock deadline shared across column-generation rounds
//! and the LNS consolidator (spec §5).
//!
//! The canonical block-heuristic (C4) never blocks on an external call and
//! is not cancellable mid-phase (spec §5); only the experimental engine's
//! outer loops consult this.

use std::time::{Duration, Instant};

/// A deadline with a fixed overall budget, queried per round so each round
/// can cap its own inner call to `min(configured cap, remaining deadline)`
/// (spec §5).
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    start: Instant,
    budget: Duration,
}

impl Deadline {
    /// Starts a deadline `budget_s` seconds from now.
    pub fn starting_now(budget_s: f64) -> Self {
        Self { start: Instant::now(), budget: Duration::from_secs_f64(budget_s.max(0.0)) }
    }

    /// True once the budget has elapsed.
    pub fn expired(&self) -> bool {
        self.start.elapsed() >= self.budget
    }

    /// Seconds left before the deadline fires (never negative).
    pub fn remaining_s(&self) -> f64 {
        (self.budget.saturating_sub(self.start.elapsed())).as_secs_f64()
    }

    /// Caps `cap_s` to whatever remains of this deadline, the per-round
    /// rule spec §5 describes for the master LP/MIP's "single long call".
    pub fn capped(&self, cap_s: f64) -> f64 {
        cap_s.min(self.remaining_s())
    }

    /// Total elapsed seconds since the deadline started.
    pub fn elapsed_s(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/solve/deadline_test.rs"]
mod deadline_test;
