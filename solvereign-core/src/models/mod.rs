//! Value types for tours, blocks, rosters and plans (spec §3).
//!
//! Everything here is a plain value type with a derived canonical signature
//! where spec §9 calls for one; ownership is single-writer per solve, with
//! immutable sharing into the validator - the teacher's "value types +
//! derived canonical hashes" guidance, generalized to this domain.

pub mod block;
pub mod common;
pub mod config;
pub mod plan;
pub mod roster;
pub mod tour;

pub use block::{Block, BlockId, BlockType};
pub use common::{Day, Minutes, Signature, TimeWindow, WeekCategory};
pub use config::{default_audit_checks, Engine, FatigueRule, ForecastInput, FreezeContext, SolverConfig};
pub use plan::{AuditCheckResult, AuditReport, AuditStatus, DutyTelemetry, OverrideEvent, Plan, PlanResult, SolveStatus};
pub use roster::{DriverClass, Roster, SyntheticDriverId};
pub use tour::{Depot, InstanceId, Skill, TourInstance, TourTemplate};
