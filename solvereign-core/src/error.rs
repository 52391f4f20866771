//! Error kinds for the roster-generation core (spec §7).
//!
//! Errors are values, never exceptions-for-control-flow: every fallible
//! operation returns [`SolverResult`], and partial progress (an incumbent
//! plan, a partial audit report) is preserved in the ok/err payload rather
//! than discarded.

use thiserror::Error;

use crate::models::block::BlockId;
use crate::models::tour::InstanceId;
use crate::prelude::Float;

/// The five error kinds named in spec §7.
#[derive(Debug, Error)]
pub enum SolverError {
    /// The forecast cannot be satisfied under the hard invariants regardless
    /// of assignment (e.g. a single-day load that forces `> 55h` on any
    /// driver). Never retried.
    #[error("input contradiction: {reason} (instances: {instances:?})")]
    InputContradiction {
        /// Human-readable explanation of the contradiction.
        reason: String,
        /// The first offending instance(s).
        instances: Vec<InstanceId>,
    },

    /// The block partitioner could not place every instance into a valid
    /// block. Indicates a validator bug or an impossible intra-day gap;
    /// fatal for the current solve.
    #[error("partition failure at instance {instance}: {reason}")]
    PartitionFailure {
        /// The instance that could not be placed.
        instance: InstanceId,
        /// Why it could not be placed.
        reason: String,
    },

    /// The configured wall-clock budget expired. The caller decides whether
    /// to accept the returned incumbent; this is never retried internally.
    #[error("solver budget exhausted after {elapsed_s:.1}s ({rounds} rounds)")]
    SolverBudgetExhausted {
        /// Seconds spent before the deadline fired.
        elapsed_s: Float,
        /// Number of column-generation rounds completed.
        rounds: usize,
    },

    /// A produced plan failed one or more audits. Always a defect signal,
    /// never a retry condition - the plan and its audit report are still
    /// emitted, and the process exits non-zero.
    #[error("audit failure: {failed_checks:?}")]
    AuditFailure {
        /// Names of the checks that reported FAIL.
        failed_checks: Vec<String>,
        /// The first uncoverable/violating block, if attributable to one.
        first_offending_block: Option<BlockId>,
    },

    /// The LP/MIP back-end returned an unexpected status.
    #[error("internal solver error: backend status `{backend_status}` ({context})")]
    InternalSolverError {
        /// The back-end's own status string.
        backend_status: String,
        /// What call was being made when the status was returned.
        context: String,
    },
}

/// Result alias for every fallible operation in the crate.
pub type SolverResult<T> = Result<T, SolverError>;
