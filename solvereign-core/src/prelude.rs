//! Common aliases shared across the crate, in the spirit of a teacher's
//! `rosomaxa::prelude` module: small, load-bearing, imported with a glob.

use std::error::Error;

/// Floating point type used for all cost, hour and duration arithmetic.
///
/// A single alias keeps the crate portable between `f32`/`f64` the way the
/// teacher keeps one `Float` alias rather than spelling `f64` everywhere.
pub type Float = f64;

/// Type-erased error used at boundaries that don't carry a `SolverError`
/// variant of their own (the LP/MIP callable, external back-end statuses).
pub type GenericError = Box<dyn Error + Send + Sync>;

/// Result alias paired with [`GenericError`].
pub type GenericResult<T> = Result<T, GenericError>;

pub use crate::error::{SolverError, SolverResult};
