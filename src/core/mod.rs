//! Core value types of the stochastic engine.
//!
//! This module contains the pure building blocks:
//! - Labeled binary operators
//! - Row-stochastic transition matrices
//! - The per-step trace
//!
//! Nothing here owns a random source; functions that need randomness take
//! one as an argument.

mod matrix;
mod operator;
mod trace;

pub use matrix::{MatrixError, TransitionMatrix, DEFAULT_DAMPING, ROW_SUM_TOLERANCE};
pub use operator::{Operator, OperatorFn, Value};
pub use trace::{StepRecord, Trace};

pub(crate) use operator::{floor_div, half_up};
