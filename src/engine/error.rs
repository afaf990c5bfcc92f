//! Errors raised by the stochastic engine.

use crate::builder::BuildError;
use crate::engine::StepCount;
use thiserror::Error;

/// Errors that can occur when requesting a stochastic sequence.
///
/// All of these are raised before any randomness is consumed.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum GenerationError {
    #[error("Initial state {state} is out of range for {num_states} state(s)")]
    InvalidState { state: usize, num_states: usize },

    #[error("At least 2 seed values are required, got {provided}")]
    InsufficientSeed { provided: usize },

    #[error("Step count must add at least one value (requested {requested})")]
    InvalidStepCount { requested: StepCount },

    #[error(transparent)]
    Build(#[from] BuildError),
}
