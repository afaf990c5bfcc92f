//! Build errors for the engine builder.

use crate::core::MatrixError;
use thiserror::Error;

/// Errors that can occur when assembling an engine from its parts.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum BuildError {
    #[error("Number of states must be at least 1")]
    NoStates,

    #[error("Damping factor {damping} must be a finite value in [0, 1]")]
    InvalidDamping { damping: f64 },

    #[error("Expected {expected} operators (one per state), found {found}")]
    OperatorCountMismatch { expected: usize, found: usize },

    #[error("Transition matrix has {found} states, expected {expected}")]
    MatrixSizeMismatch { expected: usize, found: usize },

    #[error("Invalid transition matrix: {0}")]
    InvalidMatrix(#[from] MatrixError),
}
