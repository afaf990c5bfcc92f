//! Markov state machine binding one operator to each state.

use crate::builder::BuildError;
use crate::core::{Operator, TransitionMatrix};
use crate::engine::error::GenerationError;
use rand::Rng;

/// Current state, transition matrix and per-state operators.
///
/// The operator assignment is fixed at construction. The only mutation is
/// [`advance`](Self::advance), which samples the next state from the
/// current state's row.
#[derive(Clone, Debug)]
pub struct MarkovMachine {
    current: usize,
    matrix: TransitionMatrix,
    operators: Vec<Operator>,
}

impl MarkovMachine {
    /// Create a machine, checking that the operator count matches the
    /// matrix and that `initial_state` is in range.
    pub fn new(
        initial_state: usize,
        matrix: TransitionMatrix,
        operators: Vec<Operator>,
    ) -> Result<Self, GenerationError> {
        let num_states = matrix.num_states();
        if num_states == 0 {
            return Err(BuildError::NoStates.into());
        }
        if operators.len() != num_states {
            return Err(BuildError::OperatorCountMismatch {
                expected: num_states,
                found: operators.len(),
            }
            .into());
        }
        if initial_state >= num_states {
            return Err(GenerationError::InvalidState {
                state: initial_state,
                num_states,
            });
        }

        Ok(Self {
            current: initial_state,
            matrix,
            operators,
        })
    }

    /// Get current state (pure)
    pub fn current_state(&self) -> usize {
        self.current
    }

    pub fn num_states(&self) -> usize {
        self.operators.len()
    }

    /// Operator bound to the current state (pure)
    pub fn current_operator(&self) -> &Operator {
        &self.operators[self.current]
    }

    /// Operator bound to `state`, if it exists.
    pub fn operator(&self, state: usize) -> Option<&Operator> {
        self.operators.get(state)
    }

    pub fn transition_matrix(&self) -> &TransitionMatrix {
        &self.matrix
    }

    /// Operator labels indexed by state.
    pub fn operator_labels(&self) -> Vec<String> {
        self.operators
            .iter()
            .map(|op| op.label().to_string())
            .collect()
    }

    /// Sample and commit the next state. Returns the new state.
    pub fn advance<R: Rng + ?Sized>(&mut self, rng: &mut R) -> usize {
        self.current = self.matrix.sample_next(self.current, rng);
        self.current
    }
}
