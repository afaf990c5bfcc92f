//! Static sequence generators.
//!
//! Each generator is a pure function of a [`SequenceState`] and a step count.
//! Generators declare up front whether they need a history of values, and
//! how long it must be, so a runner can reject bad seeds before invoking
//! them.
//!
//! # Example
//!
//! ```rust
//! use seqlab::sequences::{Fibonacci, SequenceGenerator, SequenceState};
//!
//! let state = SequenceState::history(vec![0.0, 1.0], 1.0);
//! let next = Fibonacci.generate(&state, 5).unwrap();
//! assert_eq!(next, vec![1.0, 2.0, 3.0, 5.0, 8.0]);
//! ```

mod catalogue;
mod generators;
mod session;

pub use catalogue::{catalogue, find_entry, MenuEntry};
pub use generators::{
    Collatz, CountByStep, CustomRecurrence, Factorial, Fibonacci, FixedOrderSum, Geometric,
    Primes, Squares, Tribonacci,
};
pub use session::Session;

use crate::core::Value;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by static generators.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SequenceError {
    #[error("{generator} requires at least {required} initial values, got {provided}")]
    InsufficientHistory {
        generator: String,
        required: usize,
        provided: usize,
    },

    #[error("{generator} cannot continue from {value}: outside the 64-bit integer range")]
    OutOfRange { generator: String, value: Value },
}

/// Current position of a static sequence: one value, or the full history.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Seed {
    Scalar(Value),
    History(Vec<Value>),
}

impl Seed {
    /// Number of known values.
    pub fn len(&self) -> usize {
        match self {
            Self::Scalar(_) => 1,
            Self::History(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Most recent value, if any.
    pub fn last(&self) -> Option<Value> {
        match self {
            Self::Scalar(v) => Some(*v),
            Self::History(values) => values.last().copied(),
        }
    }

    pub fn values(&self) -> &[Value] {
        match self {
            Self::Scalar(v) => std::slice::from_ref(v),
            Self::History(values) => values,
        }
    }
}

/// Everything a static generator reads.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SequenceState {
    pub current: Seed,
    /// Step size, ratio or additive term, depending on the generator
    pub step: Value,
}

impl SequenceState {
    pub fn scalar(value: Value, step: Value) -> Self {
        Self {
            current: Seed::Scalar(value),
            step,
        }
    }

    pub fn history(values: Vec<Value>, step: Value) -> Self {
        Self {
            current: Seed::History(values),
            step,
        }
    }

    /// Most recent value, or 0 for an empty history.
    pub fn last(&self) -> Value {
        self.current.last().unwrap_or(0.0)
    }

    /// Record produced values: histories grow, scalars move to the last value.
    pub fn absorb(&mut self, produced: &[Value]) {
        match &mut self.current {
            Seed::History(values) => values.extend_from_slice(produced),
            Seed::Scalar(value) => {
                if let Some(last) = produced.last() {
                    *value = *last;
                }
            }
        }
    }
}

/// What a generator needs from its state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SeedRequirement {
    /// Only the current value
    Scalar,
    /// The last `order` values
    History { order: usize },
}

impl SeedRequirement {
    /// Number of seed values required (K).
    pub fn seed_count(&self) -> usize {
        match self {
            Self::Scalar => 1,
            Self::History { order } => *order,
        }
    }

    pub fn needs_history(&self) -> bool {
        matches!(self, Self::History { .. })
    }
}

/// A pure sequence generator.
pub trait SequenceGenerator: Send + Sync {
    /// Display name.
    fn name(&self) -> &str;

    fn seed_requirement(&self) -> SeedRequirement;

    /// Produce the next `num_steps` values without modifying `state`.
    fn generate(
        &self,
        state: &SequenceState,
        num_steps: usize,
    ) -> Result<Vec<Value>, SequenceError>;

    /// Check that `state` satisfies [`seed_requirement`](Self::seed_requirement).
    fn validate(&self, state: &SequenceState) -> Result<(), SequenceError> {
        match self.seed_requirement() {
            SeedRequirement::Scalar => Ok(()),
            SeedRequirement::History { order } => match &state.current {
                Seed::History(values) if values.len() >= order => Ok(()),
                other => Err(SequenceError::InsufficientHistory {
                    generator: self.name().to_string(),
                    required: order,
                    provided: other.len(),
                }),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absorb_extends_history() {
        let mut state = SequenceState::history(vec![0.0, 1.0], 1.0);
        state.absorb(&[1.0, 2.0]);
        assert_eq!(state.current, Seed::History(vec![0.0, 1.0, 1.0, 2.0]));
    }

    #[test]
    fn absorb_replaces_scalar() {
        let mut state = SequenceState::scalar(3.0, 1.0);
        state.absorb(&[4.0, 5.0]);
        assert_eq!(state.current, Seed::Scalar(5.0));

        state.absorb(&[]);
        assert_eq!(state.current, Seed::Scalar(5.0));
    }

    #[test]
    fn seed_reports_last_value() {
        assert_eq!(Seed::Scalar(2.0).last(), Some(2.0));
        assert_eq!(Seed::History(vec![]).last(), None);
        assert_eq!(SequenceState::history(vec![], 1.0).last(), 0.0);
    }

    #[test]
    fn requirement_seed_counts() {
        assert_eq!(SeedRequirement::Scalar.seed_count(), 1);
        assert_eq!(SeedRequirement::History { order: 3 }.seed_count(), 3);
        assert!(!SeedRequirement::Scalar.needs_history());
    }

    #[test]
    fn validate_rejects_short_history() {
        let state = SequenceState::history(vec![1.0], 1.0);
        assert_eq!(
            Fibonacci.validate(&state),
            Err(SequenceError::InsufficientHistory {
                generator: "Fibonacci".to_string(),
                required: 2,
                provided: 1,
            })
        );
    }

    #[test]
    fn validate_rejects_scalar_for_history_generators() {
        let state = SequenceState::scalar(1.0, 1.0);
        assert!(Tribonacci.validate(&state).is_err());
        assert!(CountByStep.validate(&state).is_ok());
    }
}
