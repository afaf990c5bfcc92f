//! Generation requests and results.

use crate::core::{StepRecord, Trace, TransitionMatrix, Value, DEFAULT_DAMPING};
use crate::operators::DEFAULT_MAX_OFFSET;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Default number of Markov states (and operators) per run.
pub const DEFAULT_NUM_STATES: usize = 4;

/// How many values a run should produce.
///
/// `Append(n)` adds `n` values after the seeds. `TotalLength(n)` grows the
/// sequence, seeds included, to exactly `n` values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepCount {
    Append(usize),
    TotalLength(usize),
}

impl StepCount {
    /// Number of values to append to a sequence of `current_len` values.
    pub fn values_to_append(&self, current_len: usize) -> usize {
        match *self {
            Self::Append(n) => n,
            Self::TotalLength(n) => n.saturating_sub(current_len),
        }
    }
}

impl fmt::Display for StepCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Append(n) => write!(f, "append {}", n),
            Self::TotalLength(n) => write!(f, "total length {}", n),
        }
    }
}

/// Parameters of a single stochastic run.
///
/// # Example
///
/// ```rust
/// use seqlab::engine::{GenerationRequest, StepCount};
///
/// let request = GenerationRequest::append(vec![2.0, 3.0], 10)
///     .with_num_states(6)
///     .with_initial_state(2);
///
/// assert_eq!(request.steps(), StepCount::Append(10));
/// assert_eq!(request.num_states(), 6);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    initial_values: Vec<Value>,
    steps: StepCount,
    initial_state: usize,
    num_states: usize,
    damping: f64,
    max_offset: i64,
}

impl GenerationRequest {
    /// Append `steps` values after `initial_values`.
    pub fn append(initial_values: Vec<Value>, steps: usize) -> Self {
        Self::new(initial_values, StepCount::Append(steps))
    }

    /// Grow the sequence to `length` values in total.
    pub fn total_length(initial_values: Vec<Value>, length: usize) -> Self {
        Self::new(initial_values, StepCount::TotalLength(length))
    }

    pub fn new(initial_values: Vec<Value>, steps: StepCount) -> Self {
        Self {
            initial_values,
            steps,
            initial_state: 0,
            num_states: DEFAULT_NUM_STATES,
            damping: DEFAULT_DAMPING,
            max_offset: DEFAULT_MAX_OFFSET,
        }
    }

    pub fn with_initial_state(mut self, state: usize) -> Self {
        self.initial_state = state;
        self
    }

    pub fn with_num_states(mut self, n: usize) -> Self {
        self.num_states = n;
        self
    }

    /// Diagonal damping factor for the generated transition matrix.
    pub fn with_damping(mut self, damping: f64) -> Self {
        self.damping = damping;
        self
    }

    /// Upper bound of the constant in synthesised `x + y + c` operators.
    pub fn with_max_offset(mut self, max_offset: i64) -> Self {
        self.max_offset = max_offset;
        self
    }

    pub fn initial_values(&self) -> &[Value] {
        &self.initial_values
    }

    pub fn steps(&self) -> StepCount {
        self.steps
    }

    pub fn initial_state(&self) -> usize {
        self.initial_state
    }

    pub fn num_states(&self) -> usize {
        self.num_states
    }

    pub fn damping(&self) -> f64 {
        self.damping
    }

    pub fn max_offset(&self) -> i64 {
        self.max_offset
    }
}

/// Everything a caller needs to display a finished run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GenerationResult {
    /// Identifier used to correlate log lines of this run
    pub run_id: Uuid,
    /// When the result was assembled
    pub generated_at: DateTime<Utc>,
    /// Number of leading seed values in `sequence`
    pub seed_count: usize,
    /// Seeds followed by every produced value
    pub sequence: Vec<Value>,
    pub transition_matrix: TransitionMatrix,
    /// Operator label bound to each state, indexed by state
    pub operator_labels: Vec<String>,
    pub trace: Trace,
}

impl GenerationResult {
    /// Values produced by the run, without the seeds.
    pub fn appended(&self) -> &[Value] {
        &self.sequence[self.seed_count.min(self.sequence.len())..]
    }

    pub fn steps(&self) -> &[StepRecord] {
        self.trace.records()
    }

    pub fn last_value(&self) -> Option<Value> {
        self.sequence.last().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_counts_are_independent_of_length() {
        assert_eq!(StepCount::Append(5).values_to_append(2), 5);
        assert_eq!(StepCount::Append(5).values_to_append(50), 5);
    }

    #[test]
    fn total_length_counts_from_current_length() {
        assert_eq!(StepCount::TotalLength(10).values_to_append(2), 8);
        assert_eq!(StepCount::TotalLength(2).values_to_append(2), 0);
        assert_eq!(StepCount::TotalLength(1).values_to_append(2), 0);
    }

    #[test]
    fn request_defaults() {
        let request = GenerationRequest::append(vec![2.0, 3.0], 1);
        assert_eq!(request.initial_state(), 0);
        assert_eq!(request.num_states(), DEFAULT_NUM_STATES);
        assert_eq!(request.damping(), DEFAULT_DAMPING);
        assert_eq!(request.max_offset(), DEFAULT_MAX_OFFSET);
    }

    #[test]
    fn step_count_displays_its_convention() {
        assert_eq!(StepCount::Append(3).to_string(), "append 3");
        assert_eq!(StepCount::TotalLength(9).to_string(), "total length 9");
    }
}
