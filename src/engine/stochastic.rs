//! The stochastic sequence engine.

use crate::builder::EngineBuilder;
use crate::core::{StepRecord, Trace, TransitionMatrix, Value};
use crate::engine::error::GenerationError;
use crate::engine::machine::MarkovMachine;
use crate::engine::request::{GenerationResult, StepCount};
use chrono::Utc;
use rand::Rng;
use uuid::Uuid;

/// Drives the recurrence: each step applies the current state's operator to
/// the last two values, appends the result, then samples the next state.
///
/// The engine exclusively owns its sequence; callers read it through
/// [`sequence`](Self::sequence) or take it with
/// [`into_result`](Self::into_result).
///
/// # Example
///
/// ```rust
/// use rand::{rngs::StdRng, SeedableRng};
/// use seqlab::core::TransitionMatrix;
/// use seqlab::engine::StochasticEngine;
/// use seqlab::operators::OperatorPool;
///
/// let pool = OperatorPool::new();
/// let mut rng = StdRng::seed_from_u64(1);
///
/// let mut engine = StochasticEngine::builder()
///     .seeds(vec![2.0, 3.0])
///     .transition_matrix(TransitionMatrix::uniform(1))
///     .operators(vec![pool.find("x + y").unwrap()])
///     .build(&mut rng)
///     .unwrap();
///
/// engine.extend(4, &mut rng).unwrap();
/// assert_eq!(engine.sequence(), &[2.0, 3.0, 5.0, 8.0, 13.0, 21.0]);
/// ```
#[derive(Debug)]
pub struct StochasticEngine {
    run_id: Uuid,
    machine: MarkovMachine,
    seed_count: usize,
    sequence: Vec<Value>,
    trace: Trace,
}

impl StochasticEngine {
    /// Start building an engine.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::new()
    }

    /// Assemble an engine from validated parts. Callers go through
    /// [`EngineBuilder`], which guarantees at least two seeds.
    pub(crate) fn from_parts(machine: MarkovMachine, seeds: Vec<Value>) -> Self {
        debug_assert!(seeds.len() >= 2, "recurrence needs two predecessors");
        Self {
            run_id: Uuid::new_v4(),
            machine,
            seed_count: seeds.len(),
            sequence: seeds,
            trace: Trace::new(),
        }
    }

    /// Execute one recurrence step and return its record.
    pub fn step<R: Rng + ?Sized>(&mut self, rng: &mut R) -> &StepRecord {
        let from_state = self.machine.current_state();
        let operator = self.machine.current_operator();

        let len = self.sequence.len();
        let (x, y) = (self.sequence[len - 1], self.sequence[len - 2]);
        let value = operator.apply(x, y);
        let operator_label = operator.label().to_string();
        self.sequence.push(value);

        let new_state = self.machine.advance(rng);
        let step_index = self.trace.len() + 1;

        tracing::debug!(
            run_id = %self.run_id,
            step = step_index,
            from_state,
            new_state,
            operator = %operator_label,
            value,
            "recurrence step"
        );

        self.trace.record(StepRecord {
            step_index,
            from_state,
            new_state,
            operator_label,
            last_two_values: [x, value],
        });
        &self.trace.records()[step_index - 1]
    }

    /// Append `n` more values. Returns the newly produced suffix.
    pub fn extend<R: Rng + ?Sized>(
        &mut self,
        n: usize,
        rng: &mut R,
    ) -> Result<&[Value], GenerationError> {
        self.run(StepCount::Append(n), rng)
    }

    /// Grow the sequence to `total` values. Returns the newly produced suffix.
    pub fn extend_to_length<R: Rng + ?Sized>(
        &mut self,
        total: usize,
        rng: &mut R,
    ) -> Result<&[Value], GenerationError> {
        self.run(StepCount::TotalLength(total), rng)
    }

    /// Run as many steps as `steps` asks for, relative to the current length.
    ///
    /// Fails with [`GenerationError::InvalidStepCount`] before stepping if
    /// that would add no values.
    pub fn run<R: Rng + ?Sized>(
        &mut self,
        steps: StepCount,
        rng: &mut R,
    ) -> Result<&[Value], GenerationError> {
        let start = self.sequence.len();
        let count = steps.values_to_append(start);
        if count == 0 {
            return Err(GenerationError::InvalidStepCount { requested: steps });
        }

        for _ in 0..count {
            self.step(rng);
        }

        tracing::info!(
            run_id = %self.run_id,
            appended = count,
            length = self.sequence.len(),
            state = self.machine.current_state(),
            "sequence extended"
        );
        Ok(&self.sequence[start..])
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn sequence(&self) -> &[Value] {
        &self.sequence
    }

    /// Values produced so far, without the seeds.
    pub fn produced(&self) -> &[Value] {
        &self.sequence[self.seed_count..]
    }

    pub fn trace(&self) -> &Trace {
        &self.trace
    }

    pub fn current_state(&self) -> usize {
        self.machine.current_state()
    }

    pub fn num_states(&self) -> usize {
        self.machine.num_states()
    }

    pub fn transition_matrix(&self) -> &TransitionMatrix {
        self.machine.transition_matrix()
    }

    pub fn operator_labels(&self) -> Vec<String> {
        self.machine.operator_labels()
    }

    /// Finish the run and hand the sequence and its metadata to the caller.
    pub fn into_result(self) -> GenerationResult {
        let operator_labels = self.machine.operator_labels();
        GenerationResult {
            run_id: self.run_id,
            generated_at: Utc::now(),
            seed_count: self.seed_count,
            sequence: self.sequence,
            transition_matrix: self.machine.transition_matrix().clone(),
            operator_labels,
            trace: self.trace,
        }
    }
}
