//! Builder for constructing stochastic engines.

use crate::builder::error::BuildError;
use crate::core::{Operator, TransitionMatrix, Value, DEFAULT_DAMPING};
use crate::engine::{
    check_damping, check_initial_state, check_num_states, check_seeds, first_violation, Checked,
    GenerationError, GenerationRequest, MarkovMachine, StochasticEngine, DEFAULT_NUM_STATES,
};
use crate::operators::OperatorPool;
use rand::Rng;
use stillwater::validation::Validation;

/// Builder for constructing engines with a fluent API.
///
/// By default the transition matrix and operator assignment are drawn from
/// the random source passed to [`build`](Self::build). Either can be
/// injected instead, which makes runs fully predictable in tests.
pub struct EngineBuilder {
    seeds: Vec<Value>,
    num_states: Option<usize>,
    initial_state: usize,
    damping: f64,
    pool: OperatorPool,
    matrix: Option<TransitionMatrix>,
    operators: Option<Vec<Operator>>,
}

impl EngineBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            seeds: Vec::new(),
            num_states: None,
            initial_state: 0,
            damping: DEFAULT_DAMPING,
            pool: OperatorPool::new(),
            matrix: None,
            operators: None,
        }
    }

    /// Builder preloaded with everything in `request` except the step count.
    pub fn from_request(request: &GenerationRequest) -> Self {
        Self::new()
            .seeds(request.initial_values().to_vec())
            .num_states(request.num_states())
            .initial_state(request.initial_state())
            .damping(request.damping())
            .pool(OperatorPool::new().with_max_offset(request.max_offset()))
    }

    /// Set the seed values (at least two are required).
    pub fn seeds(mut self, seeds: Vec<Value>) -> Self {
        self.seeds = seeds;
        self
    }

    /// Set the number of states. Defaults to the size of an injected matrix
    /// or operator list, otherwise to 4.
    pub fn num_states(mut self, n: usize) -> Self {
        self.num_states = Some(n);
        self
    }

    /// Set the initial state (defaults to 0).
    pub fn initial_state(mut self, state: usize) -> Self {
        self.initial_state = state;
        self
    }

    /// Set the diagonal damping used when drawing a matrix.
    pub fn damping(mut self, damping: f64) -> Self {
        self.damping = damping;
        self
    }

    /// Draw operators from `pool` instead of the built-in one.
    pub fn pool(mut self, pool: OperatorPool) -> Self {
        self.pool = pool;
        self
    }

    /// Use `matrix` instead of drawing one.
    pub fn transition_matrix(mut self, matrix: TransitionMatrix) -> Self {
        self.matrix = Some(matrix);
        self
    }

    /// Bind `operators[i]` to state `i` instead of sampling.
    pub fn operators(mut self, operators: Vec<Operator>) -> Self {
        self.operators = Some(operators);
        self
    }

    fn effective_num_states(&self) -> usize {
        self.num_states
            .or_else(|| self.matrix.as_ref().map(TransitionMatrix::num_states))
            .or_else(|| self.operators.as_ref().map(Vec::len))
            .unwrap_or(DEFAULT_NUM_STATES)
    }

    /// Check every precondition, collecting all violations.
    pub fn validate(&self) -> Checked {
        let n = self.effective_num_states();
        let mut checks = vec![
            check_seeds(self.seeds.len()),
            check_num_states(n),
            check_initial_state(self.initial_state, n),
            check_damping(self.damping),
        ];

        if let Some(matrix) = &self.matrix {
            if let Err(err) = matrix.validate() {
                checks.push(Validation::fail(GenerationError::Build(
                    BuildError::InvalidMatrix(err),
                )));
            }
            if matrix.num_states() != n {
                checks.push(Validation::fail(GenerationError::Build(
                    BuildError::MatrixSizeMismatch {
                        expected: n,
                        found: matrix.num_states(),
                    },
                )));
            }
        }
        if let Some(operators) = &self.operators {
            if operators.len() != n {
                checks.push(Validation::fail(GenerationError::Build(
                    BuildError::OperatorCountMismatch {
                        expected: n,
                        found: operators.len(),
                    },
                )));
            }
        }

        Validation::all_vec(checks).map(|_| ())
    }

    /// Build the engine.
    ///
    /// Fails with the first violation reported by [`validate`](Self::validate)
    /// before consuming any randomness. Otherwise draws the matrix (unless
    /// injected) and then the operators (unless injected).
    pub fn build<R: Rng + ?Sized>(self, rng: &mut R) -> Result<StochasticEngine, GenerationError> {
        first_violation(self.validate())?;
        let n = self.effective_num_states();

        let matrix = match self.matrix {
            Some(matrix) => matrix,
            None => TransitionMatrix::build(n, self.damping, rng).map_err(BuildError::from)?,
        };
        let operators = match self.operators {
            Some(operators) => operators,
            None => self.pool.sample(n, rng),
        };

        let machine = MarkovMachine::new(self.initial_state, matrix, operators)?;
        Ok(StochasticEngine::from_parts(machine, self.seeds))
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
